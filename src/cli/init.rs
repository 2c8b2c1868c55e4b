//! Init command - write an example archgate.toml

use anyhow::{Context, Result};
use archgate::config::EXAMPLE_CONFIG;
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join("archgate.toml");
    if config_path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nEdit the [modules.*] tables to match your packages, then run:\n  {}",
        style("archgate .").bold()
    );

    Ok(())
}
