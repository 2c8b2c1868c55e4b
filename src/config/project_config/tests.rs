use super::*;

const SAMPLE: &str = r#"
namespace = "@app"

[modules.core]
layer = 0

[modules.auth]
layer = 1
root = "libs/auth/src"
"#;

#[test]
fn test_parse_minimal_config() {
    let config = ProjectConfig::from_toml_str(SAMPLE).expect("valid config");
    assert_eq!(config.namespace, "@app");
    assert_eq!(config.modules.len(), 2);
    assert_eq!(config.modules["core"].layer, 0);
    assert_eq!(config.scan.modules_dir, PathBuf::from("packages"));
    assert_eq!(config.scan.extensions.len(), DEFAULT_EXTENSIONS.len());
}

#[test]
fn test_layer_is_required() {
    let content = r#"
namespace = "@app"
[modules.core]
root = "packages/core"
"#;
    assert!(matches!(
        ProjectConfig::from_toml_str(content),
        Err(ConfigError::Toml { .. })
    ));
}

#[test]
fn test_invalid_module_name_rejected() {
    let content = r#"
namespace = "@app"
[modules."a/b"]
layer = 1
"#;
    assert!(matches!(
        ProjectConfig::from_toml_str(content),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_empty_namespace_rejected() {
    let content = "namespace = \"\"\n";
    assert!(ProjectConfig::from_toml_str(content).is_err());
}

#[test]
fn test_registry_resolves_roots() {
    let config = ProjectConfig::from_toml_str(SAMPLE).unwrap();
    let registry = config.registry(Path::new("/repo"));

    assert_eq!(registry.namespace(), "@app");
    assert_eq!(registry.layer_of("auth"), Some(1));
    assert_eq!(
        registry.get("core").unwrap().root,
        PathBuf::from("/repo/packages/core")
    );
    assert_eq!(
        registry.get("auth").unwrap().root,
        PathBuf::from("/repo/libs/auth/src")
    );
    assert!(!registry.contains("billing"));
}

#[test]
fn test_default_exclusions_match_test_files() {
    let set = ExcludeConfig::default().build_globset().unwrap();
    assert!(set.is_match("src/user.test.ts"));
    assert!(set.is_match("src/__tests__/user.ts"));
    assert!(set.is_match("types/global.d.ts"));
    assert!(!set.is_match("src/user.ts"));
}

#[test]
fn test_skip_defaults_keeps_user_patterns_only() {
    let exclude = ExcludeConfig {
        paths: vec!["**/legacy/**".to_string()],
        skip_defaults: true,
    };
    assert_eq!(exclude.effective_patterns(), vec!["**/legacy/**".to_string()]);
    let set = exclude.build_globset().unwrap();
    assert!(set.is_match("src/legacy/old.ts"));
    assert!(!set.is_match("src/user.test.ts"));
}

#[test]
fn test_bad_pattern_is_an_error() {
    let exclude = ExcludeConfig {
        paths: vec!["src/[".to_string()],
        skip_defaults: true,
    };
    assert!(matches!(
        exclude.build_globset(),
        Err(ConfigError::Pattern { .. })
    ));
}

#[test]
fn test_load_prefers_toml_then_json() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_project_config(dir.path()),
        Err(ConfigError::NotFound { .. })
    ));

    std::fs::write(
        dir.path().join(".archgaterc.json"),
        r#"{"namespace": "@json", "modules": {"core": {"layer": 0}}}"#,
    )
    .unwrap();
    let config = load_project_config(dir.path()).unwrap();
    assert_eq!(config.namespace, "@json");

    std::fs::write(dir.path().join("archgate.toml"), SAMPLE).unwrap();
    let config = load_project_config(dir.path()).unwrap();
    assert_eq!(config.namespace, "@app");
}

#[test]
fn test_example_config_is_valid() {
    let config = ProjectConfig::from_toml_str(EXAMPLE_CONFIG).expect("template parses");
    assert_eq!(config.modules.len(), 5);
    assert_eq!(config.defaults.fail_on.as_deref(), Some("critical"));
}
