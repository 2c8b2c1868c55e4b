//! Import specifier classification

use crate::config::ModuleRegistry;

/// What an import specifier refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind<'r> {
    /// `<namespace>/<module>[/...]` naming a registered module
    Module(&'r str),
    /// `./x`, `../x` or an absolute path; stays inside the module
    Relative,
    /// Any other bare specifier, reduced to its package name
    External(String),
}

/// Classify a specifier against the registry
pub fn classify<'r>(specifier: &str, registry: &'r ModuleRegistry) -> SpecifierKind<'r> {
    if is_relative(specifier) {
        return SpecifierKind::Relative;
    }

    if let Some(rest) = specifier
        .strip_prefix(registry.namespace())
        .and_then(|r| r.strip_prefix('/'))
    {
        let name = rest.split('/').next().unwrap_or(rest);
        if let Some(module) = registry.get(name) {
            return SpecifierKind::Module(module.name.as_str());
        }
    }

    SpecifierKind::External(package_name(specifier))
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

/// Package part of a bare specifier.
///
/// The first path segment, except for scoped packages where the scope
/// alone is not a package: `@scope/name/sub` -> `@scope/name`.
pub fn package_name(specifier: &str) -> String {
    let mut segments = specifier.split('/');
    let first = segments.next().unwrap_or(specifier);
    if first.starts_with('@') {
        if let Some(name) = segments.next().filter(|s| !s.is_empty()) {
            return format!("{first}/{name}");
        }
    }
    first.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ModuleRegistry {
        ModuleRegistry::new("@app")
            .with_module("core", 0, "packages/core")
            .with_module("auth", 1, "packages/auth")
    }

    #[test]
    fn test_registered_module() {
        let r = registry();
        assert_eq!(classify("@app/core", &r), SpecifierKind::Module("core"));
        assert_eq!(classify("@app/auth/session", &r), SpecifierKind::Module("auth"));
    }

    #[test]
    fn test_relative_paths_ignored() {
        let r = registry();
        for spec in ["./util", "../shared/x", "/abs/path", ".", ".."] {
            assert_eq!(classify(spec, &r), SpecifierKind::Relative, "{spec}");
        }
    }

    #[test]
    fn test_external_packages() {
        let r = registry();
        assert_eq!(classify("react", &r), SpecifierKind::External("react".into()));
        assert_eq!(
            classify("lodash/fp/map", &r),
            SpecifierKind::External("lodash".into())
        );
        assert_eq!(
            classify("@tanstack/react-query/devtools", &r),
            SpecifierKind::External("@tanstack/react-query".into())
        );
        assert_eq!(classify("node:fs", &r), SpecifierKind::External("node:fs".into()));
    }

    #[test]
    fn test_unregistered_namespace_member_is_external() {
        let r = registry();
        assert_eq!(
            classify("@app/billing", &r),
            SpecifierKind::External("@app/billing".into())
        );
        // prefix must be followed by '/'
        assert_eq!(
            classify("@application/core", &r),
            SpecifierKind::External("@application/core".into())
        );
    }
}
