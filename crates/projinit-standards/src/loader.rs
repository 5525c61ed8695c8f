use std::path::Path;

use projinit_core::{CheckLevel, ProjectType, Result};

use crate::catalog::{merge_catalogs, merge_keyed, Catalog, CheckDefinition};
use crate::config::{load_config, ConfigSource, StandardsConfig, UserConfig};
use crate::defaults::{load_layer, CatalogSource};

/// Base layer, then the project type's layer, then the user's overrides.
pub fn build_catalog(source: &dyn CatalogSource, project_type: ProjectType, config: &UserConfig) -> Result<Catalog> {
    let mut catalog = load_layer(source, "base")?;
    if let Some(layer) = project_type.standards_layer() {
        let typed = load_layer(source, layer)?;
        catalog = merge_catalogs(&catalog, &typed);
    }
    Ok(apply_overrides(&catalog, &config.standards))
}

/// Level reassignment, removal of disabled ids, then appended checks and hook blocks.
pub fn apply_overrides(catalog: &Catalog, overrides: &StandardsConfig) -> Catalog {
    let mut checks: Vec<CheckDefinition> = catalog
        .checks
        .iter()
        .filter(|c| !overrides.disabled_checks.contains(&c.id))
        .cloned()
        .map(|mut c| {
            if let Some(level) = overrides.check_overrides.get(&c.id).and_then(|l| CheckLevel::parse(l)) {
                c.level = level;
            }
            c
        })
        .collect();
    checks = merge_keyed(&checks, &overrides.extra_checks, |c| c.id.clone());

    Catalog {
        checks,
        precommit_hooks: merge_keyed(&catalog.precommit_hooks, &overrides.extra_precommit_hooks, |h| {
            h.identity().to_string()
        }),
        toml_sections: catalog.toml_sections.clone(),
        extra: catalog.extra.clone(),
    }
}

/// Resolves the user config and the merged catalog for one project.
pub struct StandardsLoader<'a> {
    pub catalog_source: &'a dyn CatalogSource,
    pub config_source: &'a dyn ConfigSource,
}

impl<'a> StandardsLoader<'a> {
    pub fn new(catalog_source: &'a dyn CatalogSource, config_source: &'a dyn ConfigSource) -> Self {
        Self { catalog_source, config_source }
    }

    pub fn load_config(&self, project_root: Option<&Path>) -> Result<UserConfig> {
        load_config(self.config_source, project_root)
    }

    pub fn load(&self, project_type: ProjectType, project_root: Option<&Path>) -> Result<Catalog> {
        let config = self.load_config(project_root)?;
        build_catalog(self.catalog_source, project_type, &config)
    }

    /// Merged checks restricted to those whose `applies_to` admits `project_type`.
    pub fn checks_for_type(&self, project_type: ProjectType, project_root: Option<&Path>) -> Result<Vec<CheckDefinition>> {
        let catalog = self.load(project_type, project_root)?;
        Ok(catalog.checks_for_type(project_type).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::BuiltinCatalog;

    fn overrides(yaml: &str) -> StandardsConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn base_is_always_included() {
        let cfg = UserConfig::default();
        for pt in ProjectType::ALL.into_iter().chain([ProjectType::Unknown]) {
            let c = build_catalog(&BuiltinCatalog, pt, &cfg).unwrap();
            assert!(c.find_check("has_readme").is_some(), "{pt} lacks base checks");
        }
    }

    #[test]
    fn type_layer_adds_its_checks() {
        let cfg = UserConfig::default();
        let py = build_catalog(&BuiltinCatalog, ProjectType::PythonCli, &cfg).unwrap();
        assert!(py.find_check("has_pyproject").is_some());
        assert!(!py.toml_sections.is_empty());
        let node = build_catalog(&BuiltinCatalog, ProjectType::NodeFrontend, &cfg).unwrap();
        assert!(node.find_check("has_pyproject").is_none());
    }

    #[test]
    fn level_override_ignores_invalid_levels() {
        let base: Catalog = serde_yaml::from_str("checks:\n  - id: a\n    path: a\n  - id: b\n    path: b\n").unwrap();
        let o = overrides("check_overrides:\n  a: optional\n  b: critical\n");
        let c = apply_overrides(&base, &o);
        assert_eq!(c.checks[0].level, CheckLevel::Optional);
        assert_eq!(c.checks[1].level, CheckLevel::Required);
    }

    #[test]
    fn disabled_checks_are_removed_and_extras_deduplicated() {
        let base: Catalog = serde_yaml::from_str("checks:\n  - id: a\n    path: a\n  - id: b\n    path: b\n").unwrap();
        let o = overrides(
            "disabled_checks: [a]\nextra_checks:\n  - id: b\n    path: other\n  - id: c\n    path: c\nextra_precommit_hooks:\n  - repo: https://x\n",
        );
        let c = apply_overrides(&base, &o);
        assert_eq!(c.check_ids(), vec!["b", "c"]);
        assert_eq!(c.find_check("b").unwrap().kind.primary_path(), Some("b"));
        assert_eq!(c.precommit_hooks.len(), 1);
    }

    #[test]
    fn applies_to_restricts_type_checks() {
        let cfg = UserConfig::default();
        let cli = build_catalog(&BuiltinCatalog, ProjectType::PythonCli, &cfg).unwrap();
        let cli_ids: Vec<_> = cli.checks_for_type(ProjectType::PythonCli).iter().map(|c| c.id.clone()).collect();
        assert!(cli_ids.contains(&"pyproject_has_scripts".to_string()));
        assert!(!cli_ids.contains(&"has_changelog".to_string()));
    }
}
