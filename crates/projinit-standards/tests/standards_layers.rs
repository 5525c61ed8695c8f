use projinit_core::{CheckLevel, ProjectType};
use projinit_standards::{BuiltinCatalog, DirCatalog, ExplicitConfigSource, StandardsLoader};
use tempfile::tempdir;

#[test]
fn user_overrides_flow_through_the_loader() {
    let dir = tempdir().unwrap();
    let local = dir.path().join(".projinit.yaml");
    std::fs::write(
        &local,
        r#"
standards:
  check_overrides:
    has_claude_md: required
  disabled_checks: [has_editorconfig]
  extra_checks:
    - id: has_makefile
      type: file_exists
      level: optional
      path: Makefile
"#,
    )
    .unwrap();

    let config_source = ExplicitConfigSource { global: None, local: Some(local) };
    let loader = StandardsLoader::new(&BuiltinCatalog, &config_source);
    let catalog = loader.load(ProjectType::PythonLib, Some(dir.path())).unwrap();

    assert_eq!(catalog.find_check("has_claude_md").unwrap().level, CheckLevel::Required);
    assert!(catalog.find_check("has_editorconfig").is_none());
    assert_eq!(catalog.checks.last().unwrap().id, "has_makefile");

    let ids: Vec<_> = catalog.checks.iter().map(|c| c.id.as_str()).collect();
    let mut dedup = ids.clone();
    dedup.sort();
    dedup.dedup();
    assert_eq!(ids.len(), dedup.len());
}

#[test]
fn custom_standards_dir_with_missing_type_layer() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("base.yaml"), "checks:\n  - id: only\n    path: ONLY.md\n").unwrap();

    let source = DirCatalog::new(dir.path());
    let config_source = ExplicitConfigSource::default();
    let loader = StandardsLoader::new(&source, &config_source);
    let checks = loader.checks_for_type(ProjectType::Infrastructure, Some(dir.path())).unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].id, "only");
}

#[test]
fn malformed_type_layer_fails_the_load() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("base.yaml"), "checks: []\n").unwrap();
    std::fs::write(dir.path().join("lab.yaml"), "checks:\n  - id: [broken\n").unwrap();

    let source = DirCatalog::new(dir.path());
    let config_source = ExplicitConfigSource::default();
    let loader = StandardsLoader::new(&source, &config_source);
    assert!(loader.load(ProjectType::Lab, Some(dir.path())).is_err());
    assert!(loader.load(ProjectType::Documentation, Some(dir.path())).is_ok());
}
