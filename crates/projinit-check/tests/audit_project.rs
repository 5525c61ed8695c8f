use std::fs;

use projinit_check::Checker;
use projinit_core::{CheckLevel, CheckStatus, ProjectType};
use projinit_standards::{build_catalog, BuiltinCatalog, UserConfig};
use tempfile::tempdir;

#[test]
fn empty_python_project_is_not_compliant() {
    let dir = tempdir().unwrap();
    let catalog = build_catalog(&BuiltinCatalog, ProjectType::PythonCli, &UserConfig::default()).unwrap();
    let report = Checker::new(dir.path(), ProjectType::PythonCli).run(&catalog);

    assert!(!report.is_compliant());
    let readme = report.checks.iter().find(|c| c.id == "has_readme").unwrap();
    assert!(readme.is_critical());
    assert!(readme.suggestion.is_some());

    // content checks on absent files are skipped, not failed
    let ruff = report.checks.iter().find(|c| c.id == "pyproject_has_ruff").unwrap();
    assert_eq!(ruff.status, CheckStatus::Skipped);
    assert!(report.checks.iter().all(|c| c.id != "has_changelog"));
}

#[test]
fn complete_python_project_is_compliant() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("README.md"), "# demo\n").unwrap();
    fs::write(root.join("LICENSE"), "MIT\n").unwrap();
    fs::write(root.join(".gitignore"), "__pycache__/\n").unwrap();
    fs::write(
        root.join("pyproject.toml"),
        "[project]\nname = \"demo\"\n\n[project.scripts]\ndemo = \"demo:main\"\n\n[tool.ruff]\nline-length = 100\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("src/demo")).unwrap();
    fs::create_dir(root.join("tests")).unwrap();

    let catalog = build_catalog(&BuiltinCatalog, ProjectType::PythonCli, &UserConfig::default()).unwrap();
    let report = Checker::new(root, ProjectType::PythonCli).run(&catalog);

    let critical: Vec<_> = report.checks.iter().filter(|c| c.is_critical()).map(|c| c.id.clone()).collect();
    assert!(critical.is_empty(), "unexpected critical failures: {critical:?}");
    assert!(report.is_compliant());
    assert!(report.files_scanned.contains(&"README.md".to_string()));

    let by_level = report.checks_by_level();
    assert!(by_level.contains_key(&CheckLevel::Required));
    assert!(report.score() > 0.0 && report.score() <= 100.0);
}
