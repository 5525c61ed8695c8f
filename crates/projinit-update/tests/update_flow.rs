use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use projinit_check::Checker;
use projinit_core::ProjectType;
use projinit_standards::{build_catalog, BuiltinCatalog, Catalog, UserConfig};
use projinit_update::{plan, template_vars, ActionType, ApplyTally, FsTemplates, Updater};
use tempfile::tempdir;

fn snapshot(root: &Path) -> BTreeSet<(String, Vec<u8>)> {
    let mut out = BTreeSet::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap().flatten() {
            let p = entry.path();
            let rel = p.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            if p.is_dir() {
                out.insert((format!("{rel}/"), vec![]));
                stack.push(p);
            } else {
                out.insert((rel, fs::read(&p).unwrap()));
            }
        }
    }
    out
}

fn python_catalog() -> Catalog {
    build_catalog(&BuiltinCatalog, ProjectType::PythonCli, &UserConfig::default()).unwrap()
}

fn seed(root: &Path) {
    fs::write(root.join("pyproject.toml"), "[project]\nname = \"demo\"\n\n[project.scripts]\ndemo = \"demo:main\"\n").unwrap();
    fs::write(
        root.join(".pre-commit-config.yaml"),
        "repos:\n  - repo: https://github.com/pre-commit/pre-commit-hooks\n    rev: v4.6.0\n    hooks:\n      - id: trailing-whitespace\n",
    )
    .unwrap();
}

#[test]
fn dry_run_touches_nothing() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let catalog = python_catalog();
    let report = Checker::new(dir.path(), ProjectType::PythonCli).run(&catalog);
    let actions = plan(&report, &catalog, &template_vars(dir.path(), ProjectType::PythonCli, &UserConfig::default()));
    assert!(!actions.is_empty());

    let before = snapshot(dir.path());
    let templates = FsTemplates::default();
    let mut updater = Updater::new(&templates);
    updater.dry_run = true;
    let applied = updater.apply(&actions);
    assert_eq!(applied.applied.len(), actions.len());
    assert_eq!(applied.tally(), ApplyTally::AllApplied);
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn update_repairs_project_and_backs_up_merges() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    seed(root);
    let catalog = python_catalog();
    let cfg = UserConfig::default();

    let before = Checker::new(root, ProjectType::PythonCli).run(&catalog);
    assert!(!before.is_compliant());

    let actions = plan(&before, &catalog, &template_vars(root, ProjectType::PythonCli, &cfg));
    assert!(actions.iter().any(|a| a.action_type == ActionType::Merge));
    let templates = FsTemplates::from_config(&cfg.templates);
    let result = Updater::new(&templates).apply(&actions);
    assert_eq!(result.tally(), ApplyTally::AllApplied, "not applied: {:?}", result.not_applied);

    assert!(root.join("README.md").is_file());
    assert!(root.join("src").is_dir());
    let pyproject = fs::read_to_string(root.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("[tool.ruff]"));
    let precommit = fs::read_to_string(root.join(".pre-commit-config.yaml")).unwrap();
    assert!(precommit.contains("end-of-file-fixer"));
    assert!(precommit.contains("ruff-pre-commit"));
    assert!(!result.backups.is_empty());
    for b in &result.backups {
        assert!(b.is_file());
    }

    let after = Checker::new(root, ProjectType::PythonCli).run(&catalog);
    assert!(after.is_compliant(), "still failing: {:?}", after.failed_checks());
    assert!(after.passed_count() > before.passed_count());
}

#[test]
fn malformed_precommit_is_left_alone() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let broken = "repos: [\n  - this is not: valid\n";
    fs::write(root.join(".pre-commit-config.yaml"), broken).unwrap();
    let catalog = python_catalog();

    let report = Checker::new(root, ProjectType::PythonCli).run(&catalog);
    let actions: Vec<_> =
        plan(&report, &catalog, &Default::default()).into_iter().filter(|a| a.action_type == ActionType::Merge).collect();
    assert!(!actions.is_empty());

    let templates = FsTemplates::default();
    let result = Updater::new(&templates).apply(&actions);
    assert_eq!(result.tally(), ApplyTally::NoneApplied);
    assert!(result.backups.is_empty());
    assert_eq!(fs::read_to_string(root.join(".pre-commit-config.yaml")).unwrap(), broken);
}

#[test]
fn repeated_merges_keep_original_in_backup() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    seed(root);
    let precommit = root.join(".pre-commit-config.yaml");
    let original = fs::read(&precommit).unwrap();
    let catalog = python_catalog();

    let report = Checker::new(root, ProjectType::PythonCli).run(&catalog);
    let actions: Vec<_> = plan(&report, &catalog, &Default::default())
        .into_iter()
        .filter(|a| a.action_type == ActionType::Merge && a.target.ends_with(".pre-commit-config.yaml"))
        .collect();
    assert!(actions.len() >= 2, "expected several merges, got {}", actions.len());

    let templates = FsTemplates::default();
    let result = Updater::new(&templates).apply(&actions);
    assert_eq!(result.tally(), ApplyTally::AllApplied, "not applied: {:?}", result.not_applied);
    assert_eq!(result.backups.len(), 1);
    assert_eq!(fs::read(&result.backups[0]).unwrap(), original);
    assert_ne!(fs::read(&precommit).unwrap(), original);
}
