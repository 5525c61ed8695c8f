use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use projinit_core::{AuditReport, CheckResult, CheckStatus, ProjectType};
use projinit_standards::{Catalog, CheckDefinition};

use crate::eval::evaluate;

/// Audits one project directory against a merged catalog.
pub struct Checker {
    pub project_path: PathBuf,
    pub project_type: ProjectType,
}

impl Checker {
    pub fn new(project_path: impl Into<PathBuf>, project_type: ProjectType) -> Self {
        Self { project_path: project_path.into(), project_type }
    }

    /// Run every check whose `applies_to` admits this project's type, in catalog order.
    pub fn run(&self, catalog: &Catalog) -> AuditReport {
        self.run_checks(catalog.checks_for_type(self.project_type))
    }

    pub fn run_checks<'a>(&self, defs: impl IntoIterator<Item = &'a CheckDefinition>) -> AuditReport {
        let started = Instant::now();
        let mut checks = Vec::new();
        let mut scanned = BTreeSet::new();

        for def in defs {
            let result = run_one(&self.project_path, def);
            tracing::debug!(check = %result.id, status = result.status.as_str(), "check evaluated");
            if let Some(p) = &result.file_path {
                scanned.insert(p.to_string_lossy().into_owned());
            }
            checks.push(result);
        }

        let report = AuditReport {
            project_path: self.project_path.clone(),
            project_type: self.project_type,
            checks,
            execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            files_scanned: scanned.into_iter().collect(),
        };
        tracing::info!(
            path = %self.project_path.display(),
            passed = report.passed_count(),
            failed = report.failed_count(),
            score = report.score(),
            "audit finished"
        );
        report
    }
}

/// A single check never aborts the run; evaluation errors become FAILED results.
pub fn run_one(root: &Path, def: &CheckDefinition) -> CheckResult {
    evaluate(root, def).unwrap_or_else(|e| {
        tracing::warn!(check = %def.id, error = %e, "check errored");
        CheckResult::new(&def.id, CheckStatus::Failed, def.level, format!("Error running check: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn errors_become_failed_results() {
        let dir = tempdir().unwrap();
        let def: CheckDefinition = serde_yaml::from_str("id: bad\npath: ../outside\n").unwrap();
        let r = run_one(dir.path(), &def);
        assert_eq!(r.status, CheckStatus::Failed);
        assert!(r.message.starts_with("Error running check: path escapes project root"));
    }

    #[test]
    fn files_scanned_is_sorted_and_unique() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "hello").unwrap();
        let catalog: Catalog = serde_yaml::from_str(
            "checks:\n  - id: one\n    path: b.txt\n  - id: two\n    type: content_contains\n    path: b.txt\n    patterns: [hello]\n  - id: three\n    path: a.txt\n",
        )
        .unwrap();
        let report = Checker::new(dir.path(), ProjectType::Unknown).run(&catalog);
        assert_eq!(report.files_scanned, vec!["a.txt", "b.txt"]);
        assert_eq!(report.checks.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["one", "two", "three"]);
        assert!(report.execution_time_ms >= 0.0);
    }
}
