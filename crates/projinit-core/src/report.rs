use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{CheckLevel, CheckStatus, ProjectType};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub id: String,
    pub status: CheckStatus,
    pub message: String,
    pub level: CheckLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    /// Patterns a failed content check did not find, in catalog order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_patterns: Vec<String>,
}

impl CheckResult {
    pub fn new(id: impl Into<String>, status: CheckStatus, level: CheckLevel, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status,
            message: message.into(),
            level,
            suggestion: None,
            file_path: None,
            missing_patterns: vec![],
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }

    pub fn is_critical(&self) -> bool {
        self.status == CheckStatus::Failed && self.level == CheckLevel::Required
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditReport {
    pub project_path: PathBuf,
    pub project_type: ProjectType,
    pub checks: Vec<CheckResult>,
    pub execution_time_ms: f64,
    pub files_scanned: Vec<String>,
}

/// Aggregate view of a report for formatters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub skipped: usize,
    pub total: usize,
    pub score: f64,
    pub compliant: bool,
}

impl AuditReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(CheckStatus::Passed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(CheckStatus::Failed)
    }

    pub fn warning_count(&self) -> usize {
        self.count(CheckStatus::Warning)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(CheckStatus::Skipped)
    }

    /// Checks that count towards the score (skipped ones do not).
    pub fn total_count(&self) -> usize {
        self.checks.len() - self.skipped_count()
    }

    pub fn score(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 100.0;
        }
        self.passed_count() as f64 / total as f64 * 100.0
    }

    pub fn is_compliant(&self) -> bool {
        !self.checks.iter().any(CheckResult::is_critical)
    }

    pub fn checks_by_level(&self) -> BTreeMap<CheckLevel, Vec<&CheckResult>> {
        let mut out: BTreeMap<CheckLevel, Vec<&CheckResult>> = CheckLevel::ALL.iter().map(|l| (*l, vec![])).collect();
        for check in &self.checks {
            out.entry(check.level).or_default().push(check);
        }
        out
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Failed).collect()
    }

    pub fn actionable_suggestions(&self) -> Vec<(&str, &str)> {
        self.failed_checks()
            .into_iter()
            .filter_map(|c| c.suggestion.as_deref().map(|s| (c.id.as_str(), s)))
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            passed: self.passed_count(),
            failed: self.failed_count(),
            warnings: self.warning_count(),
            skipped: self.skipped_count(),
            total: self.total_count(),
            score: self.score(),
            compliant: self.is_compliant(),
        }
    }
}
