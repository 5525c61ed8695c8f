use std::fmt::Write;

use projinit_core::{AuditReport, CheckStatus, DetectionResult};
use projinit_update::{ApplyReport, UpdateAction};

fn status_tag(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Passed => "PASS",
        CheckStatus::Failed => "FAIL",
        CheckStatus::Warning => "WARN",
        CheckStatus::Skipped => "SKIP",
    }
}

pub fn render_detection(r: &DetectionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Type: {} ({})", r.project_type, r.project_type.display_name());
    let _ = writeln!(out, "Confidence: {:.0}%", r.confidence * 100.0);
    if r.markers_found.is_empty() {
        let _ = writeln!(out, "Markers: none");
    } else {
        let _ = writeln!(out, "Markers: {}", r.markers_found.join(", "));
    }
    out
}

/// Checks grouped by level. Passing checks are listed only when `verbose`.
pub fn render_report(report: &AuditReport, verbose: bool) -> String {
    let mut out = String::new();
    let s = report.summary();
    let _ = writeln!(out, "Project: {}", report.project_path.display());
    let _ = writeln!(out, "Type: {}", report.project_type.display_name());
    let _ = writeln!(
        out,
        "Score: {:.1}% ({} passed, {} failed, {} warnings, {} skipped)",
        s.score, s.passed, s.failed, s.warnings, s.skipped
    );
    let _ = writeln!(out, "Status: {}", if s.compliant { "COMPLIANT" } else { "NON-COMPLIANT" });

    for (level, checks) in report.checks_by_level() {
        let shown: Vec<_> = checks.into_iter().filter(|c| verbose || !c.is_passed()).collect();
        if shown.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n[{level}]");
        for c in shown {
            let _ = writeln!(out, "  {} {}: {}", status_tag(c.status), c.id, c.message);
        }
    }

    let suggestions = report.actionable_suggestions();
    if !suggestions.is_empty() {
        let _ = writeln!(out, "\nSuggestions:");
        for (id, suggestion) in suggestions {
            let _ = writeln!(out, "  - {id}: {suggestion}");
        }
    }
    let _ = writeln!(out, "\nCompleted in {:.1} ms", report.execution_time_ms);
    out
}

pub fn render_plan(actions: &[UpdateAction]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Planned actions ({}):", actions.len());
    for a in actions {
        let marker = if a.is_destructive() { " (modifies existing file)" } else { "" };
        let _ = writeln!(out, "  [{}] {}{marker}", a.action_type.as_str(), a.description);
    }
    out
}

pub fn render_apply(report: &ApplyReport) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "Would apply" } else { "Applied" };
    let _ = writeln!(out, "{verb} {} action(s)", report.applied.len());
    for a in &report.applied {
        let _ = writeln!(out, "  + {}", a.description);
    }
    if !report.not_applied.is_empty() {
        let _ = writeln!(out, "Not applied ({}):", report.not_applied.len());
        for n in &report.not_applied {
            let _ = writeln!(out, "  - {}: {}", n.action.description, n.reason);
        }
    }
    for b in &report.backups {
        let _ = writeln!(out, "Backup: {}", b.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use projinit_core::{CheckLevel, CheckResult, ProjectType};
    use std::collections::BTreeSet;

    fn report() -> AuditReport {
        AuditReport {
            project_path: "/work/demo".into(),
            project_type: ProjectType::PythonLib,
            checks: vec![
                CheckResult::new("has_readme", CheckStatus::Passed, CheckLevel::Required, "README.md exists"),
                CheckResult::new("has_license", CheckStatus::Failed, CheckLevel::Required, "License file - LICENSE not found")
                    .with_suggestion("Run 'projinit update' to create LICENSE"),
            ],
            execution_time_ms: 1.25,
            files_scanned: vec![],
        }
    }

    #[test]
    fn report_hides_passes_unless_verbose() {
        let quiet = render_report(&report(), false);
        assert!(quiet.contains("Status: NON-COMPLIANT"));
        assert!(quiet.contains("FAIL has_license"));
        assert!(!quiet.contains("PASS has_readme"));
        assert!(quiet.contains("  - has_license: Run 'projinit update' to create LICENSE"));
        assert!(render_report(&report(), true).contains("PASS has_readme"));
    }

    #[test]
    fn detection_lists_markers() {
        let r = DetectionResult {
            project_type: ProjectType::Lab,
            confidence: 0.8,
            markers_found: vec!["labs/".into(), "exercises/".into()],
            markers_checked: BTreeSet::new(),
        };
        let text = render_detection(&r);
        assert!(text.starts_with("Type: lab (Lab/Tutorial)\n"));
        assert!(text.contains("Confidence: 80%"));
        assert!(text.contains("Markers: labs/, exercises/"));
    }
}
