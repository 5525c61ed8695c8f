use std::collections::BTreeMap;
use std::path::Path;

use projinit_check::resolve;
use projinit_core::{AuditReport, CheckResult, CheckStatus};
use projinit_standards::{Catalog, CheckDefinition, CheckKind, HookRepo, TomlSection};

use crate::action::{ActionData, UpdateAction};

pub fn is_precommit_path(rel: &str) -> bool {
    let lower = rel.to_ascii_lowercase();
    lower.contains("pre-commit") && (lower.ends_with(".yaml") || lower.ends_with(".yml"))
}

pub fn is_python_manifest(rel: &str) -> bool {
    rel.contains("pyproject.toml")
}

/// Catalog repo blocks with at least one hook id related to a missing pattern.
pub fn hooks_for_patterns(catalog: &Catalog, missing: &[String]) -> Vec<HookRepo> {
    let mut out: Vec<HookRepo> = Vec::new();
    for block in &catalog.precommit_hooks {
        let hit = block.hooks.iter().any(|h| {
            !h.id.is_empty() && missing.iter().any(|p| p.contains(h.id.as_str()) || h.id.contains(p.as_str()))
        });
        if hit && !out.contains(block) {
            out.push(block.clone());
        }
    }
    out
}

pub fn toml_section_for_patterns(catalog: &Catalog, missing: &[String]) -> Option<TomlSection> {
    missing
        .iter()
        .find_map(|p| catalog.toml_sections.iter().find(|s| p.contains(s.name.as_str())))
        .cloned()
}

/// One action per failed check that has a catalog definition and a known fix, in report order.
pub fn plan(report: &AuditReport, catalog: &Catalog, vars: &BTreeMap<String, String>) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    for result in report.checks.iter().filter(|c| c.status == CheckStatus::Failed) {
        let Some(def) = catalog.find_check(&result.id) else {
            continue;
        };
        match action_for(&report.project_path, def, result, catalog, vars) {
            Some(action) => actions.push(action),
            None => tracing::debug!(check = %result.id, "no automatic fix"),
        }
    }
    actions
}

fn action_for(
    root: &Path,
    def: &CheckDefinition,
    result: &CheckResult,
    catalog: &Catalog,
    vars: &BTreeMap<String, String>,
) -> Option<UpdateAction> {
    match &def.kind {
        CheckKind::FileExists { path, .. } => {
            let template = def.template.as_deref()?;
            let target = resolve(root, path).ok()?;
            Some(UpdateAction::create_file(target, template, format!("Create {path} from template"), vars.clone()))
        }
        CheckKind::DirExists { path, .. } => {
            let target = resolve(root, path).ok()?;
            Some(UpdateAction::create_dir(target, format!("Create directory {path}")))
        }
        CheckKind::ContentContains { path, patterns, .. } => {
            let rel = result.file_path.as_ref().map_or_else(|| path.clone(), |p| p.to_string_lossy().into_owned());
            let target = resolve(root, &rel).ok()?;
            let missing = if result.missing_patterns.is_empty() { patterns } else { &result.missing_patterns };

            if is_precommit_path(&rel) {
                let hooks = hooks_for_patterns(catalog, missing);
                if !hooks.is_empty() {
                    return Some(UpdateAction::merge(
                        target,
                        format!("Add missing hooks to {rel}"),
                        ActionData::PrecommitHooks(hooks),
                    ));
                }
            }
            if is_python_manifest(&rel) {
                if let Some(section) = toml_section_for_patterns(catalog, missing) {
                    return Some(UpdateAction::merge(
                        target,
                        format!("Add {} section to {rel}", section.name),
                        ActionData::TomlSection(section),
                    ));
                }
            }
            None
        }
        CheckKind::AnyExists { .. } | CheckKind::Unknown { .. } => None,
    }
}
