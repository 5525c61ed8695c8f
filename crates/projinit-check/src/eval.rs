use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Result};
use projinit_core::{CheckResult, CheckStatus};
use projinit_standards::{CheckDefinition, CheckKind};

/// Join a catalog-relative path onto the project root, refusing anything that could leave it.
pub fn resolve(root: &Path, rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);
    if p.is_absolute() || p.components().any(|c| matches!(c, Component::ParentDir | Component::Prefix(_))) {
        return Err(anyhow!("path escapes project root: {rel}"));
    }
    Ok(root.join(p))
}

fn candidates<'a>(path: &'a str, alternatives: &'a [String]) -> impl Iterator<Item = &'a str> {
    std::iter::once(path).chain(alternatives.iter().map(String::as_str))
}

/// Evaluate one definition against `root`. Errors are for the caller to turn into a FAILED result.
pub fn evaluate(root: &Path, def: &CheckDefinition) -> Result<CheckResult> {
    match &def.kind {
        CheckKind::FileExists { path, alternatives } => file_exists(root, def, path, alternatives),
        CheckKind::DirExists { path, alternatives } => dir_exists(root, def, path, alternatives),
        CheckKind::ContentContains { path, alternatives, patterns } => {
            content_contains(root, def, path, alternatives, patterns)
        }
        CheckKind::AnyExists { paths } => any_exists(root, def, paths),
        CheckKind::Unknown { type_name } => Ok(CheckResult::new(
            &def.id,
            CheckStatus::Skipped,
            def.level,
            format!("Unknown check type: {type_name}"),
        )),
    }
}

fn file_exists(root: &Path, def: &CheckDefinition, path: &str, alternatives: &[String]) -> Result<CheckResult> {
    for candidate in candidates(path, alternatives) {
        if resolve(root, candidate)?.exists() {
            return Ok(CheckResult::new(&def.id, CheckStatus::Passed, def.level, format!("{candidate} exists"))
                .with_file_path(candidate));
        }
    }
    let mut r = CheckResult::new(&def.id, CheckStatus::Failed, def.level, format!("{} - {path} not found", def.description))
        .with_file_path(path);
    if def.template.is_some() {
        r = r.with_suggestion(format!("Run 'projinit update' to create {path}"));
    }
    Ok(r)
}

fn dir_exists(root: &Path, def: &CheckDefinition, path: &str, alternatives: &[String]) -> Result<CheckResult> {
    for candidate in candidates(path, alternatives) {
        if resolve(root, candidate)?.is_dir() {
            return Ok(CheckResult::new(
                &def.id,
                CheckStatus::Passed,
                def.level,
                format!("{candidate} directory exists"),
            )
            .with_file_path(candidate));
        }
    }
    Ok(CheckResult::new(&def.id, CheckStatus::Failed, def.level, format!("{path} directory not found"))
        .with_file_path(path)
        .with_suggestion(format!("Create directory: mkdir -p {path}")))
}

fn content_contains(
    root: &Path,
    def: &CheckDefinition,
    path: &str,
    alternatives: &[String],
    patterns: &[String],
) -> Result<CheckResult> {
    let mut found = None;
    for candidate in candidates(path, alternatives) {
        let full = resolve(root, candidate)?;
        if !full.is_file() {
            continue;
        }
        match std::fs::read_to_string(&full) {
            Ok(content) => {
                found = Some((candidate, content));
                break;
            }
            Err(e) => tracing::debug!(check = %def.id, path = %full.display(), error = %e, "unreadable; trying next"),
        }
    }

    let Some((candidate, content)) = found else {
        return Ok(CheckResult::new(
            &def.id,
            CheckStatus::Skipped,
            def.level,
            format!("File {path} not found, cannot check content"),
        )
        .with_file_path(path));
    };

    let name = Path::new(candidate).file_name().map_or_else(|| candidate.to_string(), |n| n.to_string_lossy().into_owned());
    let missing: Vec<String> = patterns.iter().filter(|p| !content.contains(p.as_str())).cloned().collect();
    if missing.is_empty() {
        return Ok(CheckResult::new(
            &def.id,
            CheckStatus::Passed,
            def.level,
            format!("All required patterns found in {name}"),
        )
        .with_file_path(candidate));
    }

    let mut r = CheckResult::new(
        &def.id,
        CheckStatus::Failed,
        def.level,
        format!("{} - missing: {}", def.description, missing.join(", ")),
    )
    .with_file_path(candidate)
    .with_suggestion(format!("Add missing configuration to {name}"));
    r.missing_patterns = missing;
    Ok(r)
}

fn any_exists(root: &Path, def: &CheckDefinition, paths: &[String]) -> Result<CheckResult> {
    for candidate in paths {
        if resolve(root, candidate)?.exists() {
            return Ok(CheckResult::new(&def.id, CheckStatus::Passed, def.level, format!("Found {candidate}"))
                .with_file_path(candidate));
        }
    }
    let mut r = CheckResult::new(
        &def.id,
        CheckStatus::Failed,
        def.level,
        format!("{} - none of [{}] found", def.description, paths.join(", ")),
    );
    if !paths.is_empty() {
        r = r.with_suggestion(format!("Create one of: {}", paths.join(", ")));
    }
    Ok(r)
}
