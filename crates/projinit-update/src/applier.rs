use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use projinit_merge::{merge_precommit_config, merge_toml_section};
use serde::Serialize;

use crate::action::{ActionData, ActionType, MergeStrategy, UpdateAction};
use crate::templates::{fallback_body, TemplateRenderer};

/// Whether every, some, or no planned action went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyTally {
    AllApplied,
    SomeApplied,
    NoneApplied,
}

#[derive(Clone, Debug, Serialize)]
pub struct NotApplied {
    pub action: UpdateAction,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<UpdateAction>,
    pub not_applied: Vec<NotApplied>,
    pub backups: Vec<PathBuf>,
    pub dry_run: bool,
}

impl ApplyReport {
    /// An empty plan counts as fully applied.
    pub fn tally(&self) -> ApplyTally {
        match (self.applied.is_empty(), self.not_applied.is_empty()) {
            (_, true) => ApplyTally::AllApplied,
            (true, false) => ApplyTally::NoneApplied,
            (false, false) => ApplyTally::SomeApplied,
        }
    }
}

enum Outcome {
    Applied,
    NoOp(String),
}

/// Applies planned actions in order. Each action stands alone; failures are recorded and the
/// run moves on.
pub struct Updater<'a> {
    pub templates: &'a dyn TemplateRenderer,
    pub dry_run: bool,
    pub backup: bool,
}

impl<'a> Updater<'a> {
    pub fn new(templates: &'a dyn TemplateRenderer) -> Self {
        Self { templates, dry_run: false, backup: true }
    }

    pub fn apply(&self, actions: &[UpdateAction]) -> ApplyReport {
        let mut report = ApplyReport { dry_run: self.dry_run, ..ApplyReport::default() };
        let mut backed_up = BTreeSet::new();
        for action in actions {
            if self.dry_run {
                tracing::info!(path = %action.target.display(), "would {}", action.action_type.as_str());
                report.applied.push(action.clone());
                continue;
            }
            match self.apply_one(action, &mut backed_up, &mut report.backups) {
                Ok(Outcome::Applied) => {
                    tracing::info!(path = %action.target.display(), "{}", action.description);
                    report.applied.push(action.clone());
                }
                Ok(Outcome::NoOp(reason)) => {
                    tracing::debug!(path = %action.target.display(), %reason, "action not applied");
                    report.not_applied.push(NotApplied { action: action.clone(), reason });
                }
                Err(e) => {
                    tracing::warn!(path = %action.target.display(), error = %format!("{e:#}"), "action failed");
                    report.not_applied.push(NotApplied { action: action.clone(), reason: format!("{e:#}") });
                }
            }
        }
        report
    }

    fn apply_one(
        &self,
        action: &UpdateAction,
        backed_up: &mut BTreeSet<PathBuf>,
        backups: &mut Vec<PathBuf>,
    ) -> Result<Outcome> {
        match action.action_type {
            ActionType::Create => self.apply_create(action),
            ActionType::Merge => self.apply_merge(action, backed_up, backups),
            ActionType::Modify => Ok(Outcome::NoOp("modify actions are not supported".to_string())),
            ActionType::Skip => Ok(Outcome::NoOp("skipped".to_string())),
        }
    }

    fn apply_create(&self, action: &UpdateAction) -> Result<Outcome> {
        let target = &action.target;
        if target.exists() && action.merge_strategy == MergeStrategy::SkipExisting {
            return Ok(Outcome::NoOp(format!("{} already exists", target.display())));
        }
        if action.data == ActionData::Directory {
            std::fs::create_dir_all(target).with_context(|| format!("create {}", target.display()))?;
            return Ok(Outcome::Applied);
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let rendered = match &action.source {
            Some(name) => self.templates.render(name, &action.template_vars)?,
            None => None,
        };
        let body = match rendered {
            Some(body) => body,
            None => {
                let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                fallback_body(&name, &action.template_vars)
            }
        };
        std::fs::write(target, body).with_context(|| format!("write {}", target.display()))?;
        Ok(Outcome::Applied)
    }

    /// Only the first merge into a target within one run is backed up, so the backup holds the
    /// user's original bytes.
    fn apply_merge(
        &self,
        action: &UpdateAction,
        backed_up: &mut BTreeSet<PathBuf>,
        backups: &mut Vec<PathBuf>,
    ) -> Result<Outcome> {
        let target = &action.target;
        if !target.is_file() {
            return Ok(Outcome::NoOp(format!("{} does not exist", target.display())));
        }
        let existing = std::fs::read_to_string(target).with_context(|| format!("read {}", target.display()))?;
        let merged = match &action.data {
            ActionData::PrecommitHooks(hooks) => merge_precommit_config(&existing, hooks)
                .with_context(|| format!("merge hooks into {}", target.display()))?,
            ActionData::TomlSection(section) => merge_toml_section(&existing, &section.name, &section.values),
            ActionData::File | ActionData::Directory => {
                return Err(anyhow!("merge action for {} carries nothing to merge", target.display()))
            }
        };
        if merged == existing {
            return Ok(Outcome::NoOp(format!("{} already up to date", target.display())));
        }

        if self.backup && !backed_up.contains(target) {
            backups.push(backup_file(target)?);
            backed_up.insert(target.clone());
        }
        std::fs::write(target, merged).with_context(|| format!("write {}", target.display()))?;
        Ok(Outcome::Applied)
    }
}

/// Copy `path` to `<name>.<YYYYmmdd_HHMMSS>.bak` beside it. An existing backup with that name is
/// never overwritten; a counter is added instead.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("cannot back up {}", path.display()))?
        .to_string_lossy();
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let mut backup = path.with_file_name(format!("{name}.{stamp}.bak"));
    let mut n = 1;
    while backup.exists() {
        backup = path.with_file_name(format!("{name}.{stamp}.{n}.bak"));
        n += 1;
    }
    std::fs::copy(path, &backup).with_context(|| format!("backup {} to {}", path.display(), backup.display()))?;
    Ok(backup)
}
