use std::collections::BTreeMap;
use std::path::PathBuf;

use projinit_standards::{HookRepo, TomlSection};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    Modify,
    Merge,
    Skip,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Create => "create",
            ActionType::Modify => "modify",
            ActionType::Merge => "merge",
            ActionType::Skip => "skip",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    Overwrite,
    Smart,
    SkipExisting,
}

/// What an action carries beyond its target.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ActionData {
    File,
    Directory,
    PrecommitHooks(Vec<HookRepo>),
    TomlSection(TomlSection),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdateAction {
    pub action_type: ActionType,
    /// Template name, for creates that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub target: PathBuf,
    pub merge_strategy: MergeStrategy,
    pub description: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub template_vars: BTreeMap<String, String>,
    pub data: ActionData,
}

impl UpdateAction {
    pub fn create_file(target: PathBuf, template: &str, description: String, vars: BTreeMap<String, String>) -> Self {
        Self {
            action_type: ActionType::Create,
            source: Some(template.to_string()),
            target,
            merge_strategy: MergeStrategy::SkipExisting,
            description,
            template_vars: vars,
            data: ActionData::File,
        }
    }

    pub fn create_dir(target: PathBuf, description: String) -> Self {
        Self {
            action_type: ActionType::Create,
            source: None,
            target,
            merge_strategy: MergeStrategy::SkipExisting,
            description,
            template_vars: BTreeMap::new(),
            data: ActionData::Directory,
        }
    }

    pub fn merge(target: PathBuf, description: String, data: ActionData) -> Self {
        Self {
            action_type: ActionType::Merge,
            source: None,
            target,
            merge_strategy: MergeStrategy::Smart,
            description,
            template_vars: BTreeMap::new(),
            data,
        }
    }

    /// Modify and merge touch content the user already has.
    pub fn is_destructive(&self) -> bool {
        matches!(self.action_type, ActionType::Modify | ActionType::Merge)
    }
}
