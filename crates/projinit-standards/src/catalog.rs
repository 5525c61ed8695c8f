use std::collections::BTreeMap;
use std::hash::Hash;

use indexmap::IndexMap;
use projinit_core::{CheckLevel, ProjectType};
use serde::{Deserialize, Serialize};

/// One rule from the standards catalog. The check kind is a closed set; unrecognized
/// `type` strings are kept as [`CheckKind::Unknown`] so the checker can report them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCheck", into = "RawCheck")]
pub struct CheckDefinition {
    pub id: String,
    pub kind: CheckKind,
    pub level: CheckLevel,
    pub description: String,
    pub template: Option<String>,
    pub applies_to: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CheckKind {
    FileExists { path: String, alternatives: Vec<String> },
    DirExists { path: String, alternatives: Vec<String> },
    ContentContains { path: String, alternatives: Vec<String>, patterns: Vec<String> },
    AnyExists { paths: Vec<String> },
    Unknown { type_name: String },
}

impl CheckKind {
    pub fn type_name(&self) -> &str {
        match self {
            CheckKind::FileExists { .. } => "file_exists",
            CheckKind::DirExists { .. } => "dir_exists",
            CheckKind::ContentContains { .. } => "content_contains",
            CheckKind::AnyExists { .. } => "any_exists",
            CheckKind::Unknown { type_name } => type_name,
        }
    }

    pub fn primary_path(&self) -> Option<&str> {
        match self {
            CheckKind::FileExists { path, .. }
            | CheckKind::DirExists { path, .. }
            | CheckKind::ContentContains { path, .. } => Some(path),
            CheckKind::AnyExists { .. } | CheckKind::Unknown { .. } => None,
        }
    }
}

impl CheckDefinition {
    pub fn applies_to_type(&self, project_type: ProjectType) -> bool {
        match &self.applies_to {
            None => true,
            Some(types) => types.iter().any(|t| t == project_type.as_str()),
        }
    }
}

/// Wire shape of a check record as it appears in YAML.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct RawCheck {
    id: String,
    #[serde(rename = "type", default = "default_check_type")]
    check_type: String,
    #[serde(default)]
    level: CheckLevel,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    applies_to: Option<Vec<String>>,
}

fn default_check_type() -> String {
    "file_exists".to_string()
}

impl TryFrom<RawCheck> for CheckDefinition {
    type Error = String;

    fn try_from(raw: RawCheck) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err("check definition missing id".to_string());
        }
        let require_path = |path: Option<String>| {
            path.filter(|p| !p.trim().is_empty())
                .ok_or_else(|| format!("check `{}` of type {} requires a path", raw.id, raw.check_type))
        };
        let kind = match raw.check_type.as_str() {
            "file_exists" => CheckKind::FileExists { path: require_path(raw.path.clone())?, alternatives: raw.alternatives },
            "dir_exists" => CheckKind::DirExists { path: require_path(raw.path.clone())?, alternatives: raw.alternatives },
            "content_contains" => CheckKind::ContentContains {
                path: require_path(raw.path.clone())?,
                alternatives: raw.alternatives,
                patterns: raw.patterns,
            },
            "any_exists" => CheckKind::AnyExists { paths: raw.paths },
            other => CheckKind::Unknown { type_name: other.to_string() },
        };
        Ok(CheckDefinition {
            id: raw.id,
            kind,
            level: raw.level,
            description: raw.description,
            template: raw.template,
            applies_to: raw.applies_to,
        })
    }
}

impl From<CheckDefinition> for RawCheck {
    fn from(def: CheckDefinition) -> Self {
        let mut raw = RawCheck {
            id: def.id,
            check_type: def.kind.type_name().to_string(),
            level: def.level,
            description: def.description,
            template: def.template,
            applies_to: def.applies_to,
            ..RawCheck::default()
        };
        match def.kind {
            CheckKind::FileExists { path, alternatives } | CheckKind::DirExists { path, alternatives } => {
                raw.path = Some(path);
                raw.alternatives = alternatives;
            }
            CheckKind::ContentContains { path, alternatives, patterns } => {
                raw.path = Some(path);
                raw.alternatives = alternatives;
                raw.patterns = patterns;
            }
            CheckKind::AnyExists { paths } => raw.paths = paths,
            CheckKind::Unknown { .. } => {}
        }
        raw
    }
}

/// A pre-commit repository block: `{repo, rev, hooks: [{id, ...}]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HookRepo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

impl HookRepo {
    /// Catalog identity: explicit `id` when present, else the repository URL.
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.repo)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// A TOML tool section the updater may append, e.g. `[tool.ruff]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TomlSection {
    pub name: String,
    #[serde(default)]
    pub values: IndexMap<String, toml::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub checks: Vec<CheckDefinition>,
    #[serde(default)]
    pub precommit_hooks: Vec<HookRepo>,
    #[serde(default)]
    pub toml_sections: Vec<TomlSection>,
    /// Any other top-level key; overlays replace these wholesale.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Catalog {
    pub fn find_check(&self, id: &str) -> Option<&CheckDefinition> {
        self.checks.iter().find(|c| c.id == id)
    }

    pub fn checks_for_type(&self, project_type: ProjectType) -> Vec<&CheckDefinition> {
        self.checks.iter().filter(|c| c.applies_to_type(project_type)).collect()
    }

    pub fn check_ids(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Layer `overlay` onto `base` without touching either input.
///
/// Identity-keyed lists (`checks`, `precommit_hooks`, `toml_sections`) keep the first
/// record seen for each identity; every other key is replaced by the overlay's value.
pub fn merge_catalogs(base: &Catalog, overlay: &Catalog) -> Catalog {
    let mut extra = base.extra.clone();
    for (k, v) in &overlay.extra {
        extra.insert(k.clone(), v.clone());
    }
    Catalog {
        checks: merge_keyed(&base.checks, &overlay.checks, |c| c.id.clone()),
        precommit_hooks: merge_keyed(&base.precommit_hooks, &overlay.precommit_hooks, |h| h.identity().to_string()),
        toml_sections: merge_keyed(&base.toml_sections, &overlay.toml_sections, |s| s.name.clone()),
        extra,
    }
}

pub(crate) fn merge_keyed<T, K, F>(base: &[T], overlay: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut merged: IndexMap<K, T> = IndexMap::new();
    for item in base.iter().chain(overlay) {
        merged.entry(key(item)).or_insert_with(|| item.clone());
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(yaml: &str) -> Catalog {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn parses_each_check_kind() {
        let c = catalog(
            r#"
checks:
  - id: readme
    path: README.md
    alternatives: [README.rst]
    template: README.md.j2
  - id: src
    type: dir_exists
    path: src
    level: recommended
  - id: ruff
    type: content_contains
    path: pyproject.toml
    patterns: ["[tool.ruff]"]
    applies_to: [python-cli]
  - id: lock
    type: any_exists
    paths: [package-lock.json, yarn.lock]
  - id: weird
    type: glob_matches
"#,
        );
        assert_eq!(c.checks.len(), 5);
        assert!(matches!(&c.checks[0].kind, CheckKind::FileExists { path, alternatives } if path == "README.md" && alternatives.len() == 1));
        assert_eq!(c.checks[0].level, CheckLevel::Required);
        assert_eq!(c.checks[1].level, CheckLevel::Recommended);
        assert!(matches!(&c.checks[2].kind, CheckKind::ContentContains { patterns, .. } if patterns == &vec!["[tool.ruff]".to_string()]));
        assert!(matches!(&c.checks[3].kind, CheckKind::AnyExists { paths } if paths.len() == 2));
        assert_eq!(c.checks[4].kind.type_name(), "glob_matches");
    }

    #[test]
    fn path_is_required_for_path_based_kinds() {
        let res: Result<Catalog, _> = serde_yaml::from_str("checks:\n  - id: x\n    type: dir_exists\n");
        assert!(res.is_err());
    }

    #[test]
    fn applies_to_filters_by_type_name() {
        let c = catalog("checks:\n  - id: a\n    path: a\n  - id: b\n    path: b\n    applies_to: [python-lib]\n");
        let ids: Vec<_> = c.checks_for_type(ProjectType::PythonCli).iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(c.checks_for_type(ProjectType::PythonLib).len(), 2);
    }

    #[test]
    fn merge_keeps_first_definition_per_id() {
        let base = catalog("checks:\n  - id: c1\n    path: a\n    level: required\n");
        let overlay = catalog("checks:\n  - id: c1\n    path: b\n    level: optional\n  - id: c2\n    path: c\n");
        let merged = merge_catalogs(&base, &overlay);
        assert_eq!(merged.check_ids(), vec!["c1", "c2"]);
        assert_eq!(merged.checks[0].level, CheckLevel::Required);
    }

    #[test]
    fn merge_does_not_touch_base() {
        let base = catalog("checks:\n  - id: c1\n    path: a\nowner: base\n");
        let snapshot = base.clone();
        let overlay = catalog("checks:\n  - id: c2\n    path: b\nowner: overlay\n");
        let merged = merge_catalogs(&base, &overlay);
        assert_eq!(base, snapshot);
        assert_eq!(merged.extra["owner"], serde_yaml::Value::from("overlay"));
    }

    #[test]
    fn layered_merge_is_order_stable() {
        let base = catalog("checks:\n  - id: a\n    path: a\n");
        let ty = catalog("checks:\n  - id: b\n    path: b\n  - id: a\n    path: z\n");
        let over = catalog("checks:\n  - id: c\n    path: c\n  - id: b\n    path: z\n");

        let sequential = merge_catalogs(&merge_catalogs(&base, &ty), &over);
        let grouped = merge_catalogs(&base, &merge_catalogs(&ty, &over));
        assert_eq!(sequential.check_ids(), grouped.check_ids());
        assert_eq!(sequential.check_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn hook_blocks_are_keyed_by_repo() {
        let base = catalog("precommit_hooks:\n  - repo: https://a\n    hooks: [{id: one}]\n  - repo: https://b\n");
        let overlay = catalog("precommit_hooks:\n  - repo: https://a\n    hooks: [{id: two}]\n  - repo: https://c\n");
        let merged = merge_catalogs(&base, &overlay);
        let repos: Vec<_> = merged.precommit_hooks.iter().map(|h| h.repo.as_str()).collect();
        assert_eq!(repos, vec!["https://a", "https://b", "https://c"]);
        assert_eq!(merged.precommit_hooks[0].hooks[0].id, "one");
    }

    #[test]
    fn definitions_serialize_back_to_wire_shape() {
        let c = catalog("checks:\n  - id: lock\n    type: any_exists\n    paths: [yarn.lock]\n");
        let yaml = serde_yaml::to_string(&c.checks[0]).unwrap();
        assert!(yaml.contains("type: any_exists"));
        assert!(!yaml.contains("path:"));
    }
}
