use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use projinit_core::ProjectType;
use projinit_standards::{TemplatesConfig, UserConfig};

/// Renders a named template. `Ok(None)` means the name does not resolve and the caller
/// should fall back to a built-in body.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, vars: &BTreeMap<String, String>) -> Result<Option<String>>;
}

/// Templates on disk: per-name overrides first, then `templates_dir/<name>`.
#[derive(Clone, Debug, Default)]
pub struct FsTemplates {
    pub overrides: BTreeMap<String, PathBuf>,
    pub templates_dir: Option<PathBuf>,
}

impl FsTemplates {
    pub fn from_config(config: &TemplatesConfig) -> Self {
        Self { overrides: config.overrides.clone(), templates_dir: config.templates_dir.clone() }
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if let Some(p) = self.overrides.get(name).filter(|p| p.is_file()) {
            return Some(p.clone());
        }
        let rel = Path::new(name);
        if rel.is_absolute() || rel.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        self.templates_dir.as_ref().map(|d| d.join(rel)).filter(|p| p.is_file())
    }
}

impl TemplateRenderer for FsTemplates {
    fn render(&self, name: &str, vars: &BTreeMap<String, String>) -> Result<Option<String>> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(&path).with_context(|| format!("read template {}", path.display()))?;
        tracing::debug!(template = name, path = %path.display(), "rendering template");
        Ok(Some(substitute(&text, vars)))
    }
}

/// Replace `{{ name }}` placeholders. Unknown names are left as written.
pub fn substitute(text: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match vars.get(key) {
            Some(v) => out.push_str(v),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Variables offered to every template and fallback body.
pub fn template_vars(project_root: &Path, project_type: ProjectType, config: &UserConfig) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    let name = project_root
        .canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| project_root.file_name())
        .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned());
    vars.insert("project_name".to_string(), name);
    vars.insert("project_type".to_string(), project_type.as_str().to_string());
    vars.insert("year".to_string(), chrono::Local::now().year().to_string());
    vars.insert("license".to_string(), config.default_license.clone());
    vars.insert("python_version".to_string(), config.python_version.clone());
    if let Some(n) = &config.author.name {
        vars.insert("author_name".to_string(), n.clone());
    }
    if let Some(e) = &config.author.email {
        vars.insert("author_email".to_string(), e.clone());
    }
    vars
}

const FALLBACK_GITIGNORE: &str = "# Python
__pycache__/
*.py[cod]
*.egg-info/
dist/
build/
.venv/
venv/

# Node
node_modules/

# IDE
.idea/
.vscode/
*.swp

# OS
.DS_Store
Thumbs.db

# Environment
.env
.envrc
";

const FALLBACK_PRECOMMIT: &str = "repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v5.0.0
    hooks:
      - id: end-of-file-fixer
      - id: trailing-whitespace
      - id: check-yaml
";

/// Minimal body for a file whose template is missing, keyed by file name.
pub fn fallback_body(file_name: &str, vars: &BTreeMap<String, String>) -> String {
    let var = |k: &str, default: &str| vars.get(k).cloned().unwrap_or_else(|| default.to_string());
    match file_name.to_ascii_lowercase().as_str() {
        "readme.md" => format!("# {}\n\nProject description.\n", var("project_name", "Project")),
        "license" => {
            let holder = vars.get("author_name").map(|n| format!(" {n}")).unwrap_or_default();
            format!("{} License\n\nCopyright (c) {}{holder}\n", var("license", "MIT"), var("year", ""))
        }
        ".gitignore" => FALLBACK_GITIGNORE.to_string(),
        "claude.md" => format!(
            "# {}\n\nNotes for AI coding assistants working in this repository.\n",
            var("project_name", "Project")
        ),
        ".pre-commit-config.yaml" => FALLBACK_PRECOMMIT.to_string(),
        _ => String::new(),
    }
}
