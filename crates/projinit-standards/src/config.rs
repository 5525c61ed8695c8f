use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use projinit_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{CheckDefinition, HookRepo};

pub const GLOBAL_CONFIG_PATH: &str = "~/.config/projinit/config.yaml";
pub const LOCAL_CONFIG_FILE: &str = ".projinit.yaml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardsConfig {
    /// Check id -> level name. Names other than required/recommended/optional are ignored.
    pub check_overrides: BTreeMap<String, String>,
    pub extra_checks: Vec<CheckDefinition>,
    pub disabled_checks: Vec<String>,
    pub extra_precommit_hooks: Vec<HookRepo>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    #[serde(default)]
    pub overrides: BTreeMap<String, PathBuf>,
}

/// Effective user configuration after folding every layer onto the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub author: AuthorConfig,
    pub python_version: String,
    pub default_license: String,
    pub standards: StandardsConfig,
    pub templates: TemplatesConfig,
    /// Where the last applied layer came from.
    #[serde(skip)]
    pub source: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            author: AuthorConfig::default(),
            python_version: "3.10".to_string(),
            default_license: "MIT".to_string(),
            standards: StandardsConfig::default(),
            templates: TemplatesConfig::default(),
            source: "defaults".to_string(),
        }
    }
}

/// One config file as written by the user; absent scalars leave the lower layer alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub author: AuthorConfig,
    #[serde(deserialize_with = "string_or_number")]
    pub python_version: Option<String>,
    pub default_license: Option<String>,
    pub standards: StandardsConfig,
    pub templates: TemplatesLayer,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplatesLayer {
    pub templates_dir: Option<String>,
    pub overrides: BTreeMap<String, String>,
}

fn string_or_number<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_yaml::Value>::deserialize(de)?;
    Ok(match v {
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

impl UserConfig {
    pub fn overlay(&mut self, layer: ConfigLayer) {
        if layer.author.name.is_some() {
            self.author.name = layer.author.name;
        }
        if layer.author.email.is_some() {
            self.author.email = layer.author.email;
        }
        if let Some(v) = layer.python_version {
            self.python_version = v;
        }
        if let Some(v) = layer.default_license {
            self.default_license = v;
        }

        let s = layer.standards;
        self.standards.check_overrides.extend(s.check_overrides);
        self.standards.extra_checks.extend(s.extra_checks);
        self.standards.disabled_checks.extend(s.disabled_checks);
        self.standards.extra_precommit_hooks.extend(s.extra_precommit_hooks);

        if let Some(dir) = layer.templates.templates_dir {
            self.templates.templates_dir = Some(expand(&dir));
        }
        for (name, path) in layer.templates.overrides {
            self.templates.overrides.insert(name, expand(&path));
        }
    }
}

/// Where the global and local config files live.
pub trait ConfigSource: Send + Sync {
    fn global_path(&self) -> Option<PathBuf>;
    fn local_path(&self, project_root: &Path) -> Option<PathBuf>;
}

/// `~/.config/projinit/config.yaml` and `<project>/.projinit.yaml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfigSource;

impl ConfigSource for DefaultConfigSource {
    fn global_path(&self) -> Option<PathBuf> {
        Some(expand(GLOBAL_CONFIG_PATH))
    }

    fn local_path(&self, project_root: &Path) -> Option<PathBuf> {
        Some(project_root.join(LOCAL_CONFIG_FILE))
    }
}

/// Caller-chosen paths; `None` disables that layer.
#[derive(Clone, Debug, Default)]
pub struct ExplicitConfigSource {
    pub global: Option<PathBuf>,
    pub local: Option<PathBuf>,
}

impl ConfigSource for ExplicitConfigSource {
    fn global_path(&self) -> Option<PathBuf> {
        self.global.clone()
    }

    fn local_path(&self, _project_root: &Path) -> Option<PathBuf> {
        self.local.clone()
    }
}

pub fn load_layer_file(path: &Path) -> Result<Option<ConfigLayer>> {
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&s).map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })?;
    if value.is_null() {
        return Ok(Some(ConfigLayer::default()));
    }
    let layer = serde_yaml::from_value(value).map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })?;
    Ok(Some(layer))
}

/// Fold defaults < global < local. `project_root` defaults to the current directory.
pub fn load_config(source: &dyn ConfigSource, project_root: Option<&Path>) -> Result<UserConfig> {
    let mut config = UserConfig::default();

    if let Some(global) = source.global_path() {
        if let Some(layer) = load_layer_file(&global)? {
            config.overlay(layer);
            config.source = format!("global ({})", global.display());
        }
    }

    let root = match project_root {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::current_dir().ok(),
    };
    if let Some(local) = root.as_deref().and_then(|r| source.local_path(r)) {
        if let Some(layer) = load_layer_file(&local)? {
            config.overlay(layer);
            config.source = format!("local ({})", local.display());
        }
    }

    tracing::debug!(source = %config.source, "user config resolved");
    Ok(config)
}

/// Write the commented example config, refusing to clobber an existing file unless `force`.
pub fn write_example_config(path: &Path, force: bool) -> anyhow::Result<()> {
    use anyhow::{anyhow, Context};

    if path.exists() && !force {
        return Err(anyhow!("{} already exists (use --force to overwrite)", path.display()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub const EXAMPLE_CONFIG: &str = r#"# projinit configuration
# Place this file at ~/.config/projinit/config.yaml (global)
# or .projinit.yaml in your project root (local override)

# Author information for generated files
author:
  name: "Your Name"
  email: "your.email@example.com"

# Default Python version for new projects
python_version: "3.10"

# Default license
default_license: "MIT"

# Standards customization
standards:
  # Override check levels (id: level)
  # Levels: required, recommended, optional
  check_overrides: {}
    # has_claude_md: required

  # Disable specific checks
  disabled_checks: []
    # - has_editorconfig

  # Add custom checks
  extra_checks: []
    # - id: has_makefile
    #   type: file_exists
    #   level: optional
    #   path: Makefile

  # Add custom pre-commit hooks
  extra_precommit_hooks: []
    # - repo: https://github.com/example/hook
    #   rev: v1.0.0
    #   hooks:
    #     - id: example-hook

# Custom templates
templates:
  # templates_dir: ~/.config/projinit/templates
  overrides: {}
    # README.md.j2: ~/.config/projinit/templates/my-readme.j2
"#;
