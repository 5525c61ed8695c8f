use std::path::{Path, PathBuf};

use projinit_core::{Error, Result};

use crate::catalog::Catalog;

/// Built-in layers, in the order they are listed.
const BUILTIN_LAYERS: &[(&str, &str)] = &[
    ("base", include_str!("../defaults/base.yaml")),
    ("python", include_str!("../defaults/python.yaml")),
    ("node", include_str!("../defaults/node.yaml")),
    ("infra", include_str!("../defaults/infra.yaml")),
    ("documentation", include_str!("../defaults/documentation.yaml")),
    ("lab", include_str!("../defaults/lab.yaml")),
];

/// Where standards layers come from. A layer that does not exist yields `Ok(None)`.
pub trait CatalogSource: Send + Sync {
    fn read_layer(&self, name: &str) -> Result<Option<String>>;
    fn layer_names(&self) -> Vec<String>;
}

/// Layers compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCatalog;

impl CatalogSource for BuiltinCatalog {
    fn read_layer(&self, name: &str) -> Result<Option<String>> {
        Ok(BUILTIN_LAYERS.iter().find(|(n, _)| *n == name).map(|(_, s)| s.to_string()))
    }

    fn layer_names(&self) -> Vec<String> {
        BUILTIN_LAYERS.iter().map(|(n, _)| n.to_string()).collect()
    }
}

/// Layers read from `<root>/<name>.yaml`.
#[derive(Clone, Debug)]
pub struct DirCatalog {
    pub root: PathBuf,
}

impl DirCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn layer_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.yaml"))
    }
}

impl CatalogSource for DirCatalog {
    fn read_layer(&self, name: &str) -> Result<Option<String>> {
        let path = self.layer_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(&path).map(Some).map_err(|source| Error::Io { path, source })
    }

    fn layer_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return vec![];
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| is_layer_file(p))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

/// Parse one layer. Empty documents are an empty catalog; anything unparseable is fatal.
pub fn parse_layer(name: &str, text: &str) -> Result<Catalog> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|source| Error::CatalogParse { layer: name.to_string(), source })?;
    if value.is_null() {
        return Ok(Catalog::default());
    }
    serde_yaml::from_value(value).map_err(|source| Error::CatalogParse { layer: name.to_string(), source })
}

/// Load a named layer, treating a missing layer as contributing nothing.
pub fn load_layer(source: &dyn CatalogSource, name: &str) -> Result<Catalog> {
    match source.read_layer(name)? {
        Some(text) => {
            tracing::debug!(layer = name, "standards layer loaded");
            parse_layer(name, &text)
        }
        None => {
            tracing::debug!(layer = name, "standards layer missing; skipping");
            Ok(Catalog::default())
        }
    }
}

/// Every layer the source knows about, parsed, in listing order.
pub fn load_all_layers(source: &dyn CatalogSource) -> Result<Vec<(String, Catalog)>> {
    source
        .layer_names()
        .into_iter()
        .map(|name| {
            let catalog = load_layer(source, &name)?;
            Ok((name, catalog))
        })
        .collect()
}

pub fn is_layer_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "yaml")
}
