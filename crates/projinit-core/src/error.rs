use std::path::PathBuf;

/// Errors surfaced to callers. Per-check and per-action failures never become one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} is not a directory", .0.display())]
    InvalidPath(PathBuf),

    #[error("could not detect project type for {}; pass an explicit type", .0.display())]
    UndetectedType(PathBuf),

    #[error("unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("failed to load standards layer `{layer}`: {source}")]
    CatalogParse {
        layer: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
