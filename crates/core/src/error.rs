use thiserror::Error;

/// Why the persisted task map could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no task blob stored under '{0}'")]
    Missing(String),
    #[error("task blob under '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read task blob: {0}")]
    Storage(#[from] anyhow::Error),
}
