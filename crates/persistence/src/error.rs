use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to {operation} at {path}: {source}")]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize {artifact}: {source}")]
    Serde {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{artifact} has schema version {found}, this build only understands {expected}")]
    UnsupportedVersion {
        artifact: &'static str,
        found: u32,
        expected: u32,
    },

    #[error("{artifact} is missing its schema-version header line")]
    MissingVersionHeader { artifact: &'static str },

    #[error("{artifact}'s schema-version header is not a valid integer: {header:?}")]
    MalformedVersionHeader { artifact: &'static str, header: String },

    #[error("{artifact} is missing its payload line")]
    MissingPayload { artifact: &'static str },

    #[error("persisted state is inconsistent: {detail}")]
    InconsistentState { detail: String },
}
