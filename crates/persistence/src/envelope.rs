//! Versioned envelope format shared by every persisted artifact: a
//! schema-version number on the first line, the JSON payload below.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PersistenceError, Result};

pub const SCHEMA_VERSION: u32 = 1;

/// Serializes `value` as the JSON payload of a versioned envelope,
/// returning the bytes ready to be written (by [`crate::atomic_file`])
/// rather than writing them directly, so a caller can stage several
/// artifacts before committing any of them.
pub fn encode<T: Serialize>(artifact: &'static str, value: &T) -> Result<Vec<u8>> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|source| PersistenceError::Serde { artifact, source })?;
    Ok(format!("{SCHEMA_VERSION}\n{payload}\n").into_bytes())
}

pub fn decode<T: DeserializeOwned>(artifact: &'static str, content: &str) -> Result<T> {
    let mut lines = content.splitn(2, '\n');
    let header = lines
        .next()
        .ok_or(PersistenceError::MissingVersionHeader { artifact })?;
    let version: u32 = header
        .trim()
        .parse()
        .map_err(|_| PersistenceError::MalformedVersionHeader {
            artifact,
            header: header.to_string(),
        })?;
    if version != SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            artifact,
            found: version,
            expected: SCHEMA_VERSION,
        });
    }
    let payload = lines.next().ok_or(PersistenceError::MissingPayload { artifact })?;
    serde_json::from_str(payload).map_err(|source| PersistenceError::Serde { artifact, source })
}

pub fn read_artifact<T: DeserializeOwned>(path: &Path, artifact: &'static str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        operation: "read",
        source,
    })?;
    decode(artifact, &content)
}
