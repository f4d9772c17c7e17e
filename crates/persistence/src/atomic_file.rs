//! Atomic file writes, single-file and grouped, to prevent a crash
//! mid-save from leaving a persisted task network half-written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{PersistenceError, Result};

/// Writes `content` to `path` by writing a temporary sibling file and
/// renaming it into place, so a reader never observes a partially
/// written file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
        path: parent.to_path_buf(),
        operation: "create parent directory",
        source,
    })?;

    let temp_path = write_temp_sibling(parent, content)?;

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        PersistenceError::Io {
            path: path.to_path_buf(),
            operation: "atomic rename",
            source,
        }
    })?;

    Ok(())
}

/// Writes every `(path, content)` pair as a group: all temporary
/// siblings are written and synced first; only once every write has
/// succeeded are the files renamed into place, back to back. If any
/// write fails, every temporary created so far is removed and the
/// originals are left untouched — the failure never leaves a partial
/// group on disk.
pub fn write_atomic_group(files: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    let mut temps = Vec::with_capacity(files.len());

    for (path, content) in files {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
        match fs::create_dir_all(parent)
            .map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                operation: "create parent directory",
                source,
            })
            .and_then(|()| write_temp_sibling(parent, content))
        {
            Ok(temp_path) => temps.push(temp_path),
            Err(err) => {
                for temp in &temps {
                    let _ = fs::remove_file(temp);
                }
                return Err(err);
            }
        }
    }

    for ((path, _), temp_path) in files.iter().zip(&temps) {
        fs::rename(temp_path, path).map_err(|source| PersistenceError::Io {
            path: path.clone(),
            operation: "atomic rename",
            source,
        })?;
    }

    Ok(())
}

fn write_temp_sibling(parent: &Path, content: &[u8]) -> Result<PathBuf> {
    let temp_name = format!(".{}.tmp", Uuid::new_v4());
    let temp_path = parent.join(&temp_name);

    let result = (|| -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|source| PersistenceError::Io {
                path: temp_path.clone(),
                operation: "create temporary file",
                source,
            })?;

        file.write_all(content).map_err(|source| PersistenceError::Io {
            path: temp_path.clone(),
            operation: "write temporary file",
            source,
        })?;

        file.sync_all().map_err(|source| PersistenceError::Io {
            path: temp_path.clone(),
            operation: "sync temporary file",
            source,
        })?;

        Ok(())
    })();

    match result {
        Ok(()) => Ok(temp_path),
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_roundtrips_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        write_atomic(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn atomic_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("file.txt");
        write_atomic(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn atomic_write_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn group_write_commits_all_files_together() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        write_atomic_group(&[(a.clone(), b"one".to_vec()), (b.clone(), b"two".to_vec())]).unwrap();
        assert_eq!(fs::read_to_string(&a).unwrap(), "one");
        assert_eq!(fs::read_to_string(&b).unwrap(), "two");
    }

    #[test]
    fn group_write_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        write_atomic_group(&[(a, b"x".to_vec())]).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
