//! Persistent state index.
//!
//! A JSON document listing known containers and the host pid of their init
//! process. The exec path only reads it. [`save_state`] is the writer for
//! whatever starts containers and records them here.

use std::path::Path;

use nsjoin_common::error::{NsjoinError, Result};
use nsjoin_common::types::{ContainerState, TargetPid};
use serde::{Deserialize, Serialize};

/// Persistent record of a container's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Container identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Current lifecycle state.
    pub state: ContainerState,
    /// Host PID of the init process (if running).
    pub pid: Option<u32>,
    /// Command the container was started with.
    #[serde(default)]
    pub command: String,
    /// ISO-8601 timestamp of creation.
    #[serde(default)]
    pub created_at: String,
}

/// Top-level state document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    /// All known containers.
    pub containers: Vec<StateEntry>,
}

/// Loads the state index from disk.
///
/// A missing file is an empty index.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_state(path: &Path) -> Result<StateFile> {
    tracing::debug!(path = %path.display(), "loading state index");
    if !path.exists() {
        return Ok(StateFile::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| NsjoinError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Persists the state index to disk atomically.
///
/// Nothing in `nsj` writes the index; this is the entry point for the
/// tooling that does, so the document it reads and the one written stay
/// in one format.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_state(path: &Path, state: &StateFile) -> Result<()> {
    tracing::debug!(path = %path.display(), "saving state index");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| NsjoinError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| NsjoinError::Io {
        path: tmp.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp, path).map_err(|e| NsjoinError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Finds a container by id, then by name.
#[must_use]
pub fn find_entry<'a>(state: &'a StateFile, id_or_name: &str) -> Option<&'a StateEntry> {
    state
        .containers
        .iter()
        .find(|c| c.id == id_or_name)
        .or_else(|| state.containers.iter().find(|c| c.name == id_or_name))
}

/// Returns the init pid of a running container.
///
/// # Errors
///
/// Returns `NotFound` for unknown containers, and a configuration error if
/// the container is not running or has no recorded pid.
pub fn running_pid(state: &StateFile, id_or_name: &str) -> Result<TargetPid> {
    let entry = find_entry(state, id_or_name).ok_or_else(|| NsjoinError::NotFound {
        kind: "container",
        id: id_or_name.to_owned(),
    })?;
    if entry.state != ContainerState::Running {
        return Err(NsjoinError::Config {
            message: format!("container {} is {}, not running", entry.id, entry.state),
        });
    }
    entry
        .pid
        .filter(|&pid| pid != 0)
        .map(TargetPid::from_raw)
        .ok_or_else(|| NsjoinError::Config {
            message: format!("container {} has no recorded pid", entry.id),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, state: ContainerState, pid: Option<u32>) -> StateEntry {
        StateEntry {
            id: id.into(),
            name: name.into(),
            state,
            pid,
            command: "/bin/sh".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    fn sample() -> StateFile {
        StateFile {
            containers: vec![
                entry("a1b2c3", "web", ContainerState::Running, Some(4821)),
                entry("d4e5f6", "db", ContainerState::Stopped, None),
                entry("0a0b0c", "ghost", ContainerState::Running, None),
            ],
        }
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = load_state(&dir.path().join("state.json")).expect("load");
        assert!(state.containers.is_empty());
    }

    #[test]
    fn save_creates_parent_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("state.json");
        save_state(&path, &sample()).expect("save");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_state(&path).expect("load"), sample());
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            load_state(&path),
            Err(NsjoinError::Serialization { .. })
        ));
    }

    #[test]
    fn finds_by_id_or_name() {
        let state = sample();
        assert_eq!(find_entry(&state, "a1b2c3").map(|e| e.name.as_str()), Some("web"));
        assert_eq!(find_entry(&state, "db").map(|e| e.id.as_str()), Some("d4e5f6"));
        assert!(find_entry(&state, "nope").is_none());
    }

    #[test]
    fn running_pid_of_running_container() {
        assert_eq!(running_pid(&sample(), "web").expect("pid").as_raw(), 4821);
    }

    #[test]
    fn running_pid_errors() {
        let state = sample();
        assert!(matches!(
            running_pid(&state, "nope"),
            Err(NsjoinError::NotFound { .. })
        ));
        assert!(matches!(
            running_pid(&state, "db"),
            Err(NsjoinError::Config { .. })
        ));
        assert!(matches!(
            running_pid(&state, "ghost"),
            Err(NsjoinError::Config { .. })
        ));
    }
}
