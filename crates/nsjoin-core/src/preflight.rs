//! Single-thread preflight.
//!
//! `setns(2)` into a mount or pid namespace is only well-defined while the
//! process has exactly one thread. This check runs right before the first
//! namespace handle is opened.

use std::path::Path;

use nsjoin_common::constants::{SELF_STATUS, SELF_TASK_DIR};
use nsjoin_common::error::{NsjoinError, Result};

/// Fails unless the calling process is single-threaded.
///
/// # Errors
///
/// Returns [`NsjoinError::ConcurrencyStarted`] when more than one thread is
/// running, or an I/O error if procfs cannot be read.
pub fn ensure_single_threaded() -> Result<()> {
    let threads = thread_count()?;
    if threads > 1 {
        return Err(NsjoinError::ConcurrencyStarted { threads });
    }
    tracing::debug!(threads, "single-threaded, safe to join");
    Ok(())
}

/// Number of threads in the calling process.
///
/// # Errors
///
/// Returns an error if neither `/proc/self/task` nor `/proc/self/status`
/// yields a count.
pub fn thread_count() -> Result<usize> {
    count_task_entries(Path::new(SELF_TASK_DIR)).or_else(|_| {
        let status = std::fs::read_to_string(SELF_STATUS).map_err(|e| NsjoinError::Io {
            path: SELF_STATUS.into(),
            source: e,
        })?;
        parse_thread_count(&status).ok_or_else(|| NsjoinError::Config {
            message: format!("no Threads: line in {SELF_STATUS}"),
        })
    })
}

fn count_task_entries(dir: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(dir).map_err(|e| NsjoinError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(entries.filter_map(std::result::Result::ok).count())
}

/// Extracts the `Threads:` value from a `/proc/<pid>/status` document.
#[must_use]
pub fn parse_thread_count(status: &str) -> Option<usize> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_threads_line() {
        let status = "Name:\tnsj\nState:\tR (running)\nThreads:\t3\nSigQ:\t0/63\n";
        assert_eq!(parse_thread_count(status), Some(3));
    }

    #[test]
    fn missing_threads_line_is_none() {
        assert_eq!(parse_thread_count("Name:\tnsj\n"), None);
    }

    #[test]
    fn garbage_threads_value_is_none() {
        assert_eq!(parse_thread_count("Threads:\tmany\n"), None);
    }

    #[test]
    fn counts_task_directory_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        for tid in ["100", "101"] {
            std::fs::create_dir(dir.path().join(tid)).expect("mkdir");
        }
        assert_eq!(count_task_entries(dir.path()).expect("count"), 2);
    }

    #[test]
    fn detects_extra_threads() {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            let _ = rx.recv();
        });

        assert!(thread_count().expect("count") >= 2);
        assert!(matches!(
            ensure_single_threaded(),
            Err(NsjoinError::ConcurrencyStarted { .. })
        ));

        drop(tx);
        handle.join().expect("join");
    }
}
