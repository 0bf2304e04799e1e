//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable carrying the target process identifier.
pub const ENV_TARGET_PID: &str = "NSJOIN_TARGET_PID";

/// Environment variable carrying the command line to run after joining.
pub const ENV_COMMAND: &str = "NSJOIN_COMMAND";

/// Environment variable selecting the exit policy of the joined process.
pub const ENV_EXIT_POLICY: &str = "NSJOIN_EXIT_POLICY";

/// Environment variable overriding the state index location.
pub const ENV_STATE_FILE: &str = "NSJOIN_STATE_FILE";

/// Mount point of procfs.
pub const PROC_ROOT: &str = "/proc";

/// Symlink to the running executable, used to re-launch ourselves.
pub const SELF_EXE: &str = "/proc/self/exe";

/// Directory listing one entry per thread of the calling process.
pub const SELF_TASK_DIR: &str = "/proc/self/task";

/// Status file of the calling process.
pub const SELF_STATUS: &str = "/proc/self/status";

/// Command interpreter used to run the command line.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Default base directory for nsjoin data on Linux with root access.
pub const SYSTEM_DATA_DIR: &str = "/var/lib/nsjoin";

/// Returns the data directory, preferring `$HOME/.nsjoin` and falling back
/// to `/var/lib/nsjoin`.
fn resolve_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        let user_dir = PathBuf::from(home).join(".nsjoin");
        if std::fs::create_dir_all(&user_dir).is_ok() {
            return user_dir;
        }
    }
    PathBuf::from(SYSTEM_DATA_DIR)
}

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the resolved data directory for this session.
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(resolve_data_dir)
}

/// Returns the default state index path.
pub fn default_state_file() -> PathBuf {
    data_dir().join("state.json")
}

