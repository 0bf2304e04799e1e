//! Configuration model for nsjoin.
//!
//! [`ActivationSignals`] are the two inputs that decide whether the
//! namespace join runs at all. They are read once, before anything else in
//! the process, and never mutated afterwards.

use std::path::PathBuf;

use crate::constants::{ENV_COMMAND, ENV_EXIT_POLICY, ENV_TARGET_PID};
use crate::error::Result;
use crate::types::ExitPolicy;

/// Inputs handed to a freshly launched process by the exec launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationSignals {
    /// Process whose namespaces are joined. Empty values are `None`.
    pub target_pid: Option<String>,
    /// Command line run once the joins have been attempted.
    pub command: Option<String>,
    /// Raw exit policy selector, if any.
    pub exit_policy: Option<String>,
}

impl ActivationSignals {
    /// Builds signals explicitly, treating empty strings as absent.
    #[must_use]
    pub fn new(target_pid: Option<&str>, command: Option<&str>) -> Self {
        Self {
            target_pid: non_empty(target_pid.map(str::to_owned)),
            command: non_empty(command.map(str::to_owned)),
            exit_policy: None,
        }
    }

    /// Reads the signals from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the signals through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            target_pid: non_empty(lookup(ENV_TARGET_PID)),
            command: non_empty(lookup(ENV_COMMAND)),
            exit_policy: non_empty(lookup(ENV_EXIT_POLICY)),
        }
    }

    /// Sets the exit policy selector.
    #[must_use]
    pub fn with_exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = Some(policy.as_str().to_owned());
        self
    }

    /// Parses the exit policy, defaulting to [`ExitPolicy::AlwaysSuccess`].
    ///
    /// # Errors
    ///
    /// Returns an error if a selector is present but not recognized.
    pub fn exit_policy(&self) -> Result<ExitPolicy> {
        self.exit_policy
            .as_deref()
            .map_or(Ok(ExitPolicy::default()), str::parse)
    }

    /// Environment entries that reproduce these signals in a child process.
    #[must_use]
    pub fn to_env(&self) -> Vec<(String, String)> {
        [
            (ENV_TARGET_PID, &self.target_pid),
            (ENV_COMMAND, &self.command),
            (ENV_EXIT_POLICY, &self.exit_policy),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key.to_owned(), v)))
        .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Root configuration for the nsjoin tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsjoinConfig {
    /// Path to the container state index.
    pub state_file: PathBuf,
}

impl Default for NsjoinConfig {
    fn default() -> Self {
        Self {
            state_file: crate::constants::default_state_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_both_signals() {
        let signals = ActivationSignals::from_lookup(lookup(&[
            (ENV_TARGET_PID, "4821"),
            (ENV_COMMAND, "/bin/echo hi"),
        ]));
        assert_eq!(signals.target_pid.as_deref(), Some("4821"));
        assert_eq!(signals.command.as_deref(), Some("/bin/echo hi"));
        assert_eq!(signals.exit_policy().unwrap(), ExitPolicy::AlwaysSuccess);
    }

    #[test]
    fn empty_values_count_as_absent() {
        let signals =
            ActivationSignals::from_lookup(lookup(&[(ENV_TARGET_PID, ""), (ENV_COMMAND, "")]));
        assert_eq!(signals, ActivationSignals::default());
    }

    #[test]
    fn unknown_exit_policy_is_an_error() {
        let signals = ActivationSignals::from_lookup(lookup(&[(ENV_EXIT_POLICY, "maybe")]));
        assert!(signals.exit_policy().is_err());
    }

    #[test]
    fn to_env_skips_absent_values() {
        let env = ActivationSignals::new(Some("12"), None).to_env();
        assert_eq!(env, vec![(ENV_TARGET_PID.to_owned(), "12".to_owned())]);
    }

    #[test]
    fn to_env_round_trips_through_lookup() {
        let original = ActivationSignals::new(Some("12"), Some("ls -l"))
            .with_exit_policy(ExitPolicy::Propagate);
        let env: HashMap<_, _> = original.to_env().into_iter().collect();
        let parsed = ActivationSignals::from_lookup(|k| env.get(k).cloned());
        assert_eq!(parsed, original);
    }

    #[test]
    fn default_state_file_is_json_in_data_dir() {
        let config = NsjoinConfig::default();
        assert_eq!(config.state_file.file_name().and_then(|n| n.to_str()), Some("state.json"));
    }
}
