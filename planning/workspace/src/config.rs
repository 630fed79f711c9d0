//! Tunable behavior of a [`Workspace`](crate::Workspace).
//!
//! Defaults are meant for interactive tooling. Hosts may override them programmatically or, for
//! the boolean switches, through environment variables read by [`WorkspaceConfig::from_env`]:
//!
//! - `PDDL_WORKSPACE_BUILTIN_PARSERS` (default `true`)
//! - `PDDL_WORKSPACE_DIRTY_DEPENDENTS` (default `true`)

use std::str::FromStr;

/// Name of the root of every type hierarchy.
pub const DEFAULT_TYPE_ROOT: &str = "object";

const BUILTIN_PARSERS_ENV: &str = "PDDL_WORKSPACE_BUILTIN_PARSERS";
const DIRTY_DEPENDENTS_ENV: &str = "PDDL_WORKSPACE_DIRTY_DEPENDENTS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Sentinel vertex that every parentless type inherits from.
    pub type_root: String,
    /// If false, only registered parsers are tried and unmatched files are stored as unknown.
    pub builtin_parsers: bool,
    /// If true, accepting a new version of a domain marks the parsed problems that refer to it as dirty.
    pub dirty_dependents: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            type_root: DEFAULT_TYPE_ROOT.to_string(),
            builtin_parsers: true,
            dirty_dependents: true,
        }
    }
}

impl WorkspaceConfig {
    /// Default configuration, where the switches may be overridden by environment variables.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            builtin_parsers: read_env(BUILTIN_PARSERS_ENV, default.builtin_parsers),
            dirty_dependents: read_env(DIRTY_DEPENDENTS_ENV, default.dirty_dependents),
            ..default
        }
    }

    pub fn with_type_root(mut self, root: impl Into<String>) -> Self {
        self.type_root = root.into();
        self
    }
}

/// Reads a parameter from the environment. An unset variable silently yields the default,
/// an unparsable one is reported before falling back to the default.
fn read_env<T: FromStr + std::fmt::Debug>(env: &str, default: T) -> T {
    match std::env::var(env) {
        Ok(value) => match T::from_str(value.trim()) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("could not parse \"{value}\" for environment variable {env}. Using default: {default:?}");
                default
            }
        },
        Err(std::env::VarError::NotPresent) => default,
        Err(err) => {
            tracing::warn!("{env}: {err}. Using default: {default:?}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let conf = WorkspaceConfig::default();
        assert_eq!(conf.type_root, "object");
        assert!(conf.builtin_parsers);
        assert!(conf.dirty_dependents);
    }

    #[test]
    fn unparsable_values_fall_back_to_default() {
        // variable names are private to this test to avoid interfering with other tests
        unsafe {
            std::env::set_var("PDDL_WORKSPACE_TEST_FLAG_INVALID", "maybe");
            std::env::set_var("PDDL_WORKSPACE_TEST_FLAG_VALID", "false");
        }
        assert!(read_env("PDDL_WORKSPACE_TEST_FLAG_INVALID", true));
        assert!(!read_env("PDDL_WORKSPACE_TEST_FLAG_VALID", true));
        assert!(read_env("PDDL_WORKSPACE_TEST_FLAG_UNSET", true));
    }

    #[test]
    fn custom_root() {
        let conf = WorkspaceConfig::default().with_type_root("thing");
        assert_eq!(conf.type_root, "thing");
    }
}
