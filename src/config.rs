//! Runtime configuration.

use std::env;

/// Name of the environment variable that forces pseudo-random node ids.
pub const PSEUDO_NODE_ENV: &str = "UNIQID_PSEUDO_NODE";

/// Runtime options of the process-wide generators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Config {
    /// Never read hardware addresses; derive the node id from random bits instead.
    pub pseudo_node: bool,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `UNIQID_PSEUDO_NODE` set to `1`, `true`, `yes`, or `on` (in any letter case) enables
    /// [`pseudo_node`](Self::pseudo_node). Any other value, or no value, leaves it disabled.
    pub fn from_env() -> Self {
        Self {
            pseudo_node: env::var(PSEUDO_NODE_ENV).is_ok_and(|v| is_truthy(&v)),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|e| value.trim().eq_ignore_ascii_case(e))
}

#[cfg(test)]
mod tests {
    use super::{is_truthy, Config, PSEUDO_NODE_ENV};
    use std::env;

    /// Recognizes truthy flag values
    #[test]
    fn recognizes_truthy_flag_values() {
        for e in ["1", "true", "TRUE", "Yes", "on", " on "] {
            assert!(is_truthy(e), "{e}");
        }
        for e in ["", "0", "false", "no", "off", "enabled"] {
            assert!(!is_truthy(e), "{e}");
        }
    }

    /// Reads the pseudo node flag from the environment
    #[test]
    fn reads_the_pseudo_node_flag_from_the_environment() {
        env::set_var(PSEUDO_NODE_ENV, "yes");
        let enabled = Config::from_env();
        env::set_var(PSEUDO_NODE_ENV, "off");
        let disabled = Config::from_env();
        env::remove_var(PSEUDO_NODE_ENV);
        let unset = Config::from_env();

        assert_eq!(enabled, Config { pseudo_node: true });
        assert_eq!(disabled, Config { pseudo_node: false });
        assert_eq!(unset, Config::default());
    }
}
