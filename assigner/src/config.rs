//! Assigner configuration

use blueprint::PolicyConfig;
use std::path::PathBuf;

/// Configuration for a translation run
#[derive(Debug, Clone)]
pub struct AssignerConfig {
    /// Circuit size and column limits
    pub policy: PolicyConfig,
    /// Run the mock prover after the last instruction
    pub check_validity: bool,
    /// Directory the circuit and assignment table are written to
    pub output_dir: PathBuf,
}

impl AssignerConfig {
    /// Create a new assigner configuration
    pub fn new(policy: PolicyConfig, check_validity: bool, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            check_validity,
            output_dir: output_dir.into(),
        }
    }

    /// Path of the circuit description with the given fingerprint
    pub fn circuit_path(&self, fingerprint: &str) -> PathBuf {
        self.output_dir.join(format!("circuit_{}.json", fingerprint))
    }

    /// Path of the assignment table for the circuit with the given fingerprint
    pub fn assignment_path(&self, fingerprint: &str) -> PathBuf {
        self.output_dir.join(format!("assignment_{}.json", fingerprint))
    }
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            check_validity: true,
            output_dir: PathBuf::from(".cache/assigner"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigner_config_default() {
        let config = AssignerConfig::default();
        assert_eq!(config.policy, PolicyConfig::new(12, 9, 16, 1));
        assert!(config.check_validity);
        assert_eq!(config.output_dir, PathBuf::from(".cache/assigner"));
    }

    #[test]
    fn test_assigner_config_paths() {
        let config = AssignerConfig::new(PolicyConfig::default(), false, "/tmp/test_assigner");

        assert_eq!(
            config.circuit_path("ab12"),
            PathBuf::from("/tmp/test_assigner/circuit_ab12.json")
        );
        assert_eq!(
            config.assignment_path("ab12"),
            PathBuf::from("/tmp/test_assigner/assignment_ab12.json")
        );
    }
}
