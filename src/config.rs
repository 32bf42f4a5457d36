//! Reader and writer configuration, persisted as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Knobs for how statements are read from and written to a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Produce one statement per `owl:Axiom` reification instead of
    /// combining all annotations found for one root triple.
    #[serde(default)]
    pub split_axiom_annotations: bool,
    /// List annotation assertions and annotation property
    /// domain, range and sub-property statements.
    #[serde(default = "default_true")]
    pub load_annotation_axioms: bool,
    /// Nesting limit for expressions and lists; deeper structures are
    /// treated as inconsistent and skipped.
    #[serde(default = "default_max_expression_depth")]
    pub max_expression_depth: usize,
    /// Materialize statement kinds concurrently when listing everything.
    #[serde(default = "default_true")]
    pub parallel_listing: bool,
}

fn default_true() -> bool {
    true
}
fn default_max_expression_depth() -> usize {
    64
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            split_axiom_annotations: false,
            load_annotation_axioms: default_true(),
            max_expression_depth: default_max_expression_depth(),
            parallel_listing: default_true(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expression_depth == 0 {
            return Err(ConfigError::Invalid {
                message: "max_expression_depth must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn parse(content: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert!(config.load_annotation_axioms);
        assert!(!config.split_axiom_annotations);
    }

    #[test]
    fn partial_override() {
        let config = BridgeConfig::from_toml_str("split_axiom_annotations = true\n").unwrap();
        assert!(config.split_axiom_annotations);
        assert_eq!(config.max_expression_depth, 64);
    }

    #[test]
    fn zero_depth_is_invalid() {
        let err = BridgeConfig::from_toml_str("max_expression_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = BridgeConfig::from_toml_str("dimension = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bridge.toml");
        let config = BridgeConfig {
            parallel_listing: false,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap(), config);
    }
}
