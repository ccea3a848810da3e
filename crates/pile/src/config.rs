//! Configuration for the pile generator.
//!
//! Sources, lowest precedence first: defaults, a YAML file, environment
//! variables, then command-line flags applied by the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PileError, Result};
use crate::layout::PILE_FILE_NAME;

/// Environment variable overriding the output path.
pub const ENV_OUTPUT: &str = "PILE_OUTPUT";

/// Environment variable setting the descriptor sidecar path.
pub const ENV_DESCRIPTOR: &str = "PILE_DESCRIPTOR";

/// Environment variable enabling read-back verification.
pub const ENV_VERIFY: &str = "PILE_VERIFY";

/// Configuration for one generator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Where to write the pile.
    pub output_path: PathBuf,

    /// Where to write the grid descriptor sidecar, if anywhere.
    pub descriptor_path: Option<PathBuf>,

    /// Read the file back and verify it after writing.
    pub verify: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(PILE_FILE_NAME),
            descriptor_path: None,
            verify: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PileError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&text)?;
        debug!(path = %path.display(), "Loaded generator config file");
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        // Empty and comment-only documents carry no mapping at all
        let has_content = text.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#') && line != "---"
        });
        if !has_content {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override fields using `lookup` to resolve variable names.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_OUTPUT) {
            if !val.is_empty() {
                self.output_path = PathBuf::from(val);
            }
        }

        if let Some(val) = lookup(ENV_DESCRIPTOR) {
            self.descriptor_path = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Some(val) = lookup(ENV_VERIFY) {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.verify = true,
                "false" | "0" | "no" => self.verify = false,
                other => warn!(value = other, "Ignoring unrecognized {} value", ENV_VERIFY),
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(PileError::config("output_path must not be empty"));
        }

        if let Some(descriptor) = &self.descriptor_path {
            if descriptor.as_os_str().is_empty() {
                return Err(PileError::config("descriptor_path must not be empty"));
            }
            if descriptor == &self.output_path {
                return Err(PileError::config(
                    "descriptor_path must differ from output_path",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_writes_pile_bin() {
        let config = GeneratorConfig::default();
        assert_eq!(config.output_path, PathBuf::from("pile.bin"));
        assert_eq!(config.descriptor_path, None);
        assert!(!config.verify);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial() {
        let config = GeneratorConfig::from_yaml("output_path: fixtures/pile.bin\nverify: true\n")
            .expect("parse");
        assert_eq!(config.output_path, PathBuf::from("fixtures/pile.bin"));
        assert!(config.verify);
        assert_eq!(config.descriptor_path, None);

        assert_eq!(GeneratorConfig::from_yaml("").expect("empty"), GeneratorConfig::default());
    }

    #[test]
    fn test_yaml_comment_only_is_default() {
        let config = GeneratorConfig::from_yaml("# defaults\n\n   # nothing set\n").expect("parse");
        assert_eq!(config, GeneratorConfig::default());

        let config = GeneratorConfig::from_yaml("~\n").expect("null document");
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_yaml_invalid() {
        assert!(matches!(
            GeneratorConfig::from_yaml("verify: [1, 2]"),
            Err(PileError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pile.yaml");
        std::fs::write(&path, "descriptor_path: pile.gys\n").expect("write");

        let config = GeneratorConfig::from_file(&path).expect("load");
        assert_eq!(config.descriptor_path, Some(PathBuf::from("pile.gys")));

        let missing = GeneratorConfig::from_file(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(PileError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GeneratorConfig::default();
        config.apply_env_with(lookup(&[
            ("PILE_OUTPUT", "/tmp/out.bin"),
            ("PILE_DESCRIPTOR", "/tmp/out.gys"),
            ("PILE_VERIFY", "TRUE"),
        ]));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.bin"));
        assert_eq!(config.descriptor_path, Some(PathBuf::from("/tmp/out.gys")));
        assert!(config.verify);

        // Empty descriptor clears it, bad verify value is ignored
        config.apply_env_with(lookup(&[("PILE_DESCRIPTOR", ""), ("PILE_VERIFY", "maybe")]));
        assert_eq!(config.descriptor_path, None);
        assert!(config.verify);
    }

    #[test]
    fn test_from_env_starts_from_defaults() {
        let config = GeneratorConfig::from_env();
        if std::env::var(ENV_OUTPUT).is_err() {
            assert_eq!(config.output_path, PathBuf::from(PILE_FILE_NAME));
        }
    }

    #[test]
    fn test_validate() {
        let config = GeneratorConfig {
            output_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            descriptor_path: Some(PathBuf::from("pile.bin")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
