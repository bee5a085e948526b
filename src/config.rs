use crate::error::BwwError;
use serde::Deserialize;
use std::path::Path;

/// Pipeline settings, read from YAML:
///
/// ```yaml
/// strict: true
/// expand-embellishments: true
/// normalize-parts: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Fail the import when any recoverable warning was recorded
    pub strict: bool,
    pub expand_embellishments: bool,
    pub normalize_parts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strict: false,
            expand_embellishments: true,
            normalize_parts: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, BwwError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| BwwError::ConfigError(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BwwError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_yaml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(!config.strict);
        assert!(config.expand_embellishments);
        assert!(config.normalize_parts);
    }

    #[test]
    fn test_kebab_case_keys() {
        let config =
            PipelineConfig::from_yaml_str("strict: true\nnormalize-parts: false\n").unwrap();
        assert!(config.strict);
        assert!(config.expand_embellishments);
        assert!(!config.normalize_parts);
    }

    #[test]
    fn test_unknown_key() {
        match PipelineConfig::from_yaml_str("expand_embellishments: false") {
            Err(BwwError::ConfigError(message)) => {
                assert!(message.contains("expand_embellishments"))
            }
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }
}
