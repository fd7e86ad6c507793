//! Configuration system for docket.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::engine::{DedupConfig, OracleErrorPolicy};
use crate::error::{DocketError, DocketResult};
use crate::oracle::OracleConfig;
use crate::traits::LlmConfig;

/// LLM provider type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Anthropic,
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl LlmProviderConfig {
    /// Switch provider; a model name set for a different provider is
    /// cleared so the new provider's default applies.
    pub fn switch_provider(&mut self, provider: LlmProvider) {
        if self.provider != provider {
            self.provider = provider;
            self.config.model.clear();
        }
    }
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            config: LlmConfig {
                model: "gpt-4o".to_string(),
                ..Default::default()
            },
        }
    }
}

/// Top-level docket configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocketConfig {
    /// Completion provider backing the similarity oracle.
    pub llm: LlmProviderConfig,
    /// Oracle adapter settings.
    pub oracle: OracleConfig,
    /// Grouping engine settings.
    pub dedup: DedupConfig,
}

impl DocketConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DocketResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| DocketError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| DocketError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| DocketError::Configuration(e.to_string()))?,
            _ => {
                return Err(DocketError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Override fields from `DOCKET_*` environment variables.
    pub fn apply_env(&mut self) -> DocketResult<()> {
        if let Ok(provider) = std::env::var("DOCKET_LLM_PROVIDER") {
            let provider = provider.parse().map_err(|_| DocketError::UnsupportedProvider {
                provider: provider.clone(),
            })?;
            self.llm.switch_provider(provider);
        }
        if let Ok(model) = std::env::var("DOCKET_LLM_MODEL") {
            self.llm.config.model = model;
        }
        if let Ok(base_url) = std::env::var("DOCKET_LLM_BASE_URL") {
            self.llm.config.base_url = Some(base_url);
        }
        if let Ok(window) = std::env::var("DOCKET_TIME_WINDOW_MINUTES") {
            self.dedup.time_window_minutes = parse_env("DOCKET_TIME_WINDOW_MINUTES", &window)?;
        }
        if let Ok(threshold) = std::env::var("DOCKET_SIMILARITY_THRESHOLD") {
            self.dedup.similarity_threshold =
                parse_env("DOCKET_SIMILARITY_THRESHOLD", &threshold)?;
        }
        if let Ok(partitions) = std::env::var("DOCKET_MAX_CONCURRENT_PARTITIONS") {
            self.dedup.max_concurrent_partitions =
                parse_env("DOCKET_MAX_CONCURRENT_PARTITIONS", &partitions)?;
        }
        if let Ok(policy) = std::env::var("DOCKET_ON_ORACLE_ERROR") {
            self.dedup.on_oracle_error = parse_env::<OracleErrorPolicy>("DOCKET_ON_ORACLE_ERROR", &policy)?;
        }
        if let Ok(timeout) = std::env::var("DOCKET_ORACLE_TIMEOUT_SECS") {
            self.oracle.timeout_secs = parse_env("DOCKET_ORACLE_TIMEOUT_SECS", &timeout)?;
        }
        Ok(())
    }

    /// Check value ranges across all sections.
    pub fn validate(&self) -> DocketResult<()> {
        self.dedup
            .validate()
            .map_err(|e| DocketError::Configuration(e.to_string()))?;
        if self.oracle.timeout_secs == 0 {
            return Err(DocketError::Configuration(
                "oracle.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> DocketResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DocketError::Configuration(format!("Invalid value '{}' for {}", value, name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = DocketConfig::default();
        assert_eq!(config.llm.provider, LlmProvider::OpenAI);
        assert_eq!(config.llm.config.model, "gpt-4o");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[llm]
provider = "anthropic"
model = "claude-3-5-sonnet-20240620"

[dedup]
time_window_minutes = 30
similarity_threshold = 0.8
on_oracle_error = "skip_partition"
"#
        )
        .unwrap();

        let config = DocketConfig::from_file(file.path()).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.dedup.time_window_minutes, 30);
        assert_eq!(config.dedup.on_oracle_error, OracleErrorPolicy::SkipPartition);
        assert_eq!(config.dedup.max_concurrent_partitions, 1);
        assert_eq!(config.oracle.timeout_secs, 30);
    }

    #[test]
    fn test_from_file_rejects_bad_threshold() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"dedup": {{"similarity_threshold": 2.0}}}}"#).unwrap();

        let err = DocketConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, DocketError::Configuration(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(DocketConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert_eq!("anthropic".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
        assert!("gemini".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_switch_provider_clears_foreign_model() {
        let mut llm = LlmProviderConfig::default();
        llm.switch_provider(LlmProvider::OpenAI);
        assert_eq!(llm.config.model, "gpt-4o");

        llm.switch_provider(LlmProvider::Anthropic);
        assert_eq!(llm.provider, LlmProvider::Anthropic);
        assert!(llm.config.model.is_empty());
    }
}
