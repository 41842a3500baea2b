use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// Root of `config.toml`. Every section is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SolaceConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which hosted model backend answers non-crisis messages.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Claude,
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
    /// No remote calls; every message takes the fallback path.
    Offline,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Overrides the backend's default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

fn default_max_tokens() -> u32 {
    400
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// How many trailing session messages are sent as context.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Maximum characters of an auto-derived session title.
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

fn default_history_window() -> usize {
    8
}

fn default_title_max_chars() -> usize {
    30
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude: Option<ClaudeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAIConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaudeConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: SolaceConfig = toml::from_str("").unwrap();
        assert_eq!(config, SolaceConfig::default());
        assert_eq!(config.pipeline.history_window, 8);
        assert_eq!(config.pipeline.title_max_chars, 30);
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config: SolaceConfig = toml::from_str(
            r#"
            [provider]
            kind = "openai"
            model = "gpt-4o-mini"

            [pipeline]
            history_window = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.provider.max_tokens, 400);
        assert_eq!(config.pipeline.history_window, 4);
        assert_eq!(config.pipeline.title_max_chars, 30);
    }

    #[test]
    fn test_provider_kind_from_cli_string() {
        assert_eq!(ProviderKind::from_str("openai").unwrap(), ProviderKind::OpenAi);
        assert_eq!(ProviderKind::from_str("offline").unwrap(), ProviderKind::Offline);
        assert!(ProviderKind::from_str("llama").is_err());
    }

    #[test]
    fn test_secret_config_json() {
        let secrets: SecretConfig =
            serde_json::from_str(r#"{"gemini": {"api_key": "k"}}"#).unwrap();
        assert_eq!(secrets.gemini.unwrap().api_key, "k");
        assert!(secrets.claude.is_none());
    }
}
