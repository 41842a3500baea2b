//! Completion provider backends for Solace.
//!
//! Each hosted backend maps a [`ProviderRequest`](solace_core::provider::ProviderRequest)
//! onto its REST API and reports failures as
//! [`ProviderError`](solace_core::provider::ProviderError). [`build_provider`]
//! picks one from configuration and secrets.

mod http_error;

pub mod claude_provider;
pub mod gemini_provider;
pub mod offline_provider;
pub mod openai_provider;

pub use claude_provider::{ClaudeProvider, DEFAULT_CLAUDE_MODEL};
pub use gemini_provider::{DEFAULT_GEMINI_MODEL, GeminiProvider};
pub use offline_provider::OfflineProvider;
pub use openai_provider::{DEFAULT_OPENAI_MODEL, OpenAIProvider};

use solace_core::config::{ProviderKind, ProviderSettings, SecretConfig};
use solace_core::provider::CompletionProvider;
use std::sync::Arc;
use std::time::Duration;

/// Builds the configured backend.
///
/// Model precedence: `settings.model`, then the secret's `model_name`, then
/// the backend default. A missing API key yields an [`OfflineProvider`]
/// naming the missing secret rather than an error, so the chat still works.
pub fn build_provider(
    settings: &ProviderSettings,
    secrets: &SecretConfig,
) -> Arc<dyn CompletionProvider> {
    let timeout = Duration::from_secs(settings.timeout_secs.max(1));
    let pick_model = |secret_model: Option<&String>, default: &str| {
        settings
            .model
            .clone()
            .or_else(|| secret_model.cloned())
            .unwrap_or_else(|| default.to_string())
    };

    let provider: Arc<dyn CompletionProvider> = match settings.kind {
        ProviderKind::Gemini => match &secrets.gemini {
            Some(gemini) => Arc::new(
                GeminiProvider::new(
                    &gemini.api_key,
                    pick_model(gemini.model_name.as_ref(), DEFAULT_GEMINI_MODEL),
                )
                .with_timeout(timeout)
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature),
            ),
            None => missing_key("gemini", "GEMINI_API_KEY"),
        },
        ProviderKind::Claude => match &secrets.claude {
            Some(claude) => Arc::new(
                ClaudeProvider::new(
                    &claude.api_key,
                    pick_model(claude.model_name.as_ref(), DEFAULT_CLAUDE_MODEL),
                )
                .with_timeout(timeout)
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature),
            ),
            None => missing_key("claude", "ANTHROPIC_API_KEY"),
        },
        ProviderKind::OpenAi => match &secrets.openai {
            Some(openai) => Arc::new(
                OpenAIProvider::new(
                    &openai.api_key,
                    pick_model(openai.model_name.as_ref(), DEFAULT_OPENAI_MODEL),
                )
                .with_timeout(timeout)
                .with_max_tokens(settings.max_tokens)
                .with_temperature(settings.temperature),
            ),
            None => missing_key("openai", "OPENAI_API_KEY"),
        },
        ProviderKind::Offline => Arc::new(OfflineProvider::new()),
    };

    tracing::info!("[Provider] Using {} backend", provider.name());
    provider
}

fn missing_key(section: &str, env_var: &str) -> Arc<dyn CompletionProvider> {
    tracing::warn!(
        "[Provider] No {} key in secret.json or {}; replies will use fallbacks",
        section,
        env_var
    );
    Arc::new(OfflineProvider::unavailable(format!(
        "missing {section} API key ({env_var})"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::config::ClaudeConfig;

    #[test]
    fn test_offline_kind() {
        let settings = ProviderSettings {
            kind: ProviderKind::Offline,
            ..ProviderSettings::default()
        };
        let provider = build_provider(&settings, &SecretConfig::default());
        assert_eq!(provider.name(), "offline");
    }

    #[test]
    fn test_missing_key_degrades_to_offline() {
        let provider = build_provider(&ProviderSettings::default(), &SecretConfig::default());
        assert_eq!(provider.name(), "offline");
    }

    #[test]
    fn test_claude_with_key() {
        let settings = ProviderSettings {
            kind: ProviderKind::Claude,
            ..ProviderSettings::default()
        };
        let secrets = SecretConfig {
            claude: Some(ClaudeConfig {
                api_key: "sk-test".to_string(),
                model_name: None,
            }),
            ..SecretConfig::default()
        };
        assert_eq!(build_provider(&settings, &secrets).name(), "claude");
    }
}
