use async_trait::async_trait;
use solace_core::provider::{CompletionProvider, ProviderError, ProviderRequest};

/// Provider that never reaches a model.
///
/// Used for `kind = "offline"` and whenever a hosted backend lacks an API
/// key, so every non-crisis message takes the fallback path.
#[derive(Debug, Clone)]
pub struct OfflineProvider {
    reason: String,
}

impl OfflineProvider {
    pub fn new() -> Self {
        Self::unavailable("offline mode")
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Default for OfflineProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _request: &ProviderRequest) -> Result<String, ProviderError> {
        Err(ProviderError::unconfigured(self.reason.clone()))
    }
}
