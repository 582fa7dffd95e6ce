//! The canonical generation request shared by all adapters.

use crate::ai::provider::Provider;

/// One validated request to draft a commit message.
///
/// Built per call from the active configuration; never persisted. Empty
/// model and base-URL fields resolve to the provider's defaults at the
/// accessors, so adapters see fully resolved values.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub diff: String,
    pub provider: Provider,
    pub api_key: String,
    base_url: String,
    model: String,
}

impl GenerationRequest {
    pub fn new(
        provider: Provider,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        diff: impl Into<String>,
    ) -> Self {
        Self {
            diff: diff.into(),
            provider,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Endpoint base, without a trailing slash.
    pub fn base_url(&self) -> &str {
        let url = self.base_url.trim();
        if url.is_empty() {
            self.provider.default_base_url()
        } else {
            url.trim_end_matches('/')
        }
    }

    /// Configured model, or the provider default when unset.
    pub fn model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }
}
