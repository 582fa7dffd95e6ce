//! The AI gateway: owns configuration and performs the HTTP exchange.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::ai::adapter::adapter_for;
use crate::ai::request::GenerationRequest;
use crate::config::AiConfig;
use crate::error::AiError;

/// Timeout applied to every provider round trip.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Draft commit messages from diffs through the configured provider.
///
/// Holds exactly one active configuration. Replacing it requires `&mut self`,
/// so a writer can never race an in-flight generation; callers that share a
/// gateway across tasks wrap it in their own synchronization.
pub struct Gateway {
    config: AiConfig,
    client: Client,
}

impl Gateway {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AiConfig) {
        self.config = config;
    }

    /// Validate the held configuration.
    pub fn validate(&self) -> Result<(), AiError> {
        self.config.validate()
    }

    /// Draft a commit message for `diff` using the held configuration.
    pub async fn generate_commit_message(&self, diff: &str) -> Result<String, AiError> {
        self.generate_with(&self.config, diff).await
    }

    /// Draft a commit message using an explicit candidate configuration,
    /// leaving the held configuration untouched.
    ///
    /// An empty diff fails before any validation or network I/O. One HTTP
    /// round trip per call; failures are returned to the caller, never
    /// retried here.
    pub async fn generate_with(&self, config: &AiConfig, diff: &str) -> Result<String, AiError> {
        if diff.trim().is_empty() {
            return Err(AiError::EmptyDiff);
        }

        let provider = config.resolved_provider()?;
        let request = GenerationRequest::new(
            provider,
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
            diff,
        );

        let adapter = adapter_for(provider);
        let prepared = adapter.build_request(&request);

        debug!(provider = %provider, url = %prepared.url, "requesting commit message");

        let mut call = self.client.post(&prepared.url).json(&prepared.body);
        for (name, value) in &prepared.headers {
            call = call.header(*name, value.as_str());
        }

        let response = call.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        adapter.parse_response(status, &body)
    }
}
