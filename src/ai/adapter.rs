//! Wire-shape translation between generation requests and provider APIs.

use serde_json::Value;

use crate::ai::claude::ClaudeAdapter;
use crate::ai::ollama::OllamaAdapter;
use crate::ai::openai::OpenAiAdapter;
use crate::ai::provider::Provider;
use crate::ai::request::GenerationRequest;
use crate::error::AiError;

/// Maximum characters of a provider error body kept in the error value.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// A fully prepared HTTP exchange for one provider.
#[derive(Debug)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

/// Translates the canonical request/response contract into one provider's
/// wire shape. The gateway never inspects provider-specific JSON itself.
pub trait ProviderAdapter: Send + Sync {
    /// Build the URL, headers, and JSON body for the provider call.
    fn build_request(&self, req: &GenerationRequest) -> ProviderRequest;

    /// Extract the generated text from the provider response.
    ///
    /// Non-2xx statuses and shape mismatches surface as typed errors; an
    /// extracted-but-empty message is a malformed response, not success.
    fn parse_response(&self, status: u16, body: &str) -> Result<String, AiError>;
}

/// Select the adapter for a provider.
///
/// Adding a provider means adding an adapter arm here; the gateway stays
/// untouched.
pub fn adapter_for(provider: Provider) -> &'static dyn ProviderAdapter {
    match provider {
        Provider::OpenAi => &OpenAiAdapter,
        Provider::Claude => &ClaudeAdapter,
        Provider::Ollama => &OllamaAdapter,
    }
}

/// Reject non-2xx responses, keeping a snippet of the body for diagnosis.
pub(crate) fn check_status(status: u16, body: &str) -> Result<(), AiError> {
    if !(200..300).contains(&status) {
        return Err(AiError::Http {
            status,
            body: body.chars().take(MAX_ERROR_BODY_LENGTH).collect(),
        });
    }
    Ok(())
}

/// Trim the extracted text, rejecting empty results.
pub(crate) fn non_empty(text: String, context: &str) -> Result<String, AiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AiError::MalformedResponse(format!("{context} was empty")));
    }
    Ok(trimmed.to_string())
}
