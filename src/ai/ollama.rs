//! Ollama-compatible local generation adapter.

use serde::Deserialize;
use serde_json::json;

use crate::ai::adapter::{ProviderAdapter, ProviderRequest, check_status, non_empty};
use crate::ai::prompt::combined_prompt;
use crate::ai::request::GenerationRequest;
use crate::error::AiError;

/// Adapter for the `{base}/api/generate` API shape. No authentication; the
/// instruction and diff travel as one prompt string and streaming is off.
pub struct OllamaAdapter;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl ProviderAdapter for OllamaAdapter {
    fn build_request(&self, req: &GenerationRequest) -> ProviderRequest {
        ProviderRequest {
            url: format!("{}/api/generate", req.base_url()),
            headers: Vec::new(),
            body: json!({
                "model": req.model(),
                "prompt": combined_prompt(&req.diff),
                "stream": false,
            }),
        }
    }

    fn parse_response(&self, status: u16, body: &str) -> Result<String, AiError> {
        check_status(status, body)?;

        let response: GenerateResponse = serde_json::from_str(body)
            .map_err(|e| AiError::MalformedResponse(format!("generate body: {e}")))?;

        non_empty(response.response, "generated response")
    }
}
