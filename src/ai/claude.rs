//! Claude-compatible messages adapter.

use serde::Deserialize;
use serde_json::json;

use crate::ai::adapter::{ProviderAdapter, ProviderRequest, check_status, non_empty};
use crate::ai::prompt::{SYSTEM_INSTRUCTION, user_prompt};
use crate::ai::request::GenerationRequest;
use crate::error::AiError;

/// API version header required by the messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for the `{base}/messages` API shape.
pub struct ClaudeAdapter;

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

impl ProviderAdapter for ClaudeAdapter {
    fn build_request(&self, req: &GenerationRequest) -> ProviderRequest {
        ProviderRequest {
            url: format!("{}/messages", req.base_url()),
            headers: vec![
                ("x-api-key", req.api_key.clone()),
                ("anthropic-version", ANTHROPIC_VERSION.to_string()),
            ],
            body: json!({
                "model": req.model(),
                "max_tokens": 200,
                "system": SYSTEM_INSTRUCTION,
                "messages": [
                    { "role": "user", "content": user_prompt(&req.diff) },
                ],
            }),
        }
    }

    fn parse_response(&self, status: u16, body: &str) -> Result<String, AiError> {
        check_status(status, body)?;

        let response: MessagesResponse = serde_json::from_str(body)
            .map_err(|e| AiError::MalformedResponse(format!("messages body: {e}")))?;

        let block = response
            .content
            .into_iter()
            .next()
            .ok_or_else(|| AiError::MalformedResponse("no content in response".to_string()))?;

        non_empty(block.text, "content text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::Provider;

    fn request(model: &str) -> GenerationRequest {
        GenerationRequest::new(Provider::Claude, "sk-ant-test", "", model, "+struct Foo;")
    }

    #[test]
    fn test_build_request_url_and_headers() {
        let prepared = ClaudeAdapter.build_request(&request("claude-3-haiku"));
        assert_eq!(prepared.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(
            prepared.headers,
            vec![
                ("x-api-key", "sk-ant-test".to_string()),
                ("anthropic-version", "2023-06-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_request_body_shape() {
        let prepared = ClaudeAdapter.build_request(&request(""));
        assert_eq!(prepared.body["model"], "claude-3-sonnet-20240229");
        assert_eq!(prepared.body["max_tokens"], 200);
        assert_eq!(prepared.body["system"], SYSTEM_INSTRUCTION);
        assert_eq!(prepared.body["messages"][0]["role"], "user");
        let user = prepared.body["messages"][0]["content"].as_str().unwrap();
        assert!(user.contains("+struct Foo;"));
    }

    #[test]
    fn test_parse_response_extracts_first_block() {
        let body = r#"{"content":[{"type":"text","text":"fix: tighten parser\n"}]}"#;
        let text = ClaudeAdapter.parse_response(200, body).unwrap();
        assert_eq!(text, "fix: tighten parser");
    }

    #[test]
    fn test_parse_response_empty_content_list() {
        let body = r#"{"content":[]}"#;
        assert!(matches!(
            ClaudeAdapter.parse_response(200, body),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_missing_text_field() {
        let body = r#"{"content":[{"type":"tool_use"}]}"#;
        assert!(matches!(
            ClaudeAdapter.parse_response(200, body),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_http_error() {
        match ClaudeAdapter.parse_response(429, "rate limited") {
            Err(AiError::Http { status, .. }) => assert_eq!(status, 429),
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}
