//! OpenAI-compatible chat completions adapter.

use serde::Deserialize;
use serde_json::json;

use crate::ai::adapter::{ProviderAdapter, ProviderRequest, check_status, non_empty};
use crate::ai::prompt::{SYSTEM_INSTRUCTION, user_prompt};
use crate::ai::request::GenerationRequest;
use crate::error::AiError;

/// Adapter for the `{base}/chat/completions` API shape.
pub struct OpenAiAdapter;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ProviderAdapter for OpenAiAdapter {
    fn build_request(&self, req: &GenerationRequest) -> ProviderRequest {
        ProviderRequest {
            url: format!("{}/chat/completions", req.base_url()),
            headers: vec![("Authorization", format!("Bearer {}", req.api_key))],
            body: json!({
                "model": req.model(),
                "messages": [
                    { "role": "system", "content": SYSTEM_INSTRUCTION },
                    { "role": "user", "content": user_prompt(&req.diff) },
                ],
                "temperature": 0.3,
                "max_tokens": 200,
            }),
        }
    }

    fn parse_response(&self, status: u16, body: &str) -> Result<String, AiError> {
        check_status(status, body)?;

        let response: ChatCompletionResponse = serde_json::from_str(body)
            .map_err(|e| AiError::MalformedResponse(format!("chat completion body: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::MalformedResponse("no choices in response".to_string()))?;

        non_empty(choice.message.content, "message content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::Provider;

    fn request(model: &str) -> GenerationRequest {
        GenerationRequest::new(
            Provider::OpenAi,
            "sk-test",
            "https://api.openai.com/v1",
            model,
            "+fn main() {}",
        )
    }

    #[test]
    fn test_build_request_url_and_auth() {
        let prepared = OpenAiAdapter.build_request(&request("gpt-4o"));
        assert_eq!(prepared.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(
            prepared.headers,
            vec![("Authorization", "Bearer sk-test".to_string())]
        );
    }

    #[test]
    fn test_build_request_body_shape() {
        let prepared = OpenAiAdapter.build_request(&request(""));
        assert_eq!(prepared.body["model"], "gpt-4");
        assert_eq!(prepared.body["temperature"], 0.3);
        assert_eq!(prepared.body["max_tokens"], 200);
        assert_eq!(prepared.body["messages"][0]["role"], "system");
        assert_eq!(prepared.body["messages"][1]["role"], "user");
        let user = prepared.body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("+fn main() {}"));
    }

    #[test]
    fn test_parse_response_extracts_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":" feat: add main \n"}}]}"#;
        let text = OpenAiAdapter.parse_response(200, body).unwrap();
        assert_eq!(text, "feat: add main");
    }

    #[test]
    fn test_parse_response_no_choices() {
        let body = r#"{"choices":[]}"#;
        assert!(matches!(
            OpenAiAdapter.parse_response(200, body),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_missing_field() {
        let body = r#"{"id":"cmpl-1"}"#;
        assert!(matches!(
            OpenAiAdapter.parse_response(200, body),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_empty_content_is_malformed() {
        let body = r#"{"choices":[{"message":{"content":"   "}}]}"#;
        assert!(matches!(
            OpenAiAdapter.parse_response(200, body),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_http_error() {
        match OpenAiAdapter.parse_response(500, "internal error") {
            Err(AiError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("internal error"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}
