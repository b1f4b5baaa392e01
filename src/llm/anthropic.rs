use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerateResponse, Provider};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(client, api_key, MESSAGES_URL))
    }

    pub fn with_http(client: reqwest::Client, api_key: &str, url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
    usage: AnthropicUsage,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Error text for a failed call; the status stays in the message so retry
/// classification can see it.
fn api_error(status: StatusCode, body: &str) -> anyhow::Error {
    let detail = serde_json::from_str::<AnthropicError>(body)
        .map(|err| err.error.message)
        .unwrap_or_else(|_| body.to_string());
    anyhow::anyhow!("Anthropic API error ({status}): {detail}")
}

fn text_of(content: &[AnthropicContent]) -> String {
    content
        .iter()
        .filter(|c| c.content_type == "text")
        .filter_map(|c| c.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
}

#[async_trait::async_trait]
impl Provider for AnthropicProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = AnthropicRequest {
            model: &req.model,
            max_tokens: req.max_tokens,
            temperature: req.temperature,
            system: &req.system,
            messages: [AnthropicMessage {
                role: "user",
                content: &req.prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &error_body));
        }

        let resp: AnthropicResponse = response.json().await?;

        Ok(GenerateResponse {
            content: text_of(&resp.content),
            model: resp.model,
            input_tokens: resp.usage.input_tokens,
            output_tokens: resp.usage.output_tokens,
            finish_reason: resp.stop_reason.unwrap_or_default(),
            provider: String::new(),
        })
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_structured_message() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, body);
        assert_eq!(err.to_string(), "Anthropic API error (503 Service Unavailable): Overloaded");

        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Anthropic API error (502 Bad Gateway): upstream down");
    }

    #[test]
    fn test_text_blocks_are_joined() {
        let resp: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Leo "},{"type":"tool_use"},{"type":"text","text":"rising."}],
                "model":"claude-haiku-4-5","usage":{"input_tokens":10,"output_tokens":4},"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(text_of(&resp.content), "Leo rising.");
    }

    #[test]
    fn test_request_omits_empty_system() {
        let body = AnthropicRequest {
            model: "claude-haiku-4-5",
            max_tokens: 400,
            temperature: 0.4,
            system: "",
            messages: [AnthropicMessage {
                role: "user",
                content: "Summarize astrology data:\n",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
