use reqwest::StatusCode;
use serde_json::json;

use crate::config::Config;

const IDENTIFY_PROMPT: &str = "Please carefully examine this image. \
If there is an animal, describe it in this format:\n\n\
1. Animal name (English + scientific name)\n\
2. Key features\n\
3. Behavior\n\
4. Habitat\n\
5. Fun facts\n\n\
If there is no animal, describe the main content of the image.";

/// Outcome of one identification call. Never partially populated: the
/// boundary always yields exactly one of the two.
#[derive(Debug)]
pub enum IdentificationResult {
    Success { text: String },
    Failure { message: String },
}

/// Client for an OpenAI-compatible multimodal chat-completions endpoint.
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl VisionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Sends the image (as a data URI) with the fixed identification prompt.
    /// Every transport, API, and decode failure is folded into `Failure`;
    /// nothing is re-raised to the caller. No retries, default timeout.
    pub async fn identify(&self, image_data_url: &str) -> IdentificationResult {
        match self.request(image_data_url).await {
            Ok(text) => IdentificationResult::Success { text },
            Err(message) => {
                tracing::warn!(%message, "vision identification failed");
                IdentificationResult::Failure { message }
            }
        }
    }

    async fn request(&self, image_data_url: &str) -> Result<String, String> {
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "image_url", "image_url": { "url": image_data_url } },
                    { "type": "text", "text": IDENTIFY_PROMPT },
                ],
            }],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        // Read as text first so a non-JSON error body is not lost.
        let text = response.text().await.map_err(|err| err.to_string())?;
        if !status.is_success() {
            return Err(extract_error_message(status, &text));
        }

        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|_| "invalid JSON from vision API".to_string())?;
        value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| "vision response missing choices[0].message.content".to_string())
    }
}

/// Pulls a human-readable message out of an API error body, trying the
/// common `{"error":{"message":...}}` and `{"message":...}` shapes before
/// falling back to a raw snippet.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    let trimmed = body.trim();
    let snippet = if trimmed.len() > 400 {
        // back up to a char boundary so multibyte bodies slice safely
        let mut end = 400;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    } else {
        trimmed.to_string()
    };
    format!("HTTP {}: {}", status.as_u16(), snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_nested_error_shape() {
        let body = r#"{"error":{"message":"invalid api key"}}"#;
        assert_eq!(
            extract_error_message(StatusCode::UNAUTHORIZED, body),
            "HTTP 401: invalid api key"
        );
    }

    #[test]
    fn error_message_accepts_flat_shape() {
        let body = r#"{"message":"model not found"}"#;
        assert_eq!(
            extract_error_message(StatusCode::NOT_FOUND, body),
            "HTTP 404: model not found"
        );
    }

    #[test]
    fn error_message_falls_back_to_body_snippet() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, "upstream exploded"),
            "HTTP 502: upstream exploded"
        );
    }

    #[test]
    fn long_multibyte_error_body_truncates_on_a_char_boundary() {
        // 600 bytes of three-byte characters: byte 400 is mid-character
        let body = "错".repeat(200);
        let message = extract_error_message(StatusCode::BAD_GATEWAY, &body);
        assert!(message.starts_with("HTTP 502: 错"));
        assert!(message.ends_with("..."));
        assert!(message.len() < body.len());
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_failure() {
        let config = Config {
            api_key: "test-key".into(),
            // reserved discard port, connection refused immediately
            api_base_url: "http://127.0.0.1:9".into(),
            model: "test-model".into(),
            upload_dir: "unused".into(),
            max_upload_bytes: 1024,
            bind_addr: "127.0.0.1:0".into(),
        };
        let client = VisionClient::new(&config);
        match client.identify("data:image/png;base64,AAAA").await {
            IdentificationResult::Failure { message } => assert!(!message.is_empty()),
            IdentificationResult::Success { .. } => panic!("expected failure"),
        }
    }
}
