//! Reqwest-backed chat-completion adapter.
//!
//! Owns transport details only: request serialisation, auth header, timeout
//! and HTTP error mapping, and JSON decoding down to the assistant's message
//! text. The text itself stays untrusted; the domain parses it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{CompletionError, CompletionRequest, RecipeCompletion};

use super::dto::{CompletionRequestDto, CompletionResponseDto, MessageDto, ResponseFormatDto};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_USER_AGENT: &str = "ladle-backend/0.1";

/// Connection settings for the completion provider.
#[derive(Debug, Clone)]
pub struct CompletionClientConfig {
    /// Full URL of the `/chat/completions` endpoint.
    pub endpoint: Url,
    /// Bearer key sent in the `Authorization` header.
    pub api_key: String,
    /// Model identifier requested from the provider.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CompletionClientConfig {
    /// Configuration with the default timeout.
    pub fn new(endpoint: Url, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Completion adapter performing HTTP POST requests against one endpoint.
pub struct HttpCompletionClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl HttpCompletionClient {
    /// Build an adapter with its own reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: CompletionClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
            model: config.model,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> CompletionError {
    CompletionError::transport(error.to_string())
}

fn map_status_error(status: StatusCode) -> CompletionError {
    // Provider bodies can carry account details; only the status crosses.
    CompletionError::status(status.as_u16(), status.to_string())
}

fn parse_reply(body: &[u8]) -> Result<String, CompletionError> {
    let decoded: CompletionResponseDto = serde_json::from_slice(body)
        .map_err(|error| CompletionError::decode(format!("invalid completion JSON: {error}")))?;
    decoded
        .into_message_text()
        .ok_or_else(|| CompletionError::decode("completion reply carried no message text"))
}

#[async_trait]
impl RecipeCompletion for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let payload = CompletionRequestDto {
            model: &self.model,
            messages: vec![
                MessageDto {
                    role: "system",
                    content: &request.system,
                },
                MessageDto {
                    role: "user",
                    content: &request.user,
                },
            ],
            response_format: ResponseFormatDto {
                format: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        parse_reply(body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn parse_reply_extracts_message_text() {
        let body = br#"{"choices":[{"message":{"content":"{\"title\":\"T\",\"content\":\"C\",\"ingredients\":\"\"}"}}]}"#;
        let text = parse_reply(body).expect("parses");
        assert!(text.contains("\"title\""));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = parse_reply(b"<html>upstream error page</html>").expect_err("must fail");
        assert!(matches!(err, CompletionError::Decode { .. }));
    }

    #[test]
    fn empty_choices_is_a_decode_error() {
        let err = parse_reply(br#"{"choices":[]}"#).expect_err("must fail");
        assert!(matches!(err, CompletionError::Decode { .. }));
    }

    #[test]
    fn status_errors_keep_only_the_status() {
        let err = map_status_error(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            err,
            CompletionError::status(429_u16, "429 Too Many Requests")
        );
    }
}
