//! DTOs for the chat-completion wire format.
//!
//! The adapter decodes the provider reply into these transport DTOs first
//! and extracts the assistant message text in one pass; everything beyond
//! that text is the domain's problem.

use serde::{Deserialize, Serialize};

/// One chat message in the request payload.
#[derive(Debug, Serialize)]
pub(super) struct MessageDto<'a> {
    pub(super) role: &'a str,
    pub(super) content: &'a str,
}

/// Request payload for the `/chat/completions` endpoint.
#[derive(Debug, Serialize)]
pub(super) struct CompletionRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<MessageDto<'a>>,
    pub(super) response_format: ResponseFormatDto<'a>,
}

/// Structured-output directive asking for a JSON object reply.
#[derive(Debug, Serialize)]
pub(super) struct ResponseFormatDto<'a> {
    #[serde(rename = "type")]
    pub(super) format: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceDto {
    pub(super) message: ChoiceMessageDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceMessageDto {
    pub(super) content: Option<String>,
}

impl CompletionResponseDto {
    /// The first choice's message text, if the provider returned one.
    pub(super) fn into_message_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}
