//! Driving port for the external recipe text-completion provider.
//!
//! The provider is an opaque, possibly failing, possibly slow dependency.
//! Adapters return the assistant's raw reply text; parsing and trust
//! decisions stay with the domain service.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by completion provider adapters.
    pub enum CompletionError {
        /// The provider could not be reached or the request timed out.
        Transport { message: String } => "completion transport failed: {message}",
        /// The provider answered with a non-success status.
        Status { status: u16, message: String } => "completion request failed ({status}): {message}",
        /// The provider's reply could not be decoded into a message.
        Decode { message: String } => "completion reply could not be decoded: {message}",
    }
}

/// One structured prompt for the completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction fixing the reply format.
    pub system: String,
    /// User prompt describing the desired recipe.
    pub user: String,
}

/// Text-completion capability used by the recipe generator.
#[async_trait]
pub trait RecipeCompletion: Send + Sync {
    /// Request one completion and return the assistant's reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Canned completion used when no provider is configured.
///
/// Keeps development setups and handler tests working without network
/// access; the reply is a fixed, well-formed recipe document.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeCompletion;

#[async_trait]
impl RecipeCompletion for FixtureRecipeCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok(r#"{"title":"Pantry Pasta","content":"Boil the pasta. Toss with olive oil, garlic, and parmesan.","ingredients":"Pasta, Olive oil, Garlic, Parmesan"}"#.to_owned())
    }
}
