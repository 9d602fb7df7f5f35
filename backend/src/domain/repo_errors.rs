//! Shared mapping from port errors to domain errors.
//!
//! Every repository failure collapses to a generic availability or internal
//! code; the underlying message is logged here and never reaches a client.
//! The one exception is the unique-email violation, which is a client-level
//! conflict.

use crate::domain::error::Error;
use crate::domain::ports::{
    AllergyPersistenceError, RecipePersistenceError, ShoppingListPersistenceError,
    SocialPersistenceError, UserPersistenceError,
};

const UNAVAILABLE: &str = "service temporarily unavailable";
const INTERNAL: &str = "internal error";

/// Map user persistence failures to domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            tracing::warn!(%message, "user repository unavailable");
            Error::unavailable(UNAVAILABLE)
        }
        UserPersistenceError::Query { message } => {
            tracing::error!(%message, "user repository query failed");
            Error::internal(INTERNAL)
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already registered"),
    }
}

/// Map recipe persistence failures to domain errors.
pub(crate) fn map_recipe_persistence_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            tracing::warn!(%message, "recipe repository unavailable");
            Error::unavailable(UNAVAILABLE)
        }
        RecipePersistenceError::Query { message } => {
            tracing::error!(%message, "recipe repository query failed");
            Error::internal(INTERNAL)
        }
    }
}

/// Map shopping-list persistence failures to domain errors.
pub(crate) fn map_shopping_list_persistence_error(error: ShoppingListPersistenceError) -> Error {
    match error {
        ShoppingListPersistenceError::Connection { message } => {
            tracing::warn!(%message, "shopping list repository unavailable");
            Error::unavailable(UNAVAILABLE)
        }
        ShoppingListPersistenceError::Query { message } => {
            tracing::error!(%message, "shopping list repository query failed");
            Error::internal(INTERNAL)
        }
    }
}

/// Map social persistence failures to domain errors.
pub(crate) fn map_social_persistence_error(error: SocialPersistenceError) -> Error {
    match error {
        SocialPersistenceError::Connection { message } => {
            tracing::warn!(%message, "social repository unavailable");
            Error::unavailable(UNAVAILABLE)
        }
        SocialPersistenceError::Query { message } => {
            tracing::error!(%message, "social repository query failed");
            Error::internal(INTERNAL)
        }
    }
}

/// Map allergy persistence failures to domain errors.
pub(crate) fn map_allergy_persistence_error(error: AllergyPersistenceError) -> Error {
    match error {
        AllergyPersistenceError::Connection { message } => {
            tracing::warn!(%message, "allergy repository unavailable");
            Error::unavailable(UNAVAILABLE)
        }
        AllergyPersistenceError::Query { message } => {
            tracing::error!(%message, "allergy repository query failed");
            Error::internal(INTERNAL)
        }
    }
}
