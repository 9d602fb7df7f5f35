//! Port abstraction for the social layer: posts, likes, bookmarks, comments.
use async_trait::async_trait;

use crate::domain::recipe::RecipeId;
use crate::domain::social::{Bookmark, Comment, Post, PostId};
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by social repository adapters.
    pub enum SocialPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "social repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "social repository query failed: {message}",
    }
}

/// Row-level access to the social tables.
#[async_trait]
pub trait SocialRepository: Send + Sync {
    /// Insert a feed post.
    async fn insert_post(&self, post: &Post) -> Result<(), SocialPersistenceError>;

    /// Fetch a post by identifier.
    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, SocialPersistenceError>;

    /// Fetch the post publishing the given recipe, if any.
    async fn find_post_by_recipe(
        &self,
        recipe: &RecipeId,
    ) -> Result<Option<Post>, SocialPersistenceError>;

    /// Increment a post's like counter. Returns the new count, or `None`
    /// when the post does not exist.
    async fn like(&self, id: &PostId) -> Result<Option<u32>, SocialPersistenceError>;

    /// Decrement a post's like counter unless it is already zero. Returns
    /// the resulting count, or `None` when the post does not exist.
    async fn unlike(&self, id: &PostId) -> Result<Option<u32>, SocialPersistenceError>;

    /// Insert a bookmark.
    async fn insert_bookmark(&self, bookmark: &Bookmark) -> Result<(), SocialPersistenceError>;

    /// All bookmarks created by the given user.
    async fn bookmarks_for(&self, user: &UserId)
    -> Result<Vec<Bookmark>, SocialPersistenceError>;

    /// Insert a comment.
    async fn insert_comment(&self, comment: &Comment) -> Result<(), SocialPersistenceError>;

    /// All comments on the given post, oldest first.
    async fn comments_for_post(
        &self,
        post: &PostId,
    ) -> Result<Vec<Comment>, SocialPersistenceError>;
}
