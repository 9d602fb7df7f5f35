//! Social layer entities: feed posts, bookmarks, and comments.
//!
//! These are plain relational records; the only behaviour worth owning here
//! is the non-negative like counter.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::recipe::RecipeId;
use crate::domain::user::UserId;

/// Stable identifier for a feed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Validate and construct a [`PostId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recipe published to the shared feed, with its like counter.
///
/// ## Invariants
/// - At most one post exists per recipe.
/// - `likes` never goes below zero; unliking at zero is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    recipe: RecipeId,
    likes: u32,
}

impl Post {
    /// Materialise a post from stored values.
    pub fn new(id: PostId, recipe: RecipeId, likes: u32) -> Self {
        Self { id, recipe, likes }
    }

    /// Create a fresh post for a recipe with no likes yet.
    pub fn for_recipe(recipe: RecipeId) -> Self {
        Self::new(PostId::random(), recipe, 0)
    }

    /// Stable post identifier.
    pub fn id(&self) -> &PostId {
        &self.id
    }

    /// Recipe this post publishes.
    pub fn recipe(&self) -> &RecipeId {
        &self.recipe
    }

    /// Current like count.
    pub fn likes(&self) -> u32 {
        self.likes
    }

    /// Record one more like.
    pub fn like(&mut self) {
        self.likes += 1;
    }

    /// Remove one like if any exist. Returns whether a like was removed.
    pub fn unlike(&mut self) -> bool {
        if self.likes == 0 {
            return false;
        }
        self.likes -= 1;
        true
    }
}

/// A user's bookmark of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    user: UserId,
    recipe: RecipeId,
}

impl Bookmark {
    /// Create a bookmark linking a user to a recipe.
    pub fn new(user: UserId, recipe: RecipeId) -> Self {
        Self { user, recipe }
    }

    /// Bookmarking user.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Bookmarked recipe.
    pub fn recipe(&self) -> &RecipeId {
        &self.recipe
    }
}

/// A comment left on a feed post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: Uuid,
    post: PostId,
    author: UserId,
    body: String,
}

impl Comment {
    /// Materialise a comment from stored values.
    pub fn new(id: Uuid, post: PostId, author: UserId, body: String) -> Self {
        Self {
            id,
            post,
            author,
            body,
        }
    }

    /// Create a fresh comment on a post.
    pub fn on_post(post: PostId, author: UserId, body: String) -> Self {
        Self::new(Uuid::new_v4(), post, author, body)
    }

    /// Stable comment identifier.
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Post the comment belongs to.
    pub fn post(&self) -> &PostId {
        &self.post
    }

    /// Commenting user.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Comment text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn likes_count_up_and_floor_at_zero() {
        let mut post = Post::for_recipe(RecipeId::random());
        assert_eq!(post.likes(), 0);
        assert!(!post.unlike());

        post.like();
        post.like();
        assert_eq!(post.likes(), 2);

        assert!(post.unlike());
        assert!(post.unlike());
        assert!(!post.unlike());
        assert_eq!(post.likes(), 0);
    }
}
