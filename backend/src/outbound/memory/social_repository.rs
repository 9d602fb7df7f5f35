//! In-memory `SocialRepository` adapter.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{SocialPersistenceError, SocialRepository};
use crate::domain::recipe::RecipeId;
use crate::domain::social::{Bookmark, Comment, Post, PostId};
use crate::domain::user::UserId;

#[derive(Default)]
struct SocialState {
    posts: Vec<Post>,
    bookmarks: Vec<Bookmark>,
    comments: Vec<Comment>,
}

/// Vector-backed store for posts, bookmarks, and comments.
#[derive(Default)]
pub struct InMemorySocialRepository {
    state: Mutex<SocialState>,
}

#[async_trait]
impl SocialRepository for InMemorySocialRepository {
    async fn insert_post(&self, post: &Post) -> Result<(), SocialPersistenceError> {
        self.state
            .lock()
            .expect("social store lock")
            .posts
            .push(post.clone());
        Ok(())
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, SocialPersistenceError> {
        Ok(self
            .state
            .lock()
            .expect("social store lock")
            .posts
            .iter()
            .find(|p| p.id() == id)
            .cloned())
    }

    async fn find_post_by_recipe(
        &self,
        recipe: &RecipeId,
    ) -> Result<Option<Post>, SocialPersistenceError> {
        Ok(self
            .state
            .lock()
            .expect("social store lock")
            .posts
            .iter()
            .find(|p| p.recipe() == recipe)
            .cloned())
    }

    async fn like(&self, id: &PostId) -> Result<Option<u32>, SocialPersistenceError> {
        let mut state = self.state.lock().expect("social store lock");
        Ok(state.posts.iter_mut().find(|p| p.id() == id).map(|post| {
            post.like();
            post.likes()
        }))
    }

    async fn unlike(&self, id: &PostId) -> Result<Option<u32>, SocialPersistenceError> {
        let mut state = self.state.lock().expect("social store lock");
        Ok(state.posts.iter_mut().find(|p| p.id() == id).map(|post| {
            post.unlike();
            post.likes()
        }))
    }

    async fn insert_bookmark(&self, bookmark: &Bookmark) -> Result<(), SocialPersistenceError> {
        self.state
            .lock()
            .expect("social store lock")
            .bookmarks
            .push(bookmark.clone());
        Ok(())
    }

    async fn bookmarks_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<Bookmark>, SocialPersistenceError> {
        Ok(self
            .state
            .lock()
            .expect("social store lock")
            .bookmarks
            .iter()
            .filter(|b| b.user() == user)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), SocialPersistenceError> {
        self.state
            .lock()
            .expect("social store lock")
            .comments
            .push(comment.clone());
        Ok(())
    }

    async fn comments_for_post(
        &self,
        post: &PostId,
    ) -> Result<Vec<Comment>, SocialPersistenceError> {
        Ok(self
            .state
            .lock()
            .expect("social store lock")
            .comments
            .iter()
            .filter(|c| c.post() == post)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn like_and_unlike_track_the_counter() {
        let repo = InMemorySocialRepository::default();
        let post = Post::for_recipe(RecipeId::random());
        repo.insert_post(&post).await.expect("insert");

        assert_eq!(repo.like(post.id()).await.expect("like"), Some(1));
        assert_eq!(repo.like(post.id()).await.expect("like"), Some(2));
        assert_eq!(repo.unlike(post.id()).await.expect("unlike"), Some(1));
        assert_eq!(repo.unlike(post.id()).await.expect("unlike"), Some(0));
        // Floor: a further unlike stays at zero.
        assert_eq!(repo.unlike(post.id()).await.expect("unlike"), Some(0));
    }

    #[tokio::test]
    async fn missing_post_yields_none() {
        let repo = InMemorySocialRepository::default();
        assert_eq!(repo.like(&PostId::random()).await.expect("like"), None);
        assert_eq!(repo.unlike(&PostId::random()).await.expect("unlike"), None);
    }

    #[tokio::test]
    async fn comments_are_scoped_to_their_post() {
        let repo = InMemorySocialRepository::default();
        let first = Post::for_recipe(RecipeId::random());
        let second = Post::for_recipe(RecipeId::random());
        repo.insert_post(&first).await.expect("insert");
        repo.insert_post(&second).await.expect("insert");

        let author = UserId::random();
        repo.insert_comment(&Comment::on_post(*first.id(), author, "Nice".to_owned()))
            .await
            .expect("insert comment");

        assert_eq!(
            repo.comments_for_post(first.id()).await.expect("query").len(),
            1
        );
        assert!(
            repo.comments_for_post(second.id())
                .await
                .expect("query")
                .is_empty()
        );
    }
}
