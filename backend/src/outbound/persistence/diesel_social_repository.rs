//! PostgreSQL-backed `SocialRepository` implementation using Diesel.
//!
//! Like counters are adjusted with single atomic UPDATE statements; the
//! decrement is guarded so the counter can never go negative regardless of
//! interleaving.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SocialPersistenceError, SocialRepository};
use crate::domain::recipe::RecipeId;
use crate::domain::social::{Bookmark, Comment, Post, PostId};
use crate::domain::user::UserId;

use super::diesel_support::{map_diesel_error, map_pool_error};
use super::models::{BookmarkRow, CommentRow, NewBookmarkRow, NewCommentRow, NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookmarks, comments, posts};

/// Diesel-backed implementation of the `SocialRepository` port.
#[derive(Clone)]
pub struct DieselSocialRepository {
    pool: DbPool,
}

impl DieselSocialRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> SocialPersistenceError {
    map_pool_error(error, SocialPersistenceError::connection)
}

fn map_diesel(error: DieselError) -> SocialPersistenceError {
    map_diesel_error(
        error,
        SocialPersistenceError::query,
        SocialPersistenceError::connection,
    )
}

fn likes_to_domain(likes: i32) -> u32 {
    u32::try_from(likes).unwrap_or(0)
}

fn row_to_post(row: PostRow) -> Post {
    Post::new(
        PostId::from_uuid(row.id),
        RecipeId::from_uuid(row.recipe_id),
        likes_to_domain(row.likes),
    )
}

fn row_to_comment(row: CommentRow) -> Comment {
    Comment::new(
        row.id,
        PostId::from_uuid(row.post_id),
        UserId::from_uuid(row.author_id),
        row.body,
    )
}

#[async_trait]
impl SocialRepository for DieselSocialRepository {
    async fn insert_post(&self, post: &Post) -> Result<(), SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewPostRow {
            id: *post.id().as_uuid(),
            recipe_id: *post.recipe().as_uuid(),
            likes: i32::try_from(post.likes()).unwrap_or(i32::MAX),
        };

        diesel::insert_into(posts::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_post))
    }

    async fn find_post_by_recipe(
        &self,
        recipe: &RecipeId,
    ) -> Result<Option<Post>, SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<PostRow> = posts::table
            .filter(posts::recipe_id.eq(recipe.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_post))
    }

    async fn like(&self, id: &PostId) -> Result<Option<u32>, SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let likes: Option<i32> = diesel::update(posts::table.filter(posts::id.eq(id.as_uuid())))
            .set(posts::likes.eq(posts::likes + 1))
            .returning(posts::likes)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(likes.map(likes_to_domain))
    }

    async fn unlike(&self, id: &PostId) -> Result<Option<u32>, SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // Guarded decrement: no row qualifies when the counter is at zero.
        let likes: Option<i32> = diesel::update(
            posts::table
                .filter(posts::id.eq(id.as_uuid()))
                .filter(posts::likes.gt(0)),
        )
        .set(posts::likes.eq(posts::likes - 1))
        .returning(posts::likes)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel)?;

        if let Some(likes) = likes {
            return Ok(Some(likes_to_domain(likes)));
        }

        // Nothing decremented: distinguish "at zero" from "no such post".
        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(|r| likes_to_domain(r.likes)))
    }

    async fn insert_bookmark(&self, bookmark: &Bookmark) -> Result<(), SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewBookmarkRow {
            id: Uuid::new_v4(),
            user_id: *bookmark.user().as_uuid(),
            recipe_id: *bookmark.recipe().as_uuid(),
        };

        diesel::insert_into(bookmarks::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn bookmarks_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<Bookmark>, SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<BookmarkRow> = bookmarks::table
            .filter(bookmarks::user_id.eq(user.as_uuid()))
            .select(BookmarkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                Bookmark::new(UserId::from_uuid(row.user_id), RecipeId::from_uuid(row.recipe_id))
            })
            .collect())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewCommentRow {
            id: *comment.id(),
            post_id: *comment.post().as_uuid(),
            author_id: *comment.author().as_uuid(),
            body: comment.body(),
        };

        diesel::insert_into(comments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn comments_for_post(
        &self,
        post: &PostId,
    ) -> Result<Vec<Comment>, SocialPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post.as_uuid()))
            .select(CommentRow::as_select())
            .order_by(comments::created_at)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_comment).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;

    use super::*;

    #[test]
    fn negative_stored_likes_clamp_to_zero() {
        let row = PostRow {
            id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            likes: -3,
        };
        assert_eq!(row_to_post(row).likes(), 0);
    }

    #[test]
    fn comment_rows_convert() {
        let row = CommentRow {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            body: "Nice".to_owned(),
            created_at: Utc::now(),
        };
        let comment = row_to_comment(row);
        assert_eq!(comment.body(), "Nice");
    }

    #[test]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, SocialPersistenceError::Connection { .. }));
    }
}
