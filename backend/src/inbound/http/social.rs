//! Social feed handlers: publish, list, like, bookmark, comment.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::repo_errors::{
    map_recipe_persistence_error, map_social_persistence_error, map_user_persistence_error,
};
use crate::domain::{Bookmark, Comment, Error, Post, PostId, User};

use super::auth::ExtractedCredentials;
use super::error::ApiResult;
use super::recipes::{RecipeResponse, parse_recipe_id};
use super::state::HttpState;

/// Request body naming a recipe.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIdRequest {
    /// Target recipe id.
    pub recipe_id: String,
}

/// Request body for adding a comment.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Comment text.
    pub text: String,
}

/// A published post with its like counter.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post id.
    pub post_id: String,
    /// Published recipe id.
    pub recipe_id: String,
    /// Current like count.
    pub likes: u32,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            post_id: post.id().to_string(),
            recipe_id: post.recipe().to_string(),
            likes: post.likes(),
        }
    }
}

/// One entry on the public feed.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Post id, absent for public recipes never explicitly published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    /// Recipe id.
    pub recipe_id: String,
    /// Recipe title.
    pub title: String,
    /// Recipe body.
    pub content: String,
    /// Recipe owner.
    pub owner_id: String,
    /// Like count; zero when no post row exists.
    pub likes: u32,
}

/// Like counter after a like/unlike.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// Current like count.
    pub likes: u32,
}

/// One comment with its author's display name.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    /// Comment id.
    pub id: String,
    /// Commenting user id.
    pub author_id: String,
    /// Commenting user display name.
    pub author_name: String,
    /// Comment text.
    pub text: String,
}

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|_| Error::not_found("post not found"))
}

/// Publish one of the caller's recipes to the feed.
///
/// Makes the recipe public and creates its post entry if one does not
/// already exist; republishing returns the existing post.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = RecipeIdRequest,
    responses(
        (status = 200, description = "The recipe's post", body = PostResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 403, description = "Not the recipe owner", body = crate::inbound::http::ApiError),
        (status = 404, description = "Recipe not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["posts"],
    operation_id = "publishRecipe"
)]
#[post("/posts")]
pub async fn publish_recipe(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<RecipeIdRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let recipe_id = parse_recipe_id(&payload.recipe_id)?;

    let recipe = state
        .recipes
        .find_by_id(&recipe_id)
        .await
        .map_err(map_recipe_persistence_error)?
        .ok_or_else(|| Error::not_found("recipe not found"))?;
    if recipe.owner() != user.id() {
        return Err(Error::forbidden("permission denied").into());
    }

    state
        .recipes
        .set_public(&recipe_id, true)
        .await
        .map_err(map_recipe_persistence_error)?;

    let existing = state
        .social
        .find_post_by_recipe(&recipe_id)
        .await
        .map_err(map_social_persistence_error)?;
    let post = match existing {
        Some(post) => post,
        None => {
            let post = Post::for_recipe(recipe_id);
            state
                .social
                .insert_post(&post)
                .await
                .map_err(map_social_persistence_error)?;
            post
        }
    };

    Ok(web::Json(PostResponse::from(&post)))
}

/// The public feed: every published recipe with its like count.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Public feed", body = [FeedEntry]),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
) -> ApiResult<web::Json<Vec<FeedEntry>>> {
    state.gate.resolve(&credentials.into_inner()).await?;

    let recipes = state
        .recipes
        .list_public()
        .await
        .map_err(map_recipe_persistence_error)?;

    let mut feed = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let post = state
            .social
            .find_post_by_recipe(recipe.id())
            .await
            .map_err(map_social_persistence_error)?;
        feed.push(FeedEntry {
            post_id: post.as_ref().map(|p| p.id().to_string()),
            recipe_id: recipe.id().to_string(),
            title: recipe.title().to_string(),
            content: recipe.content().to_owned(),
            owner_id: recipe.owner().to_string(),
            likes: post.map_or(0, |p| p.likes()),
        });
    }
    Ok(web::Json(feed))
}

/// Like a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Post not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["posts"],
    operation_id = "likePost"
)]
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeResponse>> {
    state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_post_id(&path)?;
    let likes = state
        .social
        .like(&id)
        .await
        .map_err(map_social_persistence_error)?
        .ok_or_else(|| Error::not_found("post not found"))?;
    Ok(web::Json(LikeResponse { likes }))
}

/// Remove a like from a post; the counter never goes below zero.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/unlike",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Post not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["posts"],
    operation_id = "unlikePost"
)]
#[post("/posts/{id}/unlike")]
pub async fn unlike_post(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeResponse>> {
    state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_post_id(&path)?;
    let likes = state
        .social
        .unlike(&id)
        .await
        .map_err(map_social_persistence_error)?
        .ok_or_else(|| Error::not_found("post not found"))?;
    Ok(web::Json(LikeResponse { likes }))
}

/// Bookmark a recipe.
#[utoipa::path(
    post,
    path = "/api/v1/bookmarks",
    request_body = RecipeIdRequest,
    responses(
        (status = 201, description = "Bookmark added"),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Recipe not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["bookmarks"],
    operation_id = "addBookmark"
)]
#[post("/bookmarks")]
pub async fn add_bookmark(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    payload: web::Json<RecipeIdRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let recipe_id = parse_recipe_id(&payload.recipe_id)?;

    state
        .recipes
        .find_by_id(&recipe_id)
        .await
        .map_err(map_recipe_persistence_error)?
        .ok_or_else(|| Error::not_found("recipe not found"))?;

    let bookmark = Bookmark::new(*user.id(), recipe_id);
    state
        .social
        .insert_bookmark(&bookmark)
        .await
        .map_err(map_social_persistence_error)?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "message": "bookmark added" })))
}

/// The caller's bookmarked recipes.
#[utoipa::path(
    get,
    path = "/api/v1/bookmarks",
    responses(
        (status = 200, description = "Bookmarked recipes", body = [RecipeResponse]),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError)
    ),
    tags = ["bookmarks"],
    operation_id = "listBookmarks"
)]
#[get("/bookmarks")]
pub async fn list_bookmarks(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let bookmarks = state
        .social
        .bookmarks_for(user.id())
        .await
        .map_err(map_social_persistence_error)?;

    let mut recipes = Vec::with_capacity(bookmarks.len());
    for bookmark in bookmarks {
        let found = state
            .recipes
            .find_by_id(bookmark.recipe())
            .await
            .map_err(map_recipe_persistence_error)?;
        if let Some(recipe) = found {
            recipes.push(RecipeResponse::from(&recipe));
        }
    }
    Ok(web::Json(recipes))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::ApiError),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Post not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_post_id(&path)?;

    let text = payload.into_inner().text;
    if text.trim().is_empty() {
        return Err(Error::invalid_request("comment text must not be empty").into());
    }

    state
        .social
        .find_post(&id)
        .await
        .map_err(map_social_persistence_error)?
        .ok_or_else(|| Error::not_found("post not found"))?;

    let comment = Comment::on_post(id, *user.id(), text);
    state
        .social
        .insert_comment(&comment)
        .await
        .map_err(map_social_persistence_error)?;

    Ok(HttpResponse::Created().json(comment_response(&comment, Some(&user))))
}

/// Comments on a post, oldest first, with author names.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 401, description = "Unauthenticated", body = crate::inbound::http::ApiError),
        (status = 404, description = "Post not found", body = crate::inbound::http::ApiError)
    ),
    tags = ["posts"],
    operation_id = "listComments"
)]
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    credentials: ExtractedCredentials,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    state.gate.resolve(&credentials.into_inner()).await?;
    let id = parse_post_id(&path)?;

    state
        .social
        .find_post(&id)
        .await
        .map_err(map_social_persistence_error)?
        .ok_or_else(|| Error::not_found("post not found"))?;

    let comments = state
        .social
        .comments_for_post(&id)
        .await
        .map_err(map_social_persistence_error)?;

    let mut out = Vec::with_capacity(comments.len());
    for comment in &comments {
        let author = state
            .users
            .find_by_id(comment.author())
            .await
            .map_err(map_user_persistence_error)?;
        out.push(comment_response(comment, author.as_ref()));
    }
    Ok(web::Json(out))
}

fn comment_response(comment: &Comment, author: Option<&User>) -> CommentResponse {
    CommentResponse {
        id: comment.id().to_string(),
        author_id: comment.author().to_string(),
        author_name: author
            .map(|user| user.display_name().to_string())
            .unwrap_or_else(|| "unknown".to_owned()),
        text: comment.body().to_owned(),
    }
}
