//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain; adapters convert them at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    allergies, bookmarks, comments, ingredients, posts, recipes, shopping_list_items, users,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_public: bool,
    #[expect(dead_code, reason = "schema field read for completeness")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new recipe records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub is_public: bool,
}

/// Changeset struct for updating recipe title and content.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Row struct for reading from the ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    #[expect(dead_code, reason = "primary key read for completeness")]
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating new ingredient records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the shopping_list_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shopping_list_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShoppingListItemRow {
    #[expect(dead_code, reason = "primary key read for completeness")]
    pub id: Uuid,
    #[expect(dead_code, reason = "filter column read for completeness")]
    pub user_id: Uuid,
    pub name: String,
    #[expect(dead_code, reason = "ordering column read for completeness")]
    pub position: i32,
}

/// Insertable struct for creating new shopping-list items.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shopping_list_items)]
pub(crate) struct NewShoppingListItemRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub position: i32,
}

/// Row struct for reading from the allergies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = allergies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AllergyRow {
    #[expect(dead_code, reason = "primary key read for completeness")]
    pub id: Uuid,
    #[expect(dead_code, reason = "filter column read for completeness")]
    pub user_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating new allergy records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = allergies)]
pub(crate) struct NewAllergyRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub likes: i32,
}

/// Insertable struct for creating new post records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub likes: i32,
}

/// Row struct for reading from the bookmarks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookmarkRow {
    #[expect(dead_code, reason = "primary key read for completeness")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

/// Insertable struct for creating new bookmark records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookmarks)]
pub(crate) struct NewBookmarkRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    #[expect(dead_code, reason = "ordering column read for completeness")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: &'a str,
}
