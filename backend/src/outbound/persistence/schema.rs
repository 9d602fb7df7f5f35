//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Unique, lowercased login email.
        email -> Varchar,
        /// Bcrypt digest of the account password.
        password_hash -> Varchar,
        /// Name shown to other users.
        display_name -> Varchar,
        /// Role label: "member" or "admin".
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipes owned by users.
    recipes (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Recipe title.
        title -> Varchar,
        /// Free-text body.
        content -> Text,
        /// Whether the recipe is on the public feed.
        is_public -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient rows, unique per (recipe, name).
    ingredients (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Owning recipe.
        recipe_id -> Uuid,
        /// Ingredient name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Ordered shopping-list items; duplicates permitted.
    shopping_list_items (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Ingredient name, stored verbatim.
        name -> Varchar,
        /// Position within the user's list.
        position -> Int4,
    }
}

diesel::table! {
    /// Ingredient names a user must avoid; unique per (user, name).
    allergies (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Ingredient name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Feed posts, at most one per recipe.
    posts (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Published recipe.
        recipe_id -> Uuid,
        /// Non-negative like counter.
        likes -> Int4,
    }
}

diesel::table! {
    /// User bookmarks of recipes.
    bookmarks (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Bookmarking user.
        user_id -> Uuid,
        /// Bookmarked recipe.
        recipe_id -> Uuid,
    }
}

diesel::table! {
    /// Comments on feed posts.
    comments (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Commented post.
        post_id -> Uuid,
        /// Commenting user.
        author_id -> Uuid,
        /// Comment text.
        body -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (owner_id));
diesel::joinable!(ingredients -> recipes (recipe_id));
diesel::joinable!(shopping_list_items -> users (user_id));
diesel::joinable!(allergies -> users (user_id));
diesel::joinable!(posts -> recipes (recipe_id));
diesel::joinable!(bookmarks -> users (user_id));
diesel::joinable!(bookmarks -> recipes (recipe_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    recipes,
    ingredients,
    shopping_list_items,
    allergies,
    posts,
    bookmarks,
    comments,
);
