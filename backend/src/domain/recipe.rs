//! Recipe aggregate and its ingredient names.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Validation errors raised by the recipe value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    /// The id string is not a valid UUID.
    InvalidId,
    /// The title is blank once trimmed.
    EmptyTitle,
    /// The title exceeds the permitted length.
    TitleTooLong {
        /// Maximum number of characters permitted.
        max: usize,
    },
    /// An ingredient name is blank once trimmed.
    EmptyIngredient,
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "recipe id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyIngredient => write!(f, "ingredient names must not be empty"),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

/// Stable recipe identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Validate and construct a [`RecipeId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| RecipeValidationError::InvalidId)
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

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a recipe title.
pub const TITLE_MAX: usize = 200;

/// Recipe title shown in lists and on the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeTitle(String);

impl RecipeTitle {
    /// Validate and construct a [`RecipeTitle`].
    pub fn new(raw: impl Into<String>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipeTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RecipeTitle> for String {
    fn from(value: RecipeTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for RecipeTitle {
    type Error = RecipeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Ingredient name attached to a recipe or a shopping list.
///
/// Comparison is exact and case-sensitive; "Milk" and "milk" are distinct
/// entries on purpose, matching the shopping-list merge contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IngredientName(String);

impl IngredientName {
    /// Validate and construct an [`IngredientName`].
    pub fn new(raw: impl Into<String>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyIngredient);
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for IngredientName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IngredientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<IngredientName> for String {
    fn from(value: IngredientName) -> Self {
        value.0
    }
}

impl TryFrom<String> for IngredientName {
    type Error = RecipeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated payload for creating or updating a recipe.
///
/// Ingredient names are deduplicated (first occurrence wins) because the
/// store enforces uniqueness per recipe.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    title: RecipeTitle,
    content: String,
    ingredients: Vec<IngredientName>,
}

impl RecipeDraft {
    /// Construct a draft from raw inputs.
    pub fn try_from_parts(
        title: &str,
        content: &str,
        ingredients: &[String],
    ) -> Result<Self, RecipeValidationError> {
        let title = RecipeTitle::new(title)?;
        let mut seen: Vec<IngredientName> = Vec::with_capacity(ingredients.len());
        for raw in ingredients {
            let name = IngredientName::new(raw.as_str())?;
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        Ok(Self {
            title,
            content: content.to_owned(),
            ingredients: seen,
        })
    }

    /// Recipe title.
    pub fn title(&self) -> &RecipeTitle {
        &self.title
    }

    /// Free-text body of the recipe.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Deduplicated ingredient names.
    pub fn ingredients(&self) -> &[IngredientName] {
        &self.ingredients
    }
}

/// Recipe aggregate.
///
/// ## Invariants
/// - Ingredient names are unique within one recipe.
/// - `public` starts `false`; publishing to the feed is the only way to flip
///   it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    id: RecipeId,
    owner: UserId,
    title: RecipeTitle,
    content: String,
    public: bool,
    ingredients: Vec<IngredientName>,
}

impl Recipe {
    /// Materialise a recipe from validated components.
    pub fn new(
        id: RecipeId,
        owner: UserId,
        title: RecipeTitle,
        content: String,
        public: bool,
        ingredients: Vec<IngredientName>,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            content,
            public,
            ingredients,
        }
    }

    /// Create a fresh, private recipe from a draft.
    pub fn from_draft(owner: UserId, draft: &RecipeDraft) -> Self {
        Self::new(
            RecipeId::random(),
            owner,
            draft.title().clone(),
            draft.content().to_owned(),
            false,
            draft.ingredients().to_vec(),
        )
    }

    /// Stable recipe identifier.
    pub fn id(&self) -> &RecipeId {
        &self.id
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Recipe title.
    pub fn title(&self) -> &RecipeTitle {
        &self.title
    }

    /// Free-text body.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Whether the recipe is visible on the public feed.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Ingredient names, unique within this recipe.
    pub fn ingredients(&self) -> &[IngredientName] {
        &self.ingredients
    }

    /// Apply a draft to an existing recipe, keeping id, owner, and
    /// visibility.
    pub fn apply_draft(&mut self, draft: &RecipeDraft) {
        self.title = draft.title().clone();
        self.content = draft.content().to_owned();
        self.ingredients = draft.ingredients().to_vec();
    }

    /// Mark the recipe as publicly visible.
    pub fn publish(&mut self) {
        self.public = true;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn owner() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
    }

    #[rstest]
    #[case("", RecipeValidationError::EmptyTitle)]
    #[case("   ", RecipeValidationError::EmptyTitle)]
    fn blank_titles_are_rejected(#[case] title: &str, #[case] expected: RecipeValidationError) {
        let err = RecipeDraft::try_from_parts(title, "body", &[]).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let title = "x".repeat(TITLE_MAX + 1);
        let err = RecipeDraft::try_from_parts(&title, "body", &[]).expect_err("must fail");
        assert_eq!(err, RecipeValidationError::TitleTooLong { max: TITLE_MAX });
    }

    #[test]
    fn draft_deduplicates_ingredients_preserving_order() {
        let draft = RecipeDraft::try_from_parts(
            "Pancakes",
            "Mix and fry.",
            &[
                "Flour".to_owned(),
                "Milk".to_owned(),
                "Flour".to_owned(),
                "Eggs".to_owned(),
            ],
        )
        .expect("valid draft");
        let names: Vec<&str> = draft.ingredients().iter().map(AsRef::as_ref).collect();
        assert_eq!(names, vec!["Flour", "Milk", "Eggs"]);
    }

    #[test]
    fn ingredient_names_are_case_sensitive() {
        let draft = RecipeDraft::try_from_parts(
            "Pancakes",
            "",
            &["Milk".to_owned(), "milk".to_owned()],
        )
        .expect("valid draft");
        assert_eq!(draft.ingredients().len(), 2);
    }

    #[test]
    fn new_recipes_start_private() {
        let draft = RecipeDraft::try_from_parts("T", "C", &[]).expect("valid draft");
        let mut recipe = Recipe::from_draft(owner(), &draft);
        assert!(!recipe.is_public());
        recipe.publish();
        assert!(recipe.is_public());
    }

    #[test]
    fn apply_draft_keeps_identity_and_visibility() {
        let draft = RecipeDraft::try_from_parts("T", "C", &["Salt".to_owned()]).expect("draft");
        let mut recipe = Recipe::from_draft(owner(), &draft);
        recipe.publish();
        let id = *recipe.id();

        let update =
            RecipeDraft::try_from_parts("T2", "C2", &["Pepper".to_owned()]).expect("draft");
        recipe.apply_draft(&update);

        assert_eq!(recipe.id(), &id);
        assert_eq!(recipe.owner(), &owner());
        assert!(recipe.is_public());
        assert_eq!(recipe.title().as_ref(), "T2");
        assert_eq!(recipe.ingredients().len(), 1);
    }
}
