//! LLM-assisted recipe generation.
//!
//! The completion provider's reply is untrusted text: it is parsed as strict
//! JSON and validated like any recipe draft before anything is stored. A
//! reply that fails to parse is a dependency failure, not a validation
//! error, because it originates outside user input.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::error::Error;
use crate::domain::ports::{
    AllergyRepository, CompletionError, CompletionRequest, RecipeCompletion, RecipeRepository,
};
use crate::domain::recipe::{Recipe, RecipeDraft};
use crate::domain::repo_errors::{map_allergy_persistence_error, map_recipe_persistence_error};
use crate::domain::user::UserId;

/// System instruction fixing the reply format.
const SYSTEM_PROMPT: &str = "You create recipes using given ingredients. Include the ingredients \
     in the contents. Reply with a single JSON object with keys \"title\", \"content\", and \
     \"ingredients\", where \"ingredients\" lists only ingredient names, comma separated, \
     without quantities.";

/// Validated generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    question: String,
    ingredients: Vec<String>,
    dietary_restrictions: Vec<String>,
}

impl GenerationRequest {
    /// Construct a request; the free-text question is required.
    pub fn try_from_parts(
        question: &str,
        ingredients: Vec<String>,
        dietary_restrictions: Vec<String>,
    ) -> Result<Self, Error> {
        let question = question.trim().to_owned();
        if question.is_empty() {
            return Err(Error::invalid_request("question is required"));
        }
        Ok(Self {
            question,
            ingredients,
            dietary_restrictions,
        })
    }
}

/// Shape the provider is instructed to reply with.
#[derive(Debug, Deserialize)]
struct GeneratedRecipeDto {
    title: String,
    content: String,
    #[serde(default)]
    ingredients: String,
}

/// Recipe generation service over the completion provider and recipe store.
pub struct RecipeGenerationService {
    completion: Arc<dyn RecipeCompletion>,
    recipes: Arc<dyn RecipeRepository>,
    allergies: Arc<dyn AllergyRepository>,
}

impl RecipeGenerationService {
    /// Build the service from its collaborators.
    pub fn new(
        completion: Arc<dyn RecipeCompletion>,
        recipes: Arc<dyn RecipeRepository>,
        allergies: Arc<dyn AllergyRepository>,
    ) -> Self {
        Self {
            completion,
            recipes,
            allergies,
        }
    }

    /// Generate a recipe for the user and store it as a private draft.
    ///
    /// The user's stored allergies are folded into the dietary restrictions
    /// before prompting.
    pub async fn generate(
        &self,
        user: &UserId,
        request: &GenerationRequest,
    ) -> Result<Recipe, Error> {
        let restrictions = self.effective_restrictions(user, request).await?;
        let prompt = build_prompt(request, &restrictions);

        let reply = self
            .completion
            .complete(&prompt)
            .await
            .map_err(map_completion_error)?;

        let draft = parse_reply(&reply)?;
        let recipe = Recipe::from_draft(*user, &draft);
        self.recipes
            .insert(&recipe)
            .await
            .map_err(map_recipe_persistence_error)?;
        Ok(recipe)
    }

    /// Explicit restrictions plus stored allergies, first occurrence wins.
    async fn effective_restrictions(
        &self,
        user: &UserId,
        request: &GenerationRequest,
    ) -> Result<Vec<String>, Error> {
        let mut restrictions = request.dietary_restrictions.clone();
        let allergies = self
            .allergies
            .list_for(user)
            .await
            .map_err(map_allergy_persistence_error)?;
        for allergy in allergies {
            let label = format!("no {allergy}");
            if !restrictions.contains(&label) {
                restrictions.push(label);
            }
        }
        Ok(restrictions)
    }
}

fn build_prompt(request: &GenerationRequest, restrictions: &[String]) -> CompletionRequest {
    let user = format!(
        "Create a recipe using the following ingredients: {}. Dietary restrictions: {}. Question: {}",
        request.ingredients.join(", "),
        restrictions.join(", "),
        request.question,
    );
    CompletionRequest {
        system: SYSTEM_PROMPT.to_owned(),
        user,
    }
}

/// Parse the provider's reply into a validated recipe draft.
fn parse_reply(reply: &str) -> Result<RecipeDraft, Error> {
    let dto: GeneratedRecipeDto = serde_json::from_str(reply).map_err(|error| {
        tracing::warn!(%error, "completion reply is not the requested JSON shape");
        Error::dependency("recipe provider returned an unusable reply")
    })?;

    let ingredients: Vec<String> = dto
        .ingredients
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    RecipeDraft::try_from_parts(&dto.title, &dto.content, &ingredients).map_err(|error| {
        tracing::warn!(%error, "completion reply failed draft validation");
        Error::dependency("recipe provider returned an unusable reply")
    })
}

fn map_completion_error(error: CompletionError) -> Error {
    tracing::warn!(%error, "completion provider call failed");
    Error::dependency("recipe provider is unavailable")
}



#[cfg(test)]
mod tests {
    //! Regression coverage for prompt assembly and reply handling.
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::recipe::IngredientName;
    use crate::outbound::memory::{InMemoryAllergyRepository, InMemoryRecipeRepository};

    struct CannedCompletion {
        reply: String,
        prompts: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedCompletion {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_owned(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> CompletionRequest {
            self.prompts
                .lock()
                .expect("state lock")
                .last()
                .cloned()
                .expect("a prompt was sent")
        }
    }

    #[async_trait]
    impl RecipeCompletion for CannedCompletion {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.prompts.lock().expect("state lock").push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl RecipeCompletion for FailingCompletion {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            Err(CompletionError::status(503_u16, "overloaded"))
        }
    }

    fn user() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
    }

    fn request() -> GenerationRequest {
        GenerationRequest::try_from_parts(
            "Something quick for dinner",
            vec!["Pasta".to_owned(), "Garlic".to_owned()],
            vec!["vegetarian".to_owned()],
        )
        .expect("valid request")
    }

    const GOOD_REPLY: &str = r#"{"title":"Garlic Pasta","content":"Boil pasta, fry garlic, toss.","ingredients":"Pasta, Garlic, Olive oil"}"#;

    #[tokio::test]
    async fn generated_recipe_is_stored_private_with_parsed_ingredients() {
        let completion = Arc::new(CannedCompletion::replying(GOOD_REPLY));
        let recipes = Arc::new(InMemoryRecipeRepository::default());
        let service = RecipeGenerationService::new(
            completion,
            recipes.clone(),
            Arc::new(InMemoryAllergyRepository::default()),
        );

        let recipe = service.generate(&user(), &request()).await.expect("generates");

        assert_eq!(recipe.title().as_ref(), "Garlic Pasta");
        assert!(!recipe.is_public());
        let names: Vec<&str> = recipe.ingredients().iter().map(AsRef::as_ref).collect();
        assert_eq!(names, vec!["Pasta", "Garlic", "Olive oil"]);

        let stored = recipes
            .list_for_owner(&user())
            .await
            .expect("list succeeds");
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn stored_allergies_join_the_dietary_restrictions() {
        let completion = Arc::new(CannedCompletion::replying(GOOD_REPLY));
        let allergies = Arc::new(InMemoryAllergyRepository::default());
        allergies
            .add(&user(), &IngredientName::new("Peanuts").expect("name"))
            .await
            .expect("add allergy");
        let service = RecipeGenerationService::new(
            completion.clone(),
            Arc::new(InMemoryRecipeRepository::default()),
            allergies,
        );

        service.generate(&user(), &request()).await.expect("generates");

        let prompt = completion.last_prompt();
        assert!(prompt.user.contains("vegetarian"));
        assert!(prompt.user.contains("no Peanuts"));
        assert!(prompt.user.contains("Pasta, Garlic"));
    }

    #[tokio::test]
    async fn unparseable_reply_is_a_dependency_failure() {
        let completion = Arc::new(CannedCompletion::replying("Here is your recipe! Enjoy."));
        let recipes = Arc::new(InMemoryRecipeRepository::default());
        let service = RecipeGenerationService::new(
            completion,
            recipes.clone(),
            Arc::new(InMemoryAllergyRepository::default()),
        );

        let err = service
            .generate(&user(), &request())
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::DependencyFailure);

        let stored = recipes.list_for_owner(&user()).await.expect("list");
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn blank_title_in_reply_is_a_dependency_failure() {
        let reply = r#"{"title":"  ","content":"x","ingredients":""}"#;
        let service = RecipeGenerationService::new(
            Arc::new(CannedCompletion::replying(reply)),
            Arc::new(InMemoryRecipeRepository::default()),
            Arc::new(InMemoryAllergyRepository::default()),
        );

        let err = service
            .generate(&user(), &request())
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::DependencyFailure);
    }

    #[tokio::test]
    async fn provider_failure_is_a_dependency_failure() {
        let service = RecipeGenerationService::new(
            Arc::new(FailingCompletion),
            Arc::new(InMemoryRecipeRepository::default()),
            Arc::new(InMemoryAllergyRepository::default()),
        );

        let err = service
            .generate(&user(), &request())
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::DependencyFailure);
    }

    #[test]
    fn blank_question_is_rejected() {
        let err = GenerationRequest::try_from_parts("   ", vec![], vec![]).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
