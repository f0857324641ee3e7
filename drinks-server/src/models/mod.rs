use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One ingredient step of a drink recipe
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct RecipePart {
    /// Display color of the ingredient
    pub color: String,
    /// Ingredient name
    pub name: String,
    /// Relative amount of the ingredient
    pub parts: u32,
}

/// A recipe step without its amount
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ShortRecipePart {
    pub color: String,
    pub name: String,
}

/// A stored drink; serializes to the long representation
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// Public view of a drink that hides ingredient amounts
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|part| ShortRecipePart {
                    color: part.color.clone(),
                    name: part.name.clone(),
                })
                .collect(),
        }
    }
}

/// Request body for creating a drink
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct NewDrink {
    /// Unique, non-empty title
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// Request body for updating a drink. Missing or empty fields keep their value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct DrinkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Vec<RecipePart>>,
}

impl DrinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }

    /// Applies the non-empty fields to `drink`
    pub fn apply(self, drink: &mut Drink) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            drink.title = title;
        }
        if let Some(recipe) = self.recipe.filter(|r| !r.is_empty()) {
            drink.recipe = recipe;
        }
    }
}

/// Response listing drinks in the short representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShortDrinksResponse {
    pub success: bool,
    pub drinks: Vec<ShortDrink>,
}

/// Response listing drinks in the long representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinksResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// Response to a successful create
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
    /// Id of the new drink
    pub created: i64,
}

/// Response to a successful update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
    /// Id of the updated drink
    pub updated: i64,
}

/// Response to a successful delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    /// Id of the deleted drink
    pub deleted: i64,
}
