//! Recipes: the line items attached to an order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single ingredient the kitchen knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ingredient {
    DarkChocolate,
    WhippedCream,
    MilkChocolate,
    Hazelnuts,
}

impl Ingredient {
    /// Human-readable label, used to build recipe descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Ingredient::DarkChocolate => "dark chocolate",
            Ingredient::WhippedCream => "whipped cream",
            Ingredient::MilkChocolate => "milk chocolate",
            Ingredient::Hazelnuts => "hazelnuts",
        }
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised while constructing a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("Ingredients must be provided")]
    NoIngredients,
}

/// An immutable pancake recipe.
///
/// The ingredient list is never empty. The description is derived once from
/// the ingredient labels, joined in order with `", "`, and is the key used
/// when removing items from an order: two recipes with the same description
/// are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Ingredient>", into = "Vec<Ingredient>")]
pub struct Recipe {
    ingredients: Vec<Ingredient>,
    description: String,
}

impl Recipe {
    /// Builds a recipe from a non-empty ingredient list.
    pub fn new(ingredients: impl IntoIterator<Item = Ingredient>) -> Result<Self, RecipeError> {
        let ingredients: Vec<Ingredient> = ingredients.into_iter().collect();
        if ingredients.is_empty() {
            return Err(RecipeError::NoIngredients);
        }

        let description = ingredients
            .iter()
            .map(Ingredient::label)
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            ingredients,
            description,
        })
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Comparison key for removal, e.g. `"milk chocolate, hazelnuts"`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sentence shown to people, e.g. `"Delicious pancake with dark chocolate!"`.
    pub fn menu_text(&self) -> String {
        format!("Delicious pancake with {}!", self.description)
    }
}

impl TryFrom<Vec<Ingredient>> for Recipe {
    type Error = RecipeError;

    fn try_from(ingredients: Vec<Ingredient>) -> Result<Self, Self::Error> {
        Self::new(ingredients)
    }
}

impl From<Recipe> for Vec<Ingredient> {
    fn from(recipe: Recipe) -> Self {
        recipe.ingredients
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}
