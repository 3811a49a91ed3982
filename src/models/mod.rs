// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wire records exchanged with the MealMate API.

pub mod meal_plan;
pub mod pantry;
pub mod recipe;
pub mod user;

pub use meal_plan::{
    MealPlan, MealPlanDetail, MealPlanItem, MealPlans, NewMealPlan, NewMealPlanItem,
};
pub use pantry::{NewPantryItem, PantryItem, PantryItems};
pub use recipe::{
    CuisineList, Difficulty, FavoriteToggle, Ingredient, IngredientSearchResults, MealType,
    RatingRequest, Recipe, RecipeIngredient, RecipePage, RecipeQuery, RecipeSearchFilters,
    RecipeSearchResults, SpiceLevel,
};
pub use user::{LoginCredentials, RegisterData, TokenPair, User, UserUpdate};

use serde::{Deserialize, Serialize};

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
