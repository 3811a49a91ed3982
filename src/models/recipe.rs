// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe, ingredient, and search records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
    VeryHot,
}

/// An ingredient line within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub instructions: String,
    pub description: Option<String>,
    pub translated_name: Option<String>,
    pub total_time_mins: Option<u32>,
    pub prep_time_mins: Option<u32>,
    pub cook_time_mins: Option<u32>,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub ingredient_count: Option<u32>,
    pub image_url: Option<String>,
    pub original_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub meal_type: Option<MealType>,
    pub spice_level: Option<SpiceLevel>,

    // Nutrition, per serving
    pub calories_per_serving: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,

    pub view_count: u64,
    pub favorite_count: u64,
    pub rating_average: f64,
    pub rating_count: u64,

    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: String,
    pub updated_at: Option<String>,

    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    /// Set by the server relative to the current user
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub common_units: Option<Vec<String>>,
    pub calories_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub storage_tips: Option<String>,
    pub shelf_life_days: Option<u32>,
    pub created_at: String,
}

/// Query parameters for `GET /recipes/`. Unset parameters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Filters the server reports as applied to a recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeSearchFilters {
    pub query: Option<String>,
    pub cuisine: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_time: Option<u32>,
    pub meal_type: Option<MealType>,
    pub spice_level: Option<SpiceLevel>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    pub max_missing_ingredients: Option<u32>,
    pub min_rating: Option<f64>,
    pub vegetarian: Option<bool>,
    pub vegan: Option<bool>,
    pub gluten_free: Option<bool>,
}

/// One page of `GET /recipes/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub filters_applied: RecipeSearchFilters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteToggle {
    pub message: String,
    pub is_favorite: bool,
    pub favorite_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRequest {
    /// 1 to 5
    pub rating: u8,
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineList {
    pub cuisines: Vec<String>,
}

/// Results of a free-text or pantry-based recipe search.
///
/// Pantry matching without a login answers with no `total`, so it defaults to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSearchResults {
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub total: u64,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSearchResults {
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub total: u64,
}
