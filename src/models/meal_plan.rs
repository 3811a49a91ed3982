// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal plan records.

use super::recipe::MealType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub is_completed: bool,
    pub is_auto_generated: bool,
    pub generation_preferences: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// A planned meal on a given day, either a recipe or a free-form meal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanItem {
    pub id: i64,
    pub meal_plan_id: i64,
    pub recipe_id: Option<i64>,
    pub recipe_name: Option<String>,
    pub recipe_image_url: Option<String>,
    pub meal_name: Option<String>,
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub planned_servings: u32,
    pub actual_servings: Option<u32>,
    pub is_cooked: bool,
    pub is_skipped: bool,
    pub notes: Option<String>,
    pub prep_notes: Option<String>,
    pub created_at: String,
    pub cooked_at: Option<String>,
}

/// Body of `POST /meal-plans/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMealPlan {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Body of `POST /meal-plans/{id}/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMealPlanItem {
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: Option<i64>,
    pub meal_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlans {
    pub meal_plans: Vec<MealPlan>,
}

/// A meal plan with its scheduled items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanDetail {
    pub meal_plan: MealPlan,
    #[serde(default)]
    pub items: Vec<MealPlanItem>,
}
