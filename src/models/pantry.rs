//! Pantry records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ingredient the user has on hand.
///
/// The listing returns stored rows, so the joined ingredient fields are
/// usually absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub ingredient_id: i64,
    #[serde(default)]
    pub ingredient_name: Option<String>,
    #[serde(default)]
    pub ingredient_category: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
    pub notes: Option<String>,
    pub is_expired: bool,
    pub is_low_stock: bool,
    pub low_stock_threshold: Option<f64>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Body of `POST /pantry/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPantryItem {
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItems {
    pub items: Vec<PantryItem>,
}
