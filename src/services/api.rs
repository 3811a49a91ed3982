// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MealMate API client.
//!
//! Handles:
//! - Bearer token injection and persistence
//! - Error normalization (network failure, HTTP error, malformed body)
//! - One typed method per backend endpoint

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    CuisineList, FavoriteToggle, IngredientSearchResults, LoginCredentials, MealPlanDetail,
    MealPlans, Message, NewMealPlan, NewMealPlanItem, NewPantryItem, PantryItems, RatingRequest,
    Recipe, RecipePage, RecipeQuery, RecipeSearchResults, RegisterData, TokenPair, User,
    UserUpdate,
};
use crate::store::{FileTokenStore, TokenSlot, TokenStore};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// Per-call options for [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Merged over the default `Content-Type: application/json`
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Append query parameters from any struct that serializes to a flat map.
    /// `None` fields are skipped.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::Decode(format!("Failed to encode query: {}", e)))?;

        if let Value::Object(map) = value {
            for (key, v) in map {
                match v {
                    Value::Null => {}
                    Value::String(s) => self.query.push((key, s)),
                    other => self.query.push((key, other.to_string())),
                }
            }
        }
        Ok(self)
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// MealMate API client.
///
/// Owns the current bearer token. Cloning is not supported; share it behind
/// an `Arc` so every consumer sees the same credential.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client for `base_url` persisting tokens to `store`.
    ///
    /// The stored token is not read here; see [`ApiClient::restore_token`].
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            store,
        }
    }

    /// Create a client backed by the file store named in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_url.clone(),
            Arc::new(FileTokenStore::new(config.token_store_path.clone())),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Current in-memory access token.
    pub fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load the persisted access token into memory and return it.
    pub fn restore_token(&self) -> Result<Option<String>> {
        let stored = self.store.get(TokenSlot::Access)?;
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = stored.clone();
        Ok(stored)
    }

    /// Peek at the persisted refresh token.
    pub fn stored_refresh_token(&self) -> Result<Option<String>> {
        Ok(self.store.get(TokenSlot::Refresh)?)
    }

    /// Replace the in-memory and persisted access token.
    pub fn set_token(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        self.store.set(TokenSlot::Access, token)?;
        Ok(())
    }

    /// Drop the access token and both persisted slots. Idempotent.
    pub fn clear_token(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;

        // Every slot is attempted; the first failure is reported
        let mut first_err = None;
        for slot in TokenSlot::ALL {
            if let Err(e) = self.store.remove(slot) {
                tracing::warn!(slot = slot.key(), error = %e, "Failed to remove stored token");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    // ─── Request Primitive ───────────────────────────────────────────────────

    /// Issue one request against `base_url + endpoint` and decode the JSON body.
    ///
    /// A single attempt: no retries and no token refresh on 401.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let mut builder = self.http.request(options.method.clone(), &url);
        if let Some(token) = self.access_token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Decode(format!("Invalid access token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        builder = builder.headers(headers);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        tracing::debug!(method = %options.method, endpoint, "API request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %options.method, endpoint, error = %e, "API request failed");
            ApiError::Network(e)
        })?;

        self.check_response_json(response, &options.method, endpoint).await
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        method: &Method,
        endpoint: &str,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = ApiError::from_response(status, &body);
            tracing::warn!(
                %method,
                endpoint,
                status = status.as_u16(),
                error = %err,
                "API error response"
            );
            return Err(err);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request(endpoint, RequestOptions::get()).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.request(endpoint, RequestOptions::post().json(body)?).await
    }

    // ─── Authentication ──────────────────────────────────────────────────────

    /// Log in and adopt the issued tokens before returning them.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair> {
        let tokens: TokenPair = self.post_json("/auth/login", credentials).await?;

        self.set_token(&tokens.access_token)?;
        self.store.set(TokenSlot::Refresh, &tokens.refresh_token)?;

        tracing::info!(token_type = %tokens.token_type, "Logged in");
        Ok(tokens)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User> {
        self.post_json("/auth/register", data).await
    }

    /// Tell the server we are leaving. Local tokens are cleared on every path.
    pub async fn logout(&self) -> Result<()> {
        let remote = self
            .request::<Value>("/auth/logout", RequestOptions::post())
            .await;
        let cleared = self.clear_token();

        remote?;
        cleared
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    pub async fn get_current_user(&self) -> Result<User> {
        self.get_json("/users/me").await
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        self.request("/users/me", RequestOptions::put().json(update)?).await
    }

    // ─── Recipes ─────────────────────────────────────────────────────────────

    pub async fn get_recipes(&self, query: &RecipeQuery) -> Result<RecipePage> {
        self.request("/recipes/", RequestOptions::get().query(query)?).await
    }

    pub async fn get_recipe(&self, id: i64) -> Result<Recipe> {
        self.get_json(&format!("/recipes/{}", id)).await
    }

    pub async fn toggle_favorite_recipe(&self, id: i64) -> Result<FavoriteToggle> {
        self.request(&format!("/recipes/{}/favorite", id), RequestOptions::post())
            .await
    }

    pub async fn rate_recipe(&self, id: i64, rating: u8, review: Option<&str>) -> Result<Value> {
        let body = RatingRequest {
            rating,
            review: review.map(str::to_string),
        };
        self.post_json(&format!("/recipes/{}/rate", id), &body).await
    }

    pub async fn get_cuisines(&self) -> Result<CuisineList> {
        self.get_json("/recipes/cuisines/list").await
    }

    // ─── Pantry ──────────────────────────────────────────────────────────────

    pub async fn get_pantry_items(&self) -> Result<PantryItems> {
        self.get_json("/pantry/items").await
    }

    pub async fn add_pantry_item(&self, item: &NewPantryItem) -> Result<Value> {
        self.post_json("/pantry/items", item).await
    }

    pub async fn remove_pantry_item(&self, item_id: i64) -> Result<Message> {
        self.request(
            &format!("/pantry/items/{}", item_id),
            RequestOptions::delete(),
        )
        .await
    }

    // ─── Meal Plans ──────────────────────────────────────────────────────────

    pub async fn get_meal_plans(&self) -> Result<MealPlans> {
        self.get_json("/meal-plans/").await
    }

    pub async fn create_meal_plan(&self, plan: &NewMealPlan) -> Result<Value> {
        self.post_json("/meal-plans/", plan).await
    }

    pub async fn get_meal_plan(&self, id: i64) -> Result<MealPlanDetail> {
        self.get_json(&format!("/meal-plans/{}", id)).await
    }

    pub async fn add_meal_plan_item(&self, plan_id: i64, item: &NewMealPlanItem) -> Result<Value> {
        self.post_json(&format!("/meal-plans/{}/items", plan_id), item)
            .await
    }

    // ─── Search ──────────────────────────────────────────────────────────────

    pub async fn search_recipes(&self, query: &str) -> Result<RecipeSearchResults> {
        self.request(
            "/search/recipes",
            RequestOptions::get().param("query", query),
        )
        .await
    }

    /// Recipes that can be cooked from the current user's pantry.
    pub async fn search_recipes_by_pantry(&self) -> Result<RecipeSearchResults> {
        self.get_json("/search/recipes/by-pantry").await
    }

    pub async fn search_ingredients(&self, query: &str) -> Result<IngredientSearchResults> {
        self.request(
            "/search/ingredients",
            RequestOptions::get().param("query", query),
        )
        .await
    }
}
