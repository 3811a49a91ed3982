// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the MealMate backend.
//!
//! Serves the documented wire contract under `/api/v1` on an ephemeral
//! port and records every request it receives.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use mealmate_client::models::User;
use mealmate_client::services::{ApiClient, Notifier, SessionManager};
use mealmate_client::store::MemoryTokenStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// A user the mock server can log in.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    /// Artificial latency on login
    pub login_delay: Duration,
}

#[derive(Default)]
pub struct MockBackend {
    pub accounts: Mutex<Vec<Account>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
    /// `POST /auth/logout` answers 500 with a non-JSON body
    pub fail_logout: AtomicBool,
    /// `GET /users/me` answers 500
    pub fail_current_user: AtomicBool,
    /// `PUT /users/me` answers 422 with a validation list
    pub fail_profile_update: AtomicBool,
}

impl MockBackend {
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose method and path match.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == format!("/api/v1{}", path))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub fn set_fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_current_user(&self, fail: bool) {
        self.fail_current_user.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_profile_update(&self, fail: bool) {
        self.fail_profile_update.store(fail, Ordering::SeqCst);
    }

    fn account_for_token(&self, headers: &HeaderMap) -> Option<Account> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .to_string();
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.access_token == token)
            .cloned()
    }
}

pub fn sample_user(id: i64, email: &str, username: &str) -> User {
    User {
        id,
        email: email.to_string(),
        username: username.to_string(),
        full_name: format!("{} Example", username),
        bio: None,
        profile_image: None,
        cooking_skill_level: "beginner".to_string(),
        dietary_preferences: Some(vec!["vegetarian".to_string()]),
        favorite_cuisines: None,
        is_active: true,
        is_verified: false,
        created_at: "2026-01-05T10:00:00".to_string(),
        last_login: None,
    }
}

pub fn account(id: i64, email: &str, password: &str, access: &str, refresh: &str) -> Account {
    let username = email.split('@').next().unwrap_or("user");
    Account {
        email: email.to_string(),
        password: password.to_string(),
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        user: sample_user(id, email, username),
        login_delay: Duration::ZERO,
    }
}

/// The account from the documented login scenario: a@b.com / x -> T1, R1.
pub fn default_account() -> Account {
    account(1, "a@b.com", "x", "T1", "R1")
}

pub fn recipe_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "cuisine": "Indian",
        "instructions": "Combine everything and simmer for twenty minutes.",
        "description": null,
        "translated_name": null,
        "total_time_mins": 30,
        "prep_time_mins": 10,
        "cook_time_mins": 20,
        "difficulty": "easy",
        "servings": 4,
        "ingredient_count": 1,
        "image_url": null,
        "original_url": null,
        "tags": ["curry"],
        "meal_type": "dinner",
        "spice_level": "very_hot",
        "calories_per_serving": 320.5,
        "protein_grams": null,
        "carbs_grams": null,
        "fat_grams": null,
        "view_count": 12,
        "favorite_count": 3,
        "rating_average": 4.5,
        "rating_count": 2,
        "is_active": true,
        "is_verified": true,
        "created_at": "2026-01-01T00:00:00",
        "updated_at": null,
        "ingredients": [
            {"ingredient_id": 7, "ingredient_name": "paneer", "quantity": "200", "unit": "g"}
        ],
        "is_favorite": false
    })
}

/// Pantry rows come back as stored, without the joined ingredient name.
fn pantry_item_json(id: i64, quantity: f64, unit: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "ingredient_id": 100 + id,
        "quantity": quantity,
        "unit": unit,
        "expiration_date": "2026-11-01",
        "purchase_date": null,
        "is_expired": false,
        "storage_location": "fridge",
        "notes": null,
        "low_stock_threshold": null,
        "is_low_stock": false,
        "created_at": "2026-10-01T08:00:00",
        "updated_at": null
    })
}

fn meal_plan_json(id: i64, name: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "name": name,
        "description": null,
        "start_date": start,
        "end_date": end,
        "is_active": true,
        "is_completed": false,
        "is_auto_generated": false,
        "generation_preferences": null,
        "created_at": "2026-10-01T08:00:00",
        "updated_at": null
    })
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn not_authenticated() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

// ─── Recording Middleware ────────────────────────────────────────────────────

async fn record(State(backend): State<Arc<MockBackend>>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let header_str = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    backend.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        headers: parts.headers.clone(),
        body: serde_json::from_slice(&bytes).ok(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn login(State(backend): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let account = backend
        .accounts
        .lock()
        .unwrap()
        .iter()
        .find(|a| a.email == email && a.password == password)
        .cloned();

    match account {
        Some(account) => {
            tokio::time::sleep(account.login_delay).await;
            Json(json!({
                "access_token": account.access_token,
                "refresh_token": account.refresh_token,
                "token_type": "bearer",
                "expires_in": 3600
            }))
            .into_response()
        }
        None => detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@b.com" {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    // Public profile only: no email, flags or preferences
    let user = json!({
        "id": 42,
        "username": body["username"],
        "full_name": body["full_name"],
        "bio": null,
        "profile_image": null,
        "cooking_skill_level": "beginner",
        "created_at": "2026-10-14T09:30:00.123456+00:00"
    });
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn logout(State(backend): State<Arc<MockBackend>>) -> Response {
    if backend.fail_logout.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    Json(json!({ "message": "Successfully logged out" })).into_response()
}

async fn current_user(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if backend.fail_current_user.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Bytes::from_static(b"")).into_response();
    }
    match backend.account_for_token(&headers) {
        Some(account) => Json(account.user).into_response(),
        None => not_authenticated(),
    }
}

async fn update_current_user(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Json(update): Json<Value>,
) -> Response {
    if backend.fail_profile_update.load(Ordering::SeqCst) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [
                {"loc": ["body", "cooking_skill_level"], "msg": "string does not match regex", "type": "value_error"}
            ]})),
        )
            .into_response();
    }
    let Some(account) = backend.account_for_token(&headers) else {
        return not_authenticated();
    };

    let mut user = serde_json::to_value(&account.user).unwrap();
    if let (Value::Object(target), Value::Object(fields)) = (&mut user, update) {
        for (k, v) in fields {
            target.insert(k, v);
        }
    }
    let updated: User = serde_json::from_value(user).unwrap();

    for a in backend.accounts.lock().unwrap().iter_mut() {
        if a.access_token == account.access_token {
            a.user = updated.clone();
        }
    }
    Json(updated).into_response()
}

async fn list_recipes(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: u32 = params
        .get("page_size")
        .and_then(|p| p.parse().ok())
        .unwrap_or(20);
    Json(json!({
        "recipes": [recipe_json(1, "Paneer Tikka"), recipe_json(2, "Dal Makhani")],
        "total_count": 2,
        "page": page,
        "page_size": page_size,
        "total_pages": 1,
        "filters_applied": {
            "query": params.get("search"),
            "cuisine": params.get("cuisine"),
            "difficulty": params.get("difficulty")
        }
    }))
}

async fn get_recipe(Path(id): Path<i64>) -> Response {
    if id == 1 {
        Json(recipe_json(1, "Paneer Tikka")).into_response()
    } else {
        detail(StatusCode::NOT_FOUND, "Recipe not found")
    }
}

async fn toggle_favorite(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if backend.account_for_token(&headers).is_none() {
        return not_authenticated();
    }
    Json(json!({
        "message": format!("Recipe {} added to favorites", id),
        "is_favorite": true,
        "favorite_count": 4
    }))
    .into_response()
}

async fn rate_recipe(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "Rating saved", "recipe_id": id, "rating": body["rating"] }))
}

async fn cuisines() -> Json<Value> {
    Json(json!({ "cuisines": ["Indian", "Italian", "Thai"] }))
}

async fn pantry_items() -> Json<Value> {
    Json(json!({ "items": [pantry_item_json(1, 200.0, "g")] }))
}

async fn add_pantry_item(Json(body): Json<Value>) -> Json<Value> {
    let item = pantry_item_json(
        2,
        body["quantity"].as_f64().unwrap_or_default(),
        body["unit"].as_str().unwrap_or_default(),
    );
    Json(json!({ "message": "Item added to pantry", "item": item }))
}

async fn remove_pantry_item(Path(id): Path<i64>) -> Response {
    if id == 1 {
        Json(json!({ "message": "Item removed from pantry" })).into_response()
    } else {
        detail(StatusCode::NOT_FOUND, "Pantry item not found")
    }
}

async fn meal_plans() -> Json<Value> {
    Json(json!({ "meal_plans": [meal_plan_json(5, "Week 42", "2026-10-12", "2026-10-18")] }))
}

async fn create_meal_plan(Json(body): Json<Value>) -> Json<Value> {
    let plan = meal_plan_json(
        6,
        body["name"].as_str().unwrap_or_default(),
        body["start_date"].as_str().unwrap_or_default(),
        body["end_date"].as_str().unwrap_or_default(),
    );
    Json(json!({ "message": "Meal plan created", "meal_plan": plan }))
}

async fn get_meal_plan(Path(id): Path<i64>) -> Response {
    if id != 5 {
        return detail(StatusCode::NOT_FOUND, "Meal plan not found");
    }
    Json(json!({
        "meal_plan": meal_plan_json(5, "Week 42", "2026-10-12", "2026-10-18"),
        "items": [{
            "id": 9,
            "meal_plan_id": 5,
            "recipe_id": 1,
            "recipe_name": "Paneer Tikka",
            "recipe_image_url": null,
            "meal_name": null,
            "meal_date": "2026-10-14",
            "meal_type": "dinner",
            "planned_servings": 2,
            "actual_servings": null,
            "is_cooked": false,
            "is_skipped": false,
            "notes": null,
            "prep_notes": null,
            "created_at": "2026-10-01T08:00:00",
            "cooked_at": null
        }]
    }))
    .into_response()
}

async fn add_meal_plan_item(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "Meal added to plan", "meal_plan_id": id, "item": body }))
}

async fn search_recipes(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default().to_lowercase();
    let recipes: Vec<Value> = [recipe_json(1, "Paneer Tikka"), recipe_json(2, "Dal Makhani")]
        .into_iter()
        .filter(|r| {
            r["name"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&query)
        })
        .collect();
    let total = recipes.len();
    Json(json!({ "recipes": recipes, "total": total }))
}

async fn search_by_pantry(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Json<Value> {
    if backend.account_for_token(&headers).is_none() {
        return Json(json!({ "recipes": [], "message": "Login required to use pantry matching" }));
    }
    Json(json!({ "recipes": [recipe_json(1, "Paneer Tikka")], "total": 1 }))
}

async fn search_ingredients(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let name = params.get("query").cloned().unwrap_or_default();
    Json(json!({
        "ingredients": [{
            "id": 7,
            "name": name,
            "category": "dairy",
            "common_units": ["g"],
            "calories_per_100g": 265.0,
            "protein_per_100g": null,
            "carbs_per_100g": null,
            "fat_per_100g": null,
            "storage_tips": null,
            "shelf_life_days": 7,
            "created_at": "2026-01-01T00:00:00"
        }],
        "total": 1
    }))
}

// ─── Raw endpoints for request primitive tests ───────────────────────────────

async fn raw_ok() -> Json<Value> {
    Json(json!({ "a": 1 }))
}

async fn raw_missing() -> Response {
    detail(StatusCode::NOT_FOUND, "not found")
}

async fn raw_broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>Internal Error</html>").into_response()
}

async fn raw_teapot() -> Response {
    (StatusCode::IM_A_TEAPOT, Json(json!({ "error": "short and stout" }))).into_response()
}

async fn raw_not_json() -> &'static str {
    "plain text"
}

pub fn create_router(backend: Arc<MockBackend>) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/users/me", get(current_user).put(update_current_user))
        .route("/recipes/", get(list_recipes))
        .route("/recipes/cuisines/list", get(cuisines))
        .route("/recipes/{id}", get(get_recipe))
        .route("/recipes/{id}/favorite", post(toggle_favorite))
        .route("/recipes/{id}/rate", post(rate_recipe))
        .route("/pantry/items", get(pantry_items).post(add_pantry_item))
        .route("/pantry/items/{id}", delete(remove_pantry_item))
        .route("/meal-plans/", get(meal_plans).post(create_meal_plan))
        .route("/meal-plans/{id}", get(get_meal_plan))
        .route("/meal-plans/{id}/items", post(add_meal_plan_item))
        .route("/search/recipes", get(search_recipes))
        .route("/search/recipes/by-pantry", get(search_by_pantry))
        .route("/search/ingredients", get(search_ingredients))
        .route("/raw/ok", get(raw_ok).post(raw_ok))
        .route("/raw/missing", get(raw_missing))
        .route("/raw/broken", get(raw_broken))
        .route("/raw/teapot", get(raw_teapot))
        .route("/raw/not-json", get(raw_not_json));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

/// Serve `backend` on an ephemeral port and return the API base URL.
pub async fn spawn_backend(backend: MockBackend) -> (String, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    let app = create_router(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/v1", addr), backend)
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v1", addr)
}

/// Client against `base_url` plus a handle on its token slots.
pub fn test_client(base_url: &str) -> (Arc<ApiClient>, MemoryTokenStore) {
    let store = MemoryTokenStore::new();
    let client = Arc::new(ApiClient::new(base_url, Arc::new(store.clone())));
    (client, store)
}

/// Notifier that keeps every notice for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub struct TestSession {
    pub manager: SessionManager,
    pub client: Arc<ApiClient>,
    pub store: MemoryTokenStore,
    pub notifier: Arc<RecordingNotifier>,
    pub backend: Arc<MockBackend>,
}

/// Session manager backed by a fresh mock server and memory store.
pub async fn test_session(backend: MockBackend) -> TestSession {
    let (base_url, backend) = spawn_backend(backend).await;
    let (client, store) = test_client(&base_url);
    let notifier = Arc::new(RecordingNotifier::default());
    let manager = SessionManager::new(client.clone(), notifier.clone());
    TestSession {
        manager,
        client,
        store,
        notifier,
        backend,
    }
}
