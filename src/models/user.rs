//! User, credential, and token records.

use serde::{Deserialize, Serialize};

/// Server-owned user profile.
///
/// `/users/me` answers with the full profile. Registration answers with the
/// public subset, which has no email, flags, preferences or last login; those
/// fields decode to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    /// beginner, intermediate or advanced
    pub cooking_skill_level: String,
    pub dietary_preferences: Option<Vec<String>>,
    pub favorite_cuisines: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    /// When the account was created (ISO 8601)
    pub created_at: String,
    pub last_login: Option<String>,
}

/// Partial profile update. Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_skill_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_cuisines: Option<Vec<String>>,
}

/// Tokens issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Account registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    #[serde(rename = "confirm_password")]
    pub password_confirmation: String,
}
