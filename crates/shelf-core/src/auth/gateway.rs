//! HTTP calls for login, registration, token refresh, and "who am I".

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::session::TokenPair;
use crate::api::{ApiClient, ApiError, ApiResult};

/// Login request. The login form's email field is sent as `username`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /users/add`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Credentials for the automatic login that follows a registration.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Subset of the `/auth/me` and `/users/add` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGateway {
    api: ApiClient,
    expires_in_mins: u32,
}

impl AuthGateway {
    pub fn new(api: ApiClient, expires_in_mins: u32) -> Self {
        Self {
            api,
            expires_in_mins,
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        let url = self.api.url("/auth/login", &[])?;
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
            "expiresInMins": self.expires_in_mins,
        });
        debug!(username = %credentials.username, "logging in");
        self.api
            .send_json(self.api.post(url).json(&body), "log in")
            .await
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<User> {
        let url = self.api.url("/users/add", &[])?;
        debug!(username = %registration.username, "registering");
        self.api
            .send_json(self.api.post(url).json(registration), "register")
            .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let url = self.api.url("/auth/refresh", &[])?;
        let body = json!({
            "refreshToken": refresh_token,
            "expiresInMins": self.expires_in_mins,
        });
        self.api
            .send_json(self.api.post(url).json(&body), "refresh session")
            .await
    }

    pub async fn me(&self, access_token: &str) -> ApiResult<User> {
        if access_token.is_empty() {
            return Err(ApiError::missing_credential("Not logged in"));
        }
        let url = self.api.url("/auth/me", &[])?;
        self.api
            .send_json(
                self.api.get(url).bearer_auth(access_token),
                "fetch current user",
            )
            .await
    }
}
