use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::models::{RegisterAck, UserProfile};
use crate::services::api::{ApiClient, ApiError};

/// Session context: holds the authenticated identity derived from a single
/// "who am I" call. An unverified account is treated as no session at all.
pub struct SessionService {
    api: Arc<ApiClient>,
    current: RwLock<Option<UserProfile>>,
}

impl SessionService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        SessionService {
            api,
            current: RwLock::new(None),
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    /// Re-runs the identity check. Fetch failures clear the held identity
    /// instead of propagating; an unauthenticated console is a valid state.
    pub async fn refresh(&self) -> Option<UserProfile> {
        let profile = match self.api.get::<UserProfile>("/api/accounts/me/").await {
            Ok(user) if user.is_verified => Some(user),
            Ok(user) => {
                info!(username = %user.username, "identity present but unverified");
                None
            }
            Err(err) => {
                if err.status() != Some(401) && err.status() != Some(403) {
                    warn!("identity check failed: {err}");
                }
                None
            }
        };
        self.store(profile.clone());
        profile
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ApiError> {
        let user: UserProfile = self
            .api
            .post(
                "/api/accounts/login/",
                &json!({ "username": username, "password": password }),
            )
            .await?;
        info!(username = %user.username, "session established");
        self.store(Some(user.clone()));
        Ok(user)
    }

    /// Requests invalidation, then clears the identity unconditionally.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.post::<Value, _>("/api/accounts/logout/", &json!({})).await;
        self.store(None);
        result.map(|_| ())
    }

    /// Registration never establishes a session; the account stays pending
    /// until the emailed verification link is used.
    pub async fn register<B: Serialize>(&self, payload: &B) -> Result<RegisterAck, ApiError> {
        self.api.post("/api/accounts/register/", payload).await
    }

    fn store(&self, value: Option<UserProfile>) {
        if let Ok(mut guard) = self.current.write() {
            *guard = value;
        }
    }
}
