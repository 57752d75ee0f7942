pub mod account;
pub mod dashboard;
pub mod documents;
pub mod notifications;
pub mod settings;
pub mod soat;
pub mod vehicles;

use crate::models::UserProfile;
use crate::services::api::ApiError;
use crate::services::state::AppState;

/// Controllers only issue fetches when an identity is present; otherwise
/// they surface the page's sign-in notice.
pub(crate) fn require_session(state: &AppState, notice_key: &str) -> Result<UserProfile, String> {
    state
        .session
        .current_user()
        .ok_or_else(|| state.locale.resolve(notice_key))
}

/// The most specific backend message, or the page's own fallback string.
pub(crate) fn surface_error(state: &AppState, err: &ApiError, fallback_key: &str) -> String {
    err.detail()
        .unwrap_or_else(|| state.locale.resolve(fallback_key))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::db::Database;
    use crate::services::api::ApiClient;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// State wired to a mock backend, with an isolated settings database.
    pub(crate) fn state_for(server_uri: &str) -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("lostoys.sqlite")).unwrap();
        let api = ApiClient::new(server_uri).unwrap();
        (AppState::new(db, api, Some("es-CO".to_string())), dir)
    }

    /// Mounts the identity endpoint and refreshes the session against it.
    pub(crate) async fn sign_in(state: &AppState, server: &MockServer, country: &str) {
        Mock::given(method("GET"))
            .and(path("/api/accounts/me/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "username": "demo",
                "email": "demo@example.com",
                "country": country,
                "is_verified": true
            })))
            .mount(server)
            .await;
        assert!(state.session.refresh().await.is_some());
    }

    pub(crate) async fn mount_csrf(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/csrf/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "csrftoken=tok; Path=/")
                    .set_body_json(json!({ "csrfToken": "tok" })),
            )
            .mount(server)
            .await;
    }
}
