use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tauri::{AppHandle, Emitter, State};
use tracing::warn;

use crate::models::{AlertPreferences, RegisterAck, UserProfile, VerifyOutcome, VerifyStatus};
use crate::services::state::AppState;

pub(crate) const SESSION_EVENT: &str = "session-changed";

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "co".to_string()
}

#[tauri::command]
pub async fn get_current_user(state: State<'_, AppState>) -> Result<Option<UserProfile>, String> {
    Ok(state.session.current_user())
}

#[tauri::command]
pub async fn login(
    payload: LoginPayload,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<UserProfile, String> {
    let user = state
        .session
        .login(&payload.username, &payload.password)
        .await
        .map_err(|err| super::surface_error(&state, &err, "auth.login.error"))?;
    let _ = app.emit(SESSION_EVENT, Some(user.clone()));
    Ok(user)
}

#[tauri::command]
pub async fn logout(state: State<'_, AppState>, app: AppHandle) -> Result<(), String> {
    if let Err(err) = state.session.logout().await {
        warn!("logout request failed: {err}");
    }
    let _ = app.emit(SESSION_EVENT, Option::<UserProfile>::None);
    Ok(())
}

#[tauri::command]
pub async fn register(
    payload: RegisterPayload,
    state: State<'_, AppState>,
) -> Result<RegisterAck, String> {
    state
        .session
        .register(&payload)
        .await
        .map_err(|err| super::surface_error(&state, &err, "auth.register.error"))
}

#[tauri::command]
pub async fn refresh_session(
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<Option<UserProfile>, String> {
    let user = state.session.refresh().await;
    let _ = app.emit(SESSION_EVENT, user.clone());
    Ok(user)
}

/// The backend only distinguishes invalid and expired tokens through its
/// error text, so the outcome is classified from the message.
pub(crate) fn classify_verify_failure(message: &str) -> VerifyStatus {
    let lowered = message.to_lowercase();
    if lowered.contains("inválido") || lowered.contains("invalido") || lowered.contains("invalid") {
        VerifyStatus::Invalid
    } else if lowered.contains("expir") {
        VerifyStatus::Expired
    } else {
        VerifyStatus::Error
    }
}

pub(crate) async fn run_verification(state: &AppState, token: &str) -> VerifyOutcome {
    match state
        .api
        .get::<Value>(&format!("/api/accounts/verify/{token}/"))
        .await
    {
        Ok(payload) => VerifyOutcome {
            status: VerifyStatus::Success,
            message: payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Cuenta verificada correctamente.")
                .to_string(),
        },
        Err(err) => {
            let message = err
                .detail()
                .unwrap_or_else(|| "No pudimos verificar el enlace.".to_string());
            VerifyOutcome {
                status: classify_verify_failure(&message),
                message,
            }
        }
    }
}

#[tauri::command]
pub async fn verify_email(token: String, state: State<'_, AppState>) -> Result<VerifyOutcome, String> {
    Ok(run_verification(&state, &token).await)
}

#[tauri::command]
pub async fn resend_verification(state: State<'_, AppState>) -> Result<String, String> {
    match state
        .api
        .post::<Value, _>("/api/accounts/email/verify/resend/", &json!({}))
        .await
    {
        Ok(payload) => Ok(payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Correo reenviado")
            .to_string()),
        Err(err) => Err(err
            .detail()
            .unwrap_or_else(|| "No se pudo reenviar el correo".to_string())),
    }
}

/// Saves the three alert-channel flags, then re-runs the identity check so
/// the held profile reflects the change.
#[tauri::command]
pub async fn update_alert_preferences(
    preferences: AlertPreferences,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<Option<UserProfile>, String> {
    state
        .api
        .patch::<UserProfile, _>("/api/accounts/me/", &preferences)
        .await
        .map_err(|err| super::surface_error(&state, &err, "settings.feedback.error"))?;

    let user = state.session.refresh().await;
    let _ = app.emit(SESSION_EVENT, user.clone());
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn verify_failure_classification() {
        assert_eq!(classify_verify_failure("Token inválido."), VerifyStatus::Invalid);
        assert_eq!(
            classify_verify_failure("El enlace ha expirado. Solicita uno nuevo."),
            VerifyStatus::Expired
        );
        assert_eq!(classify_verify_failure("algo salió mal"), VerifyStatus::Error);
    }

    #[tokio::test]
    async fn verification_success_carries_server_message() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        Mock::given(method("GET"))
            .and(path("/api/accounts/verify/abc/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "success": true, "message": "Cuenta verificada exitosamente." }),
            ))
            .mount(&server)
            .await;

        let outcome = run_verification(&state, "abc").await;
        assert_eq!(outcome.status, VerifyStatus::Success);
        assert_eq!(outcome.message, "Cuenta verificada exitosamente.");
    }

    #[tokio::test]
    async fn expired_token_is_classified_from_the_payload() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        Mock::given(method("GET"))
            .and(path("/api/accounts/verify/old/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({ "success": false, "error": "El enlace ha expirado. Solicita uno nuevo." }),
            ))
            .mount(&server)
            .await;

        let outcome = run_verification(&state, "old").await;
        assert_eq!(outcome.status, VerifyStatus::Expired);
    }

    #[tokio::test]
    async fn invalid_token_is_classified_from_the_payload() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        Mock::given(method("GET"))
            .and(path("/api/accounts/verify/bad/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "success": false, "error": "Token inválido." })),
            )
            .mount(&server)
            .await;

        let outcome = run_verification(&state, "bad").await;
        assert_eq!(outcome.status, VerifyStatus::Invalid);
        assert_eq!(outcome.message, "Token inválido.");
    }
}
