use serde_json::json;
use tauri::State;

use crate::models::{SoatSnapshot, SoatView, StatusColor};
use crate::services::api::ApiClient;
use crate::services::state::AppState;

/// The registry reports status as free text; classify it the same way the
/// badge colors do. "Vigente" variants are green, expired variants red,
/// anything else stays cautious.
pub(crate) fn external_status_color(status: Option<&str>) -> StatusColor {
    let status = status.unwrap_or("").to_lowercase();
    if status.contains("vigen") {
        StatusColor::Green
    } else if status.contains("expir") || status.contains("venc") {
        StatusColor::Red
    } else {
        StatusColor::Yellow
    }
}

fn into_view(snapshot: SoatSnapshot) -> SoatView {
    let indicator = external_status_color(
        snapshot
            .external
            .as_ref()
            .and_then(|external| external.status.as_deref()),
    );
    SoatView { snapshot, indicator }
}

/// A missing SOAT document answers 404; that is an empty state, not an
/// error. Every other failure surfaces a message and drops the snapshot.
pub(crate) async fn load_snapshot(state: &AppState, car_id: i64) -> Result<Option<SoatView>, String> {
    state
        .api
        .get_optional::<SoatSnapshot>(&format!("/api/cars/{car_id}/soat/"))
        .await
        .map(|snapshot| snapshot.map(into_view))
        .map_err(|err| super::surface_error(state, &err, "errors.loadSoat"))
}

pub(crate) async fn refresh_snapshot(
    state: &AppState,
    car_id: i64,
) -> Result<Option<SoatView>, String> {
    let result = state
        .api
        .post::<SoatSnapshot, _>(&format!("/api/cars/{car_id}/soat/"), &json!({}))
        .await;
    ApiClient::absent_on_404(result)
        .map(|snapshot| snapshot.map(into_view))
        .map_err(|err| super::surface_error(state, &err, "errors.loadSoat"))
}

#[tauri::command]
pub async fn get_soat_snapshot(
    car_id: i64,
    state: State<'_, AppState>,
) -> Result<Option<SoatView>, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    load_snapshot(&state, car_id).await
}

#[tauri::command]
pub async fn refresh_soat_snapshot(
    car_id: i64,
    state: State<'_, AppState>,
) -> Result<Option<SoatView>, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    refresh_snapshot(&state, car_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot_body(status: &str) -> serde_json::Value {
        json!({
            "document": {
                "id": 12,
                "car": 3,
                "type": "SOAT",
                "issue_date": "2026-01-15",
                "expiry_date": "2027-01-14",
                "amount": "780000.00",
                "provider": "Sura",
                "ai_status": "completed",
                "status_indicator": "green"
            },
            "external": {
                "status": status,
                "source": "Registro oficial",
                "fetched_at": "2026-08-01T09:00:00Z",
                "policy_number": "POL-991",
                "insurer": "Sura",
                "responsibilities": ["Daños a terceros"]
            },
            "success": true
        })
    }

    #[test]
    fn external_status_classification() {
        assert_eq!(external_status_color(Some("Vigente")), StatusColor::Green);
        assert_eq!(external_status_color(Some("VENCIDO")), StatusColor::Red);
        assert_eq!(external_status_color(Some("Expirada")), StatusColor::Red);
        assert_eq!(external_status_color(Some("desconocido")), StatusColor::Yellow);
        assert_eq!(external_status_color(None), StatusColor::Yellow);
    }

    #[tokio::test]
    async fn missing_policy_is_an_empty_state() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        Mock::given(method("GET"))
            .and(path("/api/cars/3/soat/"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "document": null, "external": null })),
            )
            .mount(&server)
            .await;

        let view = load_snapshot(&state, 3).await.unwrap();
        assert!(view.is_none());
    }

    #[tokio::test]
    async fn lookup_failures_surface_a_message() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        Mock::given(method("GET"))
            .and(path("/api/cars/3/soat/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "registro caído" })))
            .mount(&server)
            .await;

        let err = load_snapshot(&state, 3).await.unwrap_err();
        assert_eq!(err, "registro caído");
    }

    #[tokio::test]
    async fn snapshot_deserializes_and_classifies() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        Mock::given(method("GET"))
            .and(path("/api/cars/3/soat/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body("Vigente")))
            .mount(&server)
            .await;

        let view = load_snapshot(&state, 3).await.unwrap().unwrap();
        assert_eq!(view.indicator, StatusColor::Green);
        assert_eq!(view.snapshot.document.unwrap().id, 12);
        let external = view.snapshot.external.unwrap();
        assert_eq!(external.status.as_deref(), Some("Vigente"));
        assert_eq!(external.responsibilities.len(), 1);
    }

    #[tokio::test]
    async fn refresh_treats_missing_policy_as_absent_too() {
        let server = MockServer::start().await;
        let (state, _dir) = crate::commands::testing::state_for(&server.uri());
        crate::commands::testing::mount_csrf(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/cars/3/soat/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                json!({ "success": false, "message": "No hay documentos SOAT asociados." }),
            ))
            .mount(&server)
            .await;

        let view = refresh_snapshot(&state, 3).await.unwrap();
        assert!(view.is_none());
    }
}
