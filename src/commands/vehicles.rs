use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tauri::State;

use crate::models::{
    Document, DocumentBrief, DocumentWarning, Notification, ResourceList, TimelineEvent, Vehicle,
    VehicleCard, VehicleDetailView, VehicleStatus,
};
use crate::services::api::ApiError;
use crate::services::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVehiclePayload {
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    #[serde(default)]
    pub estimated_value: f64,
    #[serde(default = "default_vehicle_status")]
    pub status: VehicleStatus,
}

fn default_vehicle_status() -> VehicleStatus {
    VehicleStatus::Active
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateVehiclePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCreditPayload {
    pub car: i64,
    pub bank: String,
    pub total_amount: f64,
    pub monthly_payment: f64,
    pub start_date: String,
    pub end_date: String,
    pub payment_day: u32,
    #[serde(default)]
    pub remaining_balance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMaintenancePayload {
    pub car: i64,
    pub date: String,
    pub concept: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub workshop: String,
    #[serde(default)]
    pub notes: String,
}

pub(crate) async fn fetch_vehicles(state: &AppState) -> Result<Vec<Vehicle>, ApiError> {
    state
        .api
        .get::<ResourceList<Vehicle>>("/api/cars/")
        .await
        .map(ResourceList::into_vec)
}

pub(crate) fn document_brief(document: &Document) -> DocumentBrief {
    DocumentBrief {
        id: document.id,
        doc_type: document.doc_type,
        type_display: document.display_type().to_string(),
        expiry_date: document.expiry_date,
        status_indicator: document.status_indicator,
    }
}

/// The vehicle's "next document" is the one expiring soonest. Documents
/// without an expiry sort to the far end.
pub(crate) fn next_document(documents: &[Document]) -> Option<DocumentBrief> {
    documents
        .iter()
        .min_by_key(|document| document.expiry_date.unwrap_or(NaiveDate::MAX))
        .map(document_brief)
}

pub(crate) fn vehicle_card(vehicle: &Vehicle) -> VehicleCard {
    VehicleCard {
        id: vehicle.id,
        brand: vehicle.brand.clone(),
        model: vehicle.model.clone(),
        plate: vehicle.plate.clone(),
        year: vehicle.year,
        estimated_value: vehicle.estimated_value.clone(),
        status: vehicle.status,
        health_status: vehicle.health_status,
        document_count: vehicle.documents.len(),
        next_document: next_document(&vehicle.documents),
    }
}

/// Documents and maintenance records merged into one feed, newest first.
pub(crate) fn build_timeline(vehicle: &Vehicle, expires_prefix: &str) -> Vec<TimelineEvent> {
    let document_events = vehicle.documents.iter().filter_map(|document| {
        let date = document.issue_date?;
        let detail = match document.expiry_date {
            Some(expiry) => format!("{expires_prefix} {expiry}"),
            None => String::new(),
        };
        Some(TimelineEvent {
            id: format!("doc-{}", document.id),
            label: document.display_type().to_string(),
            date,
            detail,
        })
    });

    let maintenance_events = vehicle.maintenances.iter().map(|record| TimelineEvent {
        id: format!("mt-{}", record.id),
        label: record.concept.clone(),
        date: record.date,
        detail: if record.notes.is_empty() {
            record.workshop.clone()
        } else {
            record.notes.clone()
        },
    });

    let mut events: Vec<TimelineEvent> = document_events.chain(maintenance_events).collect();
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}

/// Keeps notifications whose reference points at the vehicle itself or at
/// one of its documents.
pub(crate) fn related_notifications(
    vehicle: &Vehicle,
    notifications: Vec<Notification>,
) -> Vec<Notification> {
    let mut related: HashSet<i64> = vehicle.documents.iter().map(|doc| doc.id).collect();
    related.insert(vehicle.id);
    notifications
        .into_iter()
        .filter(|item| {
            item.reference_object_id
                .map(|id| related.contains(&id))
                .unwrap_or(false)
        })
        .collect()
}

fn document_warnings(vehicle: &Vehicle) -> Vec<DocumentWarning> {
    vehicle
        .documents
        .iter()
        .filter(|document| document.ai_status == crate::models::AiStatus::Warning)
        .map(|document| DocumentWarning {
            id: document.id,
            type_display: document.display_type().to_string(),
            ai_feedback: document.ai_feedback.clone(),
        })
        .collect()
}

pub(crate) async fn load_vehicle_detail(
    state: &AppState,
    car_id: i64,
) -> Result<VehicleDetailView, String> {
    let (vehicle, notifications) = tokio::try_join!(
        state.api.get::<Vehicle>(&format!("/api/cars/{car_id}/")),
        state.api.get::<ResourceList<Notification>>("/api/notifications/"),
    )
    .map_err(|err| super::surface_error(state, &err, "errors.loadCar"))?;

    let expires_prefix = state.locale.resolve("carDetail.timeline.expiresPrefix");
    let next_document = next_document(&vehicle.documents);
    let timeline = build_timeline(&vehicle, &expires_prefix);
    let notifications = related_notifications(&vehicle, notifications.into_vec());
    let warnings = document_warnings(&vehicle);

    Ok(VehicleDetailView {
        vehicle,
        next_document,
        timeline,
        notifications,
        warnings,
    })
}

#[tauri::command]
pub async fn get_vehicle(car_id: i64, state: State<'_, AppState>) -> Result<Vehicle, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    state
        .api
        .get(&format!("/api/cars/{car_id}/"))
        .await
        .map_err(|err| super::surface_error(&state, &err, "errors.loadCar"))
}

#[tauri::command]
pub async fn get_vehicle_detail(
    car_id: i64,
    state: State<'_, AppState>,
) -> Result<VehicleDetailView, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    load_vehicle_detail(&state, car_id).await
}

#[tauri::command]
pub async fn create_vehicle(
    payload: CreateVehiclePayload,
    state: State<'_, AppState>,
) -> Result<Vehicle, String> {
    super::require_session(&state, "newCar.signInNotice")?;
    state
        .api
        .post("/api/cars/", &payload)
        .await
        .map_err(|err| super::surface_error(&state, &err, "newCar.feedback.error"))
}

#[tauri::command]
pub async fn update_vehicle(
    car_id: i64,
    payload: UpdateVehiclePayload,
    state: State<'_, AppState>,
) -> Result<Vehicle, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    state
        .api
        .patch(&format!("/api/cars/{car_id}/"), &payload)
        .await
        .map_err(|err| super::surface_error(&state, &err, "errors.loadCar"))
}

#[tauri::command]
pub async fn create_credit(
    payload: CreateCreditPayload,
    state: State<'_, AppState>,
) -> Result<crate::models::Credit, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    state
        .api
        .post("/api/credits/", &payload)
        .await
        .map_err(|err| super::surface_error(&state, &err, "errors.loadCar"))
}

#[tauri::command]
pub async fn create_maintenance(
    payload: CreateMaintenancePayload,
    state: State<'_, AppState>,
) -> Result<crate::models::Maintenance, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    state
        .api
        .post("/api/maintenances/", &payload)
        .await
        .map_err(|err| super::surface_error(&state, &err, "errors.loadCar"))
}
