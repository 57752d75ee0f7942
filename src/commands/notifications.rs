use tauri::State;

use crate::models::{Notification, ResourceList};
use crate::services::state::AppState;

#[tauri::command]
pub async fn list_notifications(state: State<'_, AppState>) -> Result<Vec<Notification>, String> {
    super::require_session(&state, "notificationsPage.signInTitle")?;
    state
        .api
        .get::<ResourceList<Notification>>("/api/notifications/")
        .await
        .map(ResourceList::into_vec)
        .map_err(|err| super::surface_error(&state, &err, "notificationsPage.error"))
}
