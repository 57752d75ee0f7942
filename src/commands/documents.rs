use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tauri::State;

use crate::models::{Document, DocumentFormPolicy, DocumentType};
use crate::services::policy;
use crate::services::state::AppState;

const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct ExtraDetails {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadDocumentPayload {
    pub car_id: i64,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub extra: ExtraDetails,
    #[serde(default)]
    pub file_path: Option<String>,
}

struct PreparedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

/// Size and content-type checks happen before anything touches the wire.
async fn prepare_file(state: &AppState, path: &Path) -> Result<PreparedFile, String> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| state.locale.resolve("documentForm.errors.fileMissing"))?;
    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(state.locale.resolve("documentForm.errors.fileTooLarge"));
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let allowed = mime.type_() == mime_guess::mime::IMAGE || mime.essence_str() == "application/pdf";
    if !allowed {
        return Err(state.locale.resolve("documentForm.errors.fileType"));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| state.locale.resolve("documentForm.errors.fileMissing"))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document")
        .to_string();

    Ok(PreparedFile {
        name,
        mime: mime.essence_str().to_string(),
        bytes,
    })
}

fn manual_field_labels(state: &AppState, extra: &ExtraDetails) -> Vec<(String, String)> {
    [
        ("documentForm.manualFields.owner", extra.owner.as_str()),
        (
            "documentForm.manualFields.documentNumber",
            extra.document_number.as_str(),
        ),
        ("documentForm.manualFields.vin", extra.vin.as_str()),
        ("documentForm.manualFields.service", extra.service.as_str()),
        ("documentForm.manualFields.extraNotes", extra.details.as_str()),
    ]
    .into_iter()
    .map(|(key, value)| (state.locale.resolve(key), value.to_string()))
    .collect()
}

/// Non-empty extra fields become `Label: value` lines appended after the
/// user-entered notes.
pub(crate) fn fold_notes(notes: &str, labeled: &[(String, String)]) -> String {
    let extras = labeled
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{label}: {}", value.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    [notes.to_string(), extras]
        .into_iter()
        .filter(|segment| !segment.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) async fn submit_document(
    state: &AppState,
    payload: UploadDocumentPayload,
) -> Result<Document, String> {
    let file_path = payload
        .file_path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());

    if policy::requires_file(payload.doc_type) && file_path.is_none() {
        return Err(state.locale.resolve("documentForm.errors.fileRequired"));
    }

    let file = match file_path {
        Some(path) => Some(prepare_file(state, Path::new(path)).await?),
        None => None,
    };

    let labeled = manual_field_labels(state, &payload.extra);
    let notes = fold_notes(&payload.notes, &labeled);
    let amount = if payload.amount.trim().is_empty() {
        "0".to_string()
    } else {
        payload.amount.clone()
    };

    let mut form = Form::new()
        .text("car", payload.car_id.to_string())
        .text("type", payload.doc_type.as_str().to_string())
        .text("provider", payload.provider.clone())
        .text("issue_date", payload.issue_date.clone())
        .text("expiry_date", payload.expiry_date.clone())
        .text("amount", amount)
        .text("notes", notes);

    if let Some(file) = file {
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|err| err.to_string())?;
        form = form.part("document_file", part);
    }

    state
        .api
        .post_form("/api/documents/", form)
        .await
        .map_err(|err| err.detail().unwrap_or_else(|| err.to_string()))
}

#[tauri::command]
pub async fn upload_document(
    payload: UploadDocumentPayload,
    state: State<'_, AppState>,
) -> Result<Document, String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    submit_document(&state, payload).await
}

#[tauri::command]
pub async fn delete_document(document_id: i64, state: State<'_, AppState>) -> Result<(), String> {
    super::require_session(&state, "carDetail.signInNotice")?;
    state
        .api
        .delete(&format!("/api/documents/{document_id}/"))
        .await
        .map_err(|err| super::surface_error(&state, &err, "errors.documentDelete"))
}

#[tauri::command]
pub async fn get_document_form_policy(
    state: State<'_, AppState>,
) -> Result<DocumentFormPolicy, String> {
    let user = super::require_session(&state, "carDetail.signInNotice")?;
    Ok(policy::form_policy(&user.country))
}

#[tauri::command]
pub async fn pick_document_file() -> Result<Option<String>, String> {
    let selection = rfd::FileDialog::new()
        .add_filter("Documents", &["jpg", "jpeg", "png", "pdf"])
        .pick_file()
        .map(|path| path.to_string_lossy().to_string());
    Ok(selection)
}

#[tauri::command]
pub async fn open_document_file(value: String, state: State<'_, AppState>) -> Result<(), String> {
    let resolved = crate::utils::resolve_media_url(state.api.base_url(), Some(&value))
        .ok_or_else(|| state.locale.resolve("documentForm.errors.fileMissing"))?;
    open::that(resolved).map_err(|err| err.to_string())
}
