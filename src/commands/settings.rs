use serde_json::Value;
use tauri::{AppHandle, Emitter, State};

use crate::services::locale::Locale;
use crate::services::state::AppState;

pub(crate) const LOCALE_EVENT: &str = "locale-changed";

#[tauri::command]
pub async fn get_locale(state: State<'_, AppState>) -> Result<String, String> {
    Ok(state.locale.active().as_str().to_string())
}

#[tauri::command]
pub async fn set_locale(
    locale: String,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<String, String> {
    let parsed = Locale::from_tag(&locale).ok_or_else(|| format!("Unknown locale: {locale}"))?;
    state.locale.set_active(parsed).map_err(|err| err.to_string())?;
    let _ = app.emit(LOCALE_EVENT, parsed.as_str());
    Ok(parsed.as_str().to_string())
}

#[tauri::command]
pub async fn translate(key: String, state: State<'_, AppState>) -> Result<String, String> {
    Ok(state.locale.resolve(&key))
}

/// The webview renders from the full active dictionary; switching locale is
/// a synchronous state change with no network effect.
#[tauri::command]
pub async fn get_dictionary(state: State<'_, AppState>) -> Result<Value, String> {
    Ok(state.locale.dictionary().clone())
}
