#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;
mod db;
mod models;
mod services;
mod utils;

use anyhow::anyhow;
use tauri::{Emitter, Manager};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::services::api::ApiClient;
use crate::services::locale::system_language;
use crate::services::state::AppState;

const DEFAULT_API_URL: &str = "http://localhost:8000";

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tauri::Builder::default()
        .setup(|app| {
            let app_data_dir = app
                .path()
                .app_data_dir()
                .map_err(|e| anyhow!("App data dir: {}", e))?;
            std::fs::create_dir_all(&app_data_dir)?;

            let db_path = app_data_dir.join("lostoys.sqlite");
            let db = db::Database::new(db_path)?;

            let base_url =
                std::env::var("LOSTOYS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
            let api = ApiClient::new(&base_url)?;
            info!(%base_url, "api client ready");

            let state = AppState::new(db, api, system_language());

            // Session context initializes on mount: one identity check, then
            // the webview learns the result through the session event.
            let session = state.session.clone();
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let user = session.refresh().await;
                if let Err(err) = handle.emit(commands::account::SESSION_EVENT, user) {
                    warn!("session event failed: {err}");
                }
            });

            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::account::get_current_user,
            commands::account::login,
            commands::account::logout,
            commands::account::register,
            commands::account::refresh_session,
            commands::account::verify_email,
            commands::account::resend_verification,
            commands::account::update_alert_preferences,
            commands::dashboard::get_dashboard,
            commands::dashboard::get_upcoming_expirations,
            commands::vehicles::get_vehicle,
            commands::vehicles::get_vehicle_detail,
            commands::vehicles::create_vehicle,
            commands::vehicles::update_vehicle,
            commands::vehicles::create_credit,
            commands::vehicles::create_maintenance,
            commands::documents::upload_document,
            commands::documents::delete_document,
            commands::documents::get_document_form_policy,
            commands::documents::pick_document_file,
            commands::documents::open_document_file,
            commands::soat::get_soat_snapshot,
            commands::soat::refresh_soat_snapshot,
            commands::notifications::list_notifications,
            commands::settings::get_locale,
            commands::settings::set_locale,
            commands::settings::translate,
            commands::settings::get_dictionary,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
