use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::services::api::ApiClient;
use crate::services::locale::LocaleService;
use crate::services::session::SessionService;

/// The two global contexts (session, locale) plus the shared API client,
/// owned here and injected into every command.
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionService>,
    pub locale: Arc<LocaleService>,
}

impl AppState {
    pub fn new(db: Database, api: ApiClient, runtime_language: Option<String>) -> Self {
        let db = Arc::new(Mutex::new(db));
        let api = Arc::new(api);
        let session = Arc::new(SessionService::new(api.clone()));
        let locale = Arc::new(LocaleService::initialize(db, runtime_language));
        AppState {
            api,
            session,
            locale,
        }
    }
}
