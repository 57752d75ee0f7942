use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

use crate::db::Database;

pub const LOCALE_SETTING_KEY: &str = "locale";

static ENGLISH: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/locales/en.json"
    )))
    .expect("Invalid en dictionary")
});

static SPANISH: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/locales/es.json"
    )))
    .expect("Invalid es dictionary")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Es,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Locale> {
        match tag.trim().to_lowercase().as_str() {
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            _ => None,
        }
    }

    /// Language detection from a runtime tag such as `es-CO` or `en_US.UTF-8`.
    pub fn detect_from(tag: &str) -> Locale {
        if tag.trim().to_lowercase().starts_with("es") {
            Locale::Es
        } else {
            Locale::En
        }
    }

    fn dictionary(&self) -> &'static Value {
        match self {
            Locale::En => &ENGLISH,
            Locale::Es => &SPANISH,
        }
    }
}

pub fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|value| !value.is_empty()))
}

/// Locale context: one active locale, persisted in the settings slot,
/// resolving dot-delimited keys with an English fallback.
pub struct LocaleService {
    db: Arc<Mutex<Database>>,
    active: RwLock<Locale>,
}

impl LocaleService {
    pub fn initialize(db: Arc<Mutex<Database>>, runtime_language: Option<String>) -> Self {
        let stored = db
            .lock()
            .ok()
            .and_then(|db| db.get_setting(LOCALE_SETTING_KEY).ok().flatten());

        let active = match stored.as_deref().and_then(Locale::from_tag) {
            Some(locale) => locale,
            None => {
                let detected = runtime_language
                    .as_deref()
                    .map(Locale::detect_from)
                    .unwrap_or(Locale::Es);
                if let Ok(db) = db.lock() {
                    let _ = db.set_setting(LOCALE_SETTING_KEY, detected.as_str());
                }
                detected
            }
        };

        info!(locale = active.as_str(), "locale context ready");
        LocaleService {
            db,
            active: RwLock::new(active),
        }
    }

    pub fn active(&self) -> Locale {
        self.active.read().map(|guard| *guard).unwrap_or(Locale::Es)
    }

    /// Pure state transition plus a synchronous persistence write.
    pub fn set_active(&self, locale: Locale) -> Result<()> {
        {
            let mut guard = self.active.write().map_err(|_| anyhow!("Locale lock"))?;
            *guard = locale;
        }
        let db = self.db.lock().map_err(|_| anyhow!("DB lock"))?;
        db.set_setting(LOCALE_SETTING_KEY, locale.as_str())?;
        Ok(())
    }

    pub fn resolve(&self, key: &str) -> String {
        resolve_key(self.active().dictionary(), &ENGLISH, key)
    }

    pub fn dictionary(&self) -> &'static Value {
        self.active().dictionary()
    }
}

pub(crate) fn resolve_key(active: &Value, english: &Value, key: &str) -> String {
    lookup(active, key)
        .or_else(|| lookup(english, key))
        .unwrap_or_else(|| key.to_string())
}

fn lookup(dictionary: &Value, key: &str) -> Option<String> {
    let mut current = dictionary;
    for segment in key.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    current.as_str().map(str::to_string)
}
