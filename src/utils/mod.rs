use chrono::{Local, NaiveDate};
use url::Url;

/// Documents inside this window count as "upcoming" on the expirations page.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;
/// Stand-in for "no expiry on record", matching the backend.
pub const NO_EXPIRY_DAYS: i64 = 9999;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_until(expiry: Option<NaiveDate>, reference: NaiveDate) -> i64 {
    match expiry {
        Some(date) => (date - reference).num_days(),
        None => NO_EXPIRY_DAYS,
    }
}

/// Media fields come back either absolute or as a backend-relative path.
pub fn resolve_media_url(base: &Url, value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    Some(format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        value.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_until_counts_whole_days() {
        let reference = date(2026, 8, 1);
        assert_eq!(days_until(Some(date(2026, 8, 11)), reference), 10);
        assert_eq!(days_until(Some(date(2026, 7, 31)), reference), -1);
        assert_eq!(days_until(Some(reference), reference), 0);
        assert_eq!(days_until(None, reference), NO_EXPIRY_DAYS);
    }

    #[test]
    fn media_url_resolution() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            resolve_media_url(&base, Some("/media/cars/doc.pdf")).as_deref(),
            Some("http://localhost:8000/media/cars/doc.pdf")
        );
        assert_eq!(
            resolve_media_url(&base, Some("https://cdn.example.com/doc.pdf")).as_deref(),
            Some("https://cdn.example.com/doc.pdf")
        );
        assert_eq!(resolve_media_url(&base, Some("")), None);
        assert_eq!(resolve_media_url(&base, None), None);
    }
}
