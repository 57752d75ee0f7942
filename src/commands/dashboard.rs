use chrono::NaiveDate;
use tauri::State;

use crate::models::{
    DashboardView, HealthTally, StatusBreakdown, StatusColor, UpcomingDocument, UpcomingView,
    Vehicle,
};
use crate::services::state::AppState;
use crate::utils::{days_until, today, UPCOMING_WINDOW_DAYS};

use super::vehicles::{fetch_vehicles, vehicle_card};

pub(crate) fn tally_health(vehicles: &[Vehicle]) -> HealthTally {
    let mut tally = HealthTally {
        total: vehicles.len(),
        ..HealthTally::default()
    };
    for vehicle in vehicles {
        match vehicle.health_status {
            StatusColor::Green => tally.green += 1,
            StatusColor::Yellow => tally.yellow += 1,
            StatusColor::Red => tally.red += 1,
        }
    }
    tally
}

/// Flattens every vehicle's documents, keeps what expires inside the
/// 30-day window (overdue included), sorted by expiry ascending. Ties keep
/// their input order.
pub(crate) fn build_upcoming(vehicles: &[Vehicle], reference: NaiveDate) -> UpcomingView {
    let mut items: Vec<UpcomingDocument> = vehicles
        .iter()
        .flat_map(|vehicle| {
            vehicle.documents.iter().filter_map(move |document| {
                let expiry = document.expiry_date?;
                let days_left = days_until(Some(expiry), reference);
                if days_left > UPCOMING_WINDOW_DAYS {
                    return None;
                }
                Some(UpcomingDocument {
                    document_id: document.id,
                    car_id: vehicle.id,
                    car_label: vehicle.label(),
                    type_display: document.display_type().to_string(),
                    expiry_date: expiry,
                    days_left,
                    status_indicator: document.status_indicator,
                })
            })
        })
        .collect();
    items.sort_by_key(|item| item.expiry_date);

    let mut breakdown = StatusBreakdown::default();
    for item in &items {
        match item.status_indicator {
            StatusColor::Red => breakdown.red += 1,
            StatusColor::Yellow => breakdown.yellow += 1,
            StatusColor::Green => breakdown.green += 1,
        }
    }

    UpcomingView { items, breakdown }
}

#[tauri::command]
pub async fn get_dashboard(state: State<'_, AppState>) -> Result<DashboardView, String> {
    super::require_session(&state, "dashboard.guestTitle")?;
    let vehicles = fetch_vehicles(&state)
        .await
        .map_err(|err| super::surface_error(&state, &err, "dashboard.error"))?;

    Ok(DashboardView {
        stats: tally_health(&vehicles),
        vehicles: vehicles.iter().map(vehicle_card).collect(),
    })
}

#[tauri::command]
pub async fn get_upcoming_expirations(state: State<'_, AppState>) -> Result<UpcomingView, String> {
    super::require_session(&state, "upcoming.signInNotice")?;
    let vehicles = fetch_vehicles(&state)
        .await
        .map_err(|err| super::surface_error(&state, &err, "dashboard.error"))?;
    Ok(build_upcoming(&vehicles, today()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle(id: i64, health: &str, expiries: &[&str]) -> Vehicle {
        let documents: Vec<serde_json::Value> = expiries
            .iter()
            .enumerate()
            .map(|(index, expiry)| {
                json!({
                    "id": id * 100 + index as i64,
                    "car": id,
                    "type": "SOAT",
                    "issue_date": null,
                    "expiry_date": expiry,
                    "amount": "0.00",
                    "ai_status": "pending",
                    "status_indicator": "yellow"
                })
            })
            .collect();
        serde_json::from_value(json!({
            "id": id,
            "brand": "Renault",
            "model": "Logan",
            "plate": format!("XYZ{id:03}"),
            "year": 2020,
            "status": "active",
            "health_status": health,
            "documents": documents
        }))
        .unwrap()
    }

    #[test]
    fn tally_counts_by_health_status() {
        let fleet = vec![
            vehicle(1, "green", &[]),
            vehicle(2, "yellow", &[]),
            vehicle(3, "green", &[]),
            vehicle(4, "red", &[]),
        ];
        let stats = tally_health(&fleet);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.green, 2);
        assert_eq!(stats.yellow, 1);
        assert_eq!(stats.red, 1);
    }

    #[test]
    fn upcoming_sorted_ascending_by_expiry() {
        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fleet = vec![vehicle(1, "yellow", &["2026-08-06", "2026-08-03", "2026-08-21"])];

        let view = build_upcoming(&fleet, reference);
        let expiries: Vec<String> = view
            .items
            .iter()
            .map(|item| item.expiry_date.to_string())
            .collect();
        assert_eq!(expiries, vec!["2026-08-03", "2026-08-06", "2026-08-21"]);
    }

    #[test]
    fn window_includes_overdue_and_excludes_distant() {
        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fleet = vec![vehicle(
            1,
            "red",
            &["2026-08-11", "2026-07-31", "2026-10-01"],
        )];

        let view = build_upcoming(&fleet, reference);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].days_left, -1);
        assert_eq!(view.items[1].days_left, 10);
    }

    #[test]
    fn boundary_day_thirty_is_included() {
        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fleet = vec![vehicle(1, "yellow", &["2026-08-31", "2026-09-01"])];

        let view = build_upcoming(&fleet, reference);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].days_left, 30);
    }

    #[test]
    fn breakdown_counts_retained_rows() {
        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let fleet = vec![vehicle(1, "yellow", &["2026-08-03", "2026-08-05"])];

        let view = build_upcoming(&fleet, reference);
        assert_eq!(view.breakdown.yellow, 2);
        assert_eq!(view.breakdown.green, 0);
        assert_eq!(view.breakdown.red, 0);
    }

    #[test]
    fn documents_without_expiry_never_surface() {
        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut car = vehicle(1, "green", &[]);
        car.documents = vec![serde_json::from_value(json!({
            "id": 7,
            "car": 1,
            "type": "Registration",
            "issue_date": null,
            "expiry_date": null,
            "amount": "0.00",
            "ai_status": "pending",
            "status_indicator": "green"
        }))
        .unwrap()];

        let view = build_upcoming(&[car], reference);
        assert!(view.items.is_empty());
    }
}
