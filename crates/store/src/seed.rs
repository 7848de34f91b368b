//! Randomized demo data seeding.
//!
//! Populates a starter client/project pair, a trailing window of daily
//! production readings, and alerts raised from the most recent anomalies.

use chrono::Duration;
use rand::Rng;

use solsync_core::alerts::{AlertSeverity, AlertType};
use solsync_core::error::CoreError;
use solsync_core::metrics::{SystemStatus, UNIT_PRICE_PER_KWH};
use solsync_core::pipeline::ProjectStatus;
use solsync_core::types::{EntityId, Timestamp};

use crate::models::{CreateAlert, CreateProductionRecord, SaveClient, SaveProject};
use crate::store::RecordStore;

/// Days of production history generated by the seeder.
pub const SEED_HISTORY_DAYS: i64 = 90;

/// Trailing days whose anomalies are materialized into alerts.
pub const SEED_ALERT_DAYS: usize = 7;

/// Daily generation range for seeded readings (kWh).
const GENERATION_RANGE: std::ops::Range<f64> = 15.0..45.0;

/// Daily consumption range for seeded readings (kWh).
const CONSUMPTION_RANGE: std::ops::Range<f64> = 10.0..40.0;

/// Populate an empty store with demo data ending at `now`.
///
/// Returns the id of the seeded project so callers can drive dashboards
/// and alert views against it.
pub fn seed_demo(store: &mut RecordStore, now: Timestamp) -> Result<EntityId, CoreError> {
    let mut rng = rand::rng();

    let client_id = store.create_client(
        SaveClient {
            name: "Joao Silva".to_string(),
            email: "joao@email.com".to_string(),
            phone: "11 99999-0000".to_string(),
            tax_id: "123.456.789-00".to_string(),
            address: "Rua das Flores 100".to_string(),
            city: "Sao Paulo".to_string(),
            state: "SP".to_string(),
            postal_code: "01000-000".to_string(),
        },
        now,
    )?;

    let project_id = store.create_project(
        SaveProject {
            client_id,
            title: "Residential rooftop 6.6 kWp".to_string(),
            status: ProjectStatus::Installation,
            power_kwp: 6.6,
            project_value: 25_000.0,
            panel_count: 12,
            inverter: "Growatt".to_string(),
            address: "Rua das Flores 100".to_string(),
            start_date: None,
            completion_date: None,
            notes: None,
        },
        now,
    )?;

    // Oldest day first, so the record set is stored in chronological order.
    for day_offset in (0..SEED_HISTORY_DAYS).rev() {
        let generation = rng.random_range(GENERATION_RANGE);
        let consumption = rng.random_range(CONSUMPTION_RANGE);
        store.record_production(CreateProductionRecord {
            date: now - Duration::days(day_offset),
            generation_kwh: generation,
            consumption_kwh: consumption,
            savings: generation * UNIT_PRICE_PER_KWH,
            system_status: roll_system_status(&mut rng),
        })?;
    }

    // Materialize alerts for the most recent week's anomalies.
    let recent: Vec<EntityId> = store
        .production_records()
        .iter()
        .rev()
        .take(SEED_ALERT_DAYS)
        .map(|r| r.id.clone())
        .collect();
    for record_id in recent {
        store.raise_production_alerts(&project_id, &record_id, now)?;
    }

    // A standing maintenance reminder, independent of the readings.
    store.raise_alert(
        CreateAlert {
            project_id: project_id.clone(),
            alert_type: AlertType::Maintenance,
            severity: AlertSeverity::Low,
            message: "Scheduled panel cleaning due".to_string(),
        },
        now,
    )?;

    Ok(project_id)
}

/// Roughly 85% normal, 10% alert, 5% critical.
fn roll_system_status<R: Rng>(rng: &mut R) -> SystemStatus {
    let roll: u8 = rng.random_range(0..100);
    if roll < 85 {
        SystemStatus::Normal
    } else if roll < 95 {
        SystemStatus::Alert
    } else {
        SystemStatus::Critical
    }
}
