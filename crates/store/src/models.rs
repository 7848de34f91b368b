//! Input payloads for record creation and editing.
//!
//! Entity shapes live in `solsync-core`; these are the form-level DTOs the
//! store validates and materializes into records.

use chrono::NaiveDate;
use serde::Deserialize;

use solsync_core::alerts::{AlertSeverity, AlertType};
use solsync_core::metrics::SystemStatus;
use solsync_core::pipeline::ProjectStatus;
use solsync_core::types::{EntityId, Timestamp};

/// Payload from the new/edit client form. All contact fields are replaced
/// on edit; the id and creation instant are store-owned.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Payload from the new/edit project form.
///
/// `client_name` is absent on purpose: the store snapshots it from the
/// referenced client at submit time.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProject {
    pub client_id: EntityId,
    pub title: String,
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
    pub power_kwp: f64,
    pub project_value: f64,
    pub panel_count: u32,
    pub inverter: String,
    pub address: String,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Lead
}

/// Payload appending one daily production reading.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductionRecord {
    pub date: Timestamp,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
    pub savings: f64,
    pub system_status: SystemStatus,
}

/// Payload raising a new alert against a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlert {
    pub project_id: EntityId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}
