//! Windowed aggregation over daily production records.
//!
//! Aggregation is recomputed from the full record set on every call. This
//! is fine for single-tenant, bounded history; a larger deployment would
//! need incremental aggregation with identical output.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Billing price per kWh used for the monthly savings projection.
pub const UNIT_PRICE_PER_KWH: f64 = 0.75;

/// Day count of the monthly projection horizon.
pub const PROJECTION_DAYS: f64 = 30.0;

/// Number of history rows shown on the client dashboard.
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// SystemStatus
// ---------------------------------------------------------------------------

/// Reported health of the installation on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Normal,
    Alert,
    Critical,
}

impl SystemStatus {
    /// String representation for storage and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Normal => "normal",
            SystemStatus::Alert => "alert",
            SystemStatus::Critical => "critical",
        }
    }

    /// Parse from a stored string, rejecting unknown values.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "normal" => Ok(SystemStatus::Normal),
            "alert" => Ok(SystemStatus::Alert),
            "critical" => Ok(SystemStatus::Critical),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AggregationWindow
// ---------------------------------------------------------------------------

/// Trailing-day window used to filter production records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationWindow {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
}

/// All selectable windows, in the order offered by the period picker.
pub const WINDOW_CHOICES: &[AggregationWindow] = &[
    AggregationWindow::Days7,
    AggregationWindow::Days30,
    AggregationWindow::Days90,
];

impl AggregationWindow {
    /// Length of the window in days.
    pub fn days(self) -> i64 {
        match self {
            AggregationWindow::Days7 => 7,
            AggregationWindow::Days30 => 30,
            AggregationWindow::Days90 => 90,
        }
    }

    /// String representation for payloads ("7d", "30d", "90d").
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationWindow::Days7 => "7d",
            AggregationWindow::Days30 => "30d",
            AggregationWindow::Days90 => "90d",
        }
    }

    /// Parse from a payload string, rejecting unknown values.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "7d" => Ok(AggregationWindow::Days7),
            "30d" => Ok(AggregationWindow::Days30),
            "90d" => Ok(AggregationWindow::Days90),
            other => Err(CoreError::Validation(format!(
                "Unknown aggregation window '{other}'. Must be one of: 7d, 30d, 90d"
            ))),
        }
    }

    /// The earliest instant still inside the window ending at `now`.
    pub fn cutoff(self, now: Timestamp) -> Timestamp {
        now - Duration::days(self.days())
    }
}

// ---------------------------------------------------------------------------
// ProductionRecord
// ---------------------------------------------------------------------------

/// One calendar-day production sample for a site.
///
/// One record conceptually represents one day, but uniqueness per date is
/// not enforced; duplicates are summed by aggregation. `savings` is the
/// value stored at recording time, not recomputed from the kWh fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub id: EntityId,
    pub date: Timestamp,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
    pub savings: f64,
    pub system_status: SystemStatus,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Summary statistics over one aggregation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSummary {
    pub record_count: usize,
    pub total_generation_kwh: f64,
    pub total_consumption_kwh: f64,
    /// Sum of the stored per-day savings values (measured data).
    pub total_savings: f64,
    pub avg_daily_generation_kwh: f64,
    pub avg_daily_consumption_kwh: f64,
    /// Projection from average generation at [`UNIT_PRICE_PER_KWH`], not
    /// measured data. Keep it visually distinct from `total_savings`.
    pub estimated_monthly_savings: f64,
    pub efficiency_percent: f64,
}

/// Aggregate the records falling inside the window ending at `now`.
///
/// Records dated in the future relative to `now` are kept: the filter has
/// no upper bound. An empty window yields all-zero sums and averages.
pub fn aggregate(
    records: &[ProductionRecord],
    window: AggregationWindow,
    now: Timestamp,
) -> ProductionSummary {
    let cutoff = window.cutoff(now);
    let filtered: Vec<&ProductionRecord> = records.iter().filter(|r| r.date >= cutoff).collect();

    let record_count = filtered.len();
    let total_generation_kwh: f64 = filtered.iter().map(|r| r.generation_kwh).sum();
    let total_consumption_kwh: f64 = filtered.iter().map(|r| r.consumption_kwh).sum();
    let total_savings: f64 = filtered.iter().map(|r| r.savings).sum();

    let avg_daily_generation_kwh = if record_count > 0 {
        total_generation_kwh / record_count as f64
    } else {
        0.0
    };
    let avg_daily_consumption_kwh = total_consumption_kwh / record_count.max(1) as f64;

    let estimated_monthly_savings = avg_daily_generation_kwh * PROJECTION_DAYS * UNIT_PRICE_PER_KWH;

    // Denominator floored to 1 kWh when there is no consumption data; the
    // result is degenerate but never a division fault.
    let consumption_floor = if total_consumption_kwh == 0.0 {
        1.0
    } else {
        total_consumption_kwh
    };
    let efficiency_percent = (total_generation_kwh / consumption_floor) * 100.0;

    ProductionSummary {
        record_count,
        total_generation_kwh,
        total_consumption_kwh,
        total_savings,
        avg_daily_generation_kwh,
        avg_daily_consumption_kwh,
        estimated_monthly_savings,
        efficiency_percent,
    }
}

/// The windowed record set sorted by date descending (most recent first).
///
/// The sort is stable, so duplicate dates keep their storage order.
pub fn daily_history(
    records: &[ProductionRecord],
    window: AggregationWindow,
    now: Timestamp,
) -> Vec<ProductionRecord> {
    let cutoff = window.cutoff(now);
    let mut rows: Vec<ProductionRecord> = records
        .iter()
        .filter(|r| r.date >= cutoff)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
