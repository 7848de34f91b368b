//! Operational alerts: taxonomy, resolution lifecycle, panel views, and
//! anomaly classification from production records.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metrics::{ProductionRecord, SystemStatus};
use crate::pipeline::Project;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Daily generation below this many kWh raises a `low_generation` alert.
pub const LOW_GENERATION_KWH: f64 = 18.0;

/// Daily consumption above this many kWh raises a `high_consumption` alert.
pub const HIGH_CONSUMPTION_KWH: f64 = 38.0;

/// Number of active alerts surfaced on the client dashboard.
pub const DASHBOARD_ALERT_LIMIT: usize = 3;

/// Fallback title when an alert references a project that no longer
/// resolves in the store.
pub const MISSING_PROJECT_PLACEHOLDER: &str = "Unknown project";

// ---------------------------------------------------------------------------
// AlertType
// ---------------------------------------------------------------------------

/// Operational condition category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowGeneration,
    HighConsumption,
    SystemFailure,
    Maintenance,
}

impl AlertType {
    /// String representation for storage and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowGeneration => "low_generation",
            AlertType::HighConsumption => "high_consumption",
            AlertType::SystemFailure => "system_failure",
            AlertType::Maintenance => "maintenance",
        }
    }

    /// Parse from a stored string, rejecting unknown values.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "low_generation" => Ok(AlertType::LowGeneration),
            "high_consumption" => Ok(AlertType::HighConsumption),
            "system_failure" => Ok(AlertType::SystemFailure),
            "maintenance" => Ok(AlertType::Maintenance),
            other => Err(CoreError::Validation(format!(
                "Unknown alert type '{other}'. Must be one of: low_generation, \
                 high_consumption, system_failure, maintenance"
            ))),
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            AlertType::LowGeneration => "Low Generation",
            AlertType::HighConsumption => "High Consumption",
            AlertType::SystemFailure => "System Failure",
            AlertType::Maintenance => "Maintenance",
        }
    }
}

// ---------------------------------------------------------------------------
// AlertSeverity
// ---------------------------------------------------------------------------

/// Severity carried on the alert at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    /// String representation for storage and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
            AlertSeverity::Low => "low",
        }
    }

    /// Parse from a stored string, rejecting unknown values.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "high" => Ok(AlertSeverity::High),
            "medium" => Ok(AlertSeverity::Medium),
            "low" => Ok(AlertSeverity::Low),
            other => Err(CoreError::Validation(format!(
                "Unknown alert severity '{other}'. Must be one of: high, medium, low"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A flagged operational condition tied to a project.
///
/// Invariant: `resolved_at` is `Some` exactly when `resolved` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: EntityId,
    pub project_id: EntityId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub resolved: bool,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Resolution lifecycle
// ---------------------------------------------------------------------------

/// Mark an alert resolved at `now`.
///
/// Resolution is one-way: a second call is rejected so the first
/// `resolved_at` instant is never overwritten. There is no reopen path.
pub fn resolve(alert: &mut Alert, now: Timestamp) -> Result<(), CoreError> {
    if alert.resolved {
        return Err(CoreError::AlreadyResolved {
            id: alert.id.clone(),
        });
    }
    alert.resolved = true;
    alert.resolved_at = Some(now);
    Ok(())
}

// ---------------------------------------------------------------------------
// Filtered views
// ---------------------------------------------------------------------------

/// Resolution-state filter for the alerts panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertFilter {
    Active,
    All,
    Resolved,
}

/// Filter alerts by resolution state, newest first.
///
/// The sort has no secondary key; ties on `created_at` keep storage order.
pub fn filter_alerts(alerts: &[Alert], filter: AlertFilter) -> Vec<Alert> {
    let mut out: Vec<Alert> = alerts
        .iter()
        .filter(|a| match filter {
            AlertFilter::Active => !a.resolved,
            AlertFilter::Resolved => a.resolved,
            AlertFilter::All => true,
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

/// Counters for the alerts panel header.
///
/// Always computed over the full alert set, so the counters do not follow
/// the currently selected filter view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    /// Unresolved high-severity alerts.
    pub high: usize,
    /// Unresolved medium-severity alerts.
    pub medium: usize,
    /// Resolved alerts of any severity.
    pub resolved: usize,
}

/// Compute the panel header counters over the full alert set.
pub fn severity_summary(alerts: &[Alert]) -> SeveritySummary {
    SeveritySummary {
        high: alerts
            .iter()
            .filter(|a| !a.resolved && a.severity == AlertSeverity::High)
            .count(),
        medium: alerts
            .iter()
            .filter(|a| !a.resolved && a.severity == AlertSeverity::Medium)
            .count(),
        resolved: alerts.iter().filter(|a| a.resolved).count(),
    }
}

// ---------------------------------------------------------------------------
// Enriched view
// ---------------------------------------------------------------------------

/// An alert joined with the referenced project's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    pub alert: Alert,
    pub project_title: String,
    pub client_name: String,
}

/// Attach project title and client name to each alert, preserving the
/// incoming order.
///
/// A dangling `project_id` degrades to [`MISSING_PROJECT_PLACEHOLDER`] and
/// an empty client name rather than failing the whole view.
pub fn enrich(alerts: &[Alert], projects: &[Project]) -> Vec<AlertView> {
    alerts
        .iter()
        .map(|alert| {
            let project = projects.iter().find(|p| p.id == alert.project_id);
            AlertView {
                alert: alert.clone(),
                project_title: project
                    .map(|p| p.title.clone())
                    .unwrap_or_else(|| MISSING_PROJECT_PLACEHOLDER.to_string()),
                client_name: project.map(|p| p.client_name.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Anomaly classification
// ---------------------------------------------------------------------------

/// A classified anomaly, ready to be materialized into an alert by the
/// store (which assigns the id and creation instant).
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Classify one production record against the anomaly thresholds.
///
/// At most one draft per condition; a single record can raise several.
pub fn classify_production(record: &ProductionRecord) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();
    let day = record.date.format("%Y-%m-%d");

    if record.system_status == SystemStatus::Critical {
        drafts.push(AlertDraft {
            alert_type: AlertType::SystemFailure,
            severity: AlertSeverity::High,
            message: format!("System reported critical status on {day}"),
        });
    }
    if record.generation_kwh < LOW_GENERATION_KWH {
        drafts.push(AlertDraft {
            alert_type: AlertType::LowGeneration,
            severity: AlertSeverity::Medium,
            message: format!(
                "Generation of {:.1} kWh on {day} is below the {LOW_GENERATION_KWH} kWh floor",
                record.generation_kwh
            ),
        });
    }
    if record.consumption_kwh > HIGH_CONSUMPTION_KWH {
        drafts.push(AlertDraft {
            alert_type: AlertType::HighConsumption,
            severity: AlertSeverity::Medium,
            message: format!(
                "Consumption of {:.1} kWh on {day} exceeds the {HIGH_CONSUMPTION_KWH} kWh ceiling",
                record.consumption_kwh
            ),
        });
    }
    drafts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ProjectStatus;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn noon(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn make_alert(id: &str, created_at: Timestamp, severity: AlertSeverity) -> Alert {
        Alert {
            id: id.to_string(),
            project_id: "project-1".to_string(),
            alert_type: AlertType::LowGeneration,
            severity,
            message: "generation below floor".to_string(),
            resolved: false,
            created_at,
            resolved_at: None,
        }
    }

    fn make_project(id: &str, title: &str) -> Project {
        let created = noon(1);
        Project {
            id: id.to_string(),
            client_id: "client-1".to_string(),
            client_name: "Joao Silva".to_string(),
            title: title.to_string(),
            status: ProjectStatus::Installation,
            power_kwp: 6.6,
            project_value: 25_000.0,
            panel_count: 12,
            inverter: "Growatt".to_string(),
            address: "Rua das Flores 100".to_string(),
            start_date: None,
            completion_date: None,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn make_record(generation: f64, consumption: f64, status: SystemStatus) -> ProductionRecord {
        ProductionRecord {
            id: "rec-1".to_string(),
            date: noon(10),
            generation_kwh: generation,
            consumption_kwh: consumption,
            savings: 10.0,
            system_status: status,
        }
    }

    // -- AlertType / AlertSeverity --------------------------------------------

    #[test]
    fn alert_type_round_trips() {
        for alert_type in [
            AlertType::LowGeneration,
            AlertType::HighConsumption,
            AlertType::SystemFailure,
            AlertType::Maintenance,
        ] {
            assert_eq!(AlertType::from_str(alert_type.as_str()).unwrap(), alert_type);
        }
    }

    #[test]
    fn alert_type_rejects_unknown() {
        assert_matches!(AlertType::from_str("overheat"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn alert_type_labels() {
        assert_eq!(AlertType::LowGeneration.label(), "Low Generation");
        assert_eq!(AlertType::SystemFailure.label(), "System Failure");
    }

    #[test]
    fn severity_round_trips() {
        for severity in [AlertSeverity::High, AlertSeverity::Medium, AlertSeverity::Low] {
            assert_eq!(AlertSeverity::from_str(severity.as_str()).unwrap(), severity);
        }
    }

    #[test]
    fn severity_rejects_unknown() {
        assert_matches!(AlertSeverity::from_str("urgent"), Err(CoreError::Validation(_)));
    }

    // -- resolve --------------------------------------------------------------

    #[test]
    fn resolve_sets_flag_and_instant() {
        let mut alert = make_alert("a1", noon(10), AlertSeverity::High);
        let now = noon(11);
        resolve(&mut alert, now).unwrap();
        assert!(alert.resolved);
        assert_eq!(alert.resolved_at, Some(now));
    }

    #[test]
    fn second_resolve_is_rejected_and_keeps_the_first_instant() {
        let mut alert = make_alert("a1", noon(10), AlertSeverity::High);
        let first = noon(11);
        resolve(&mut alert, first).unwrap();

        let err = resolve(&mut alert, noon(12)).unwrap_err();
        assert_matches!(err, CoreError::AlreadyResolved { ref id } if id == "a1");
        assert!(alert.resolved);
        assert_eq!(alert.resolved_at, Some(first));
    }

    // -- filter_alerts --------------------------------------------------------

    #[test]
    fn filters_partition_the_alert_set() {
        let mut resolved_alert = make_alert("a1", noon(10), AlertSeverity::High);
        resolve(&mut resolved_alert, noon(11)).unwrap();
        let alerts = vec![
            resolved_alert,
            make_alert("a2", noon(12), AlertSeverity::Medium),
            make_alert("a3", noon(9), AlertSeverity::Low),
        ];

        let active = filter_alerts(&alerts, AlertFilter::Active);
        let resolved = filter_alerts(&alerts, AlertFilter::Resolved);
        let all = filter_alerts(&alerts, AlertFilter::All);

        assert_eq!(active.len() + resolved.len(), alerts.len());
        assert!(active.iter().all(|a| !a.resolved));
        assert!(resolved.iter().all(|a| a.resolved));
        assert_eq!(all.len(), alerts.len());

        // No overlap between the two partitions.
        for a in &active {
            assert!(resolved.iter().all(|r| r.id != a.id));
        }
    }

    #[test]
    fn filtered_lists_are_newest_first() {
        let alerts = vec![
            make_alert("old", noon(5), AlertSeverity::Low),
            make_alert("new", noon(14), AlertSeverity::Low),
            make_alert("mid", noon(9), AlertSeverity::Low),
        ];
        let all = filter_alerts(&alerts, AlertFilter::All);
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn created_at_ties_keep_storage_order() {
        let alerts = vec![
            make_alert("first", noon(10), AlertSeverity::Low),
            make_alert("second", noon(10), AlertSeverity::Low),
        ];
        let all = filter_alerts(&alerts, AlertFilter::All);
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    // -- severity_summary -----------------------------------------------------

    #[test]
    fn summary_counts_active_by_severity_and_resolved_total() {
        let mut resolved_high = make_alert("a1", noon(10), AlertSeverity::High);
        resolve(&mut resolved_high, noon(11)).unwrap();
        let alerts = vec![
            resolved_high,
            make_alert("a2", noon(10), AlertSeverity::High),
            make_alert("a3", noon(10), AlertSeverity::Medium),
            make_alert("a4", noon(10), AlertSeverity::Medium),
            make_alert("a5", noon(10), AlertSeverity::Low),
        ];
        let summary = severity_summary(&alerts);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 2);
        assert_eq!(summary.resolved, 1);
    }

    #[test]
    fn summary_is_independent_of_filter_views() {
        let alerts = vec![
            make_alert("a1", noon(10), AlertSeverity::High),
            make_alert("a2", noon(10), AlertSeverity::Medium),
        ];
        // Narrowing the displayed list must not change the counters.
        let _resolved_view = filter_alerts(&alerts, AlertFilter::Resolved);
        let summary = severity_summary(&alerts);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.resolved, 0);
    }

    // -- enrich ---------------------------------------------------------------

    #[test]
    fn enrich_attaches_project_and_client_names() {
        let alerts = vec![make_alert("a1", noon(10), AlertSeverity::High)];
        let projects = vec![make_project("project-1", "Rooftop 6.6 kWp")];
        let views = enrich(&alerts, &projects);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].project_title, "Rooftop 6.6 kWp");
        assert_eq!(views[0].client_name, "Joao Silva");
    }

    #[test]
    fn enrich_degrades_on_dangling_project_reference() {
        let mut alert = make_alert("a1", noon(10), AlertSeverity::High);
        alert.project_id = "gone".to_string();
        let projects = vec![make_project("project-1", "Rooftop 6.6 kWp")];
        let views = enrich(&[alert], &projects);
        assert_eq!(views[0].project_title, MISSING_PROJECT_PLACEHOLDER);
        assert_eq!(views[0].client_name, "");
    }

    // -- classify_production --------------------------------------------------

    #[test]
    fn healthy_record_raises_nothing() {
        let record = make_record(25.0, 20.0, SystemStatus::Normal);
        assert!(classify_production(&record).is_empty());
    }

    #[test]
    fn low_generation_raises_medium_alert() {
        let record = make_record(12.0, 20.0, SystemStatus::Normal);
        let drafts = classify_production(&record);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].alert_type, AlertType::LowGeneration);
        assert_eq!(drafts[0].severity, AlertSeverity::Medium);
    }

    #[test]
    fn high_consumption_raises_medium_alert() {
        let record = make_record(25.0, 41.0, SystemStatus::Normal);
        let drafts = classify_production(&record);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].alert_type, AlertType::HighConsumption);
    }

    #[test]
    fn critical_status_raises_high_severity_failure() {
        let record = make_record(25.0, 20.0, SystemStatus::Critical);
        let drafts = classify_production(&record);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].alert_type, AlertType::SystemFailure);
        assert_eq!(drafts[0].severity, AlertSeverity::High);
    }

    #[test]
    fn one_record_can_raise_several_drafts() {
        let record = make_record(10.0, 45.0, SystemStatus::Critical);
        let drafts = classify_production(&record);
        assert_eq!(drafts.len(), 3);
        let types: Vec<AlertType> = drafts.iter().map(|d| d.alert_type).collect();
        assert!(types.contains(&AlertType::SystemFailure));
        assert!(types.contains(&AlertType::LowGeneration));
        assert!(types.contains(&AlertType::HighConsumption));
    }

    #[test]
    fn threshold_boundaries_are_exclusive() {
        // Exactly at the floor or ceiling is still healthy.
        let at_floor = make_record(LOW_GENERATION_KWH, HIGH_CONSUMPTION_KWH, SystemStatus::Normal);
        assert!(classify_production(&at_floor).is_empty());
    }

    // -- Display caps ---------------------------------------------------------

    #[test]
    fn dashboard_shows_the_newest_active_alerts_up_to_the_cap() {
        let alerts: Vec<Alert> = (1..=5)
            .map(|day| make_alert(&format!("a{day}"), noon(day), AlertSeverity::Medium))
            .collect();
        let shown: Vec<Alert> = filter_alerts(&alerts, AlertFilter::Active)
            .into_iter()
            .take(DASHBOARD_ALERT_LIMIT)
            .collect();
        assert_eq!(shown.len(), DASHBOARD_ALERT_LIMIT);
        assert_eq!(shown[0].id, "a5"); // newest first
    }
}
