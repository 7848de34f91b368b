//! Sales pipeline stages and the transition engine.
//!
//! A project moves through six ordered stages from first contact to a
//! finished installation, with cancellation available as a seventh,
//! terminal stage. Transitions are deliberately permissive: the board lets
//! an operator drag a card to any column, so the engine accepts any
//! stage-to-stage move and leaves ordering as a display concern.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Inverter vendors
// ---------------------------------------------------------------------------

/// Inverter vendors offered on the project form.
pub const INVERTER_VENDORS: &[&str] = &["Growatt", "Fronius", "GoodWe", "Solis", "Huawei"];

/// Validate that an inverter model is one of the offered vendors.
pub fn validate_inverter(inverter: &str) -> Result<(), CoreError> {
    if INVERTER_VENDORS.contains(&inverter) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown inverter '{inverter}'. Must be one of: {}",
            INVERTER_VENDORS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Stage of a sales/installation engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Lead,
    Proposal,
    Negotiation,
    Approved,
    Installation,
    Completed,
    Cancelled,
}

/// All seven stages, in expected progression order (cancelled last).
pub const ALL_STAGES: &[ProjectStatus] = &[
    ProjectStatus::Lead,
    ProjectStatus::Proposal,
    ProjectStatus::Negotiation,
    ProjectStatus::Approved,
    ProjectStatus::Installation,
    ProjectStatus::Completed,
    ProjectStatus::Cancelled,
];

/// The six stages shown as board columns. Cancelled projects are hidden
/// from the board entirely.
pub const BOARD_STAGES: &[ProjectStatus] = &[
    ProjectStatus::Lead,
    ProjectStatus::Proposal,
    ProjectStatus::Negotiation,
    ProjectStatus::Approved,
    ProjectStatus::Installation,
    ProjectStatus::Completed,
];

impl ProjectStatus {
    /// String representation for storage and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Lead => "lead",
            ProjectStatus::Proposal => "proposal",
            ProjectStatus::Negotiation => "negotiation",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Installation => "installation",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Parse from a stored string, rejecting unknown values.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "lead" => Ok(ProjectStatus::Lead),
            "proposal" => Ok(ProjectStatus::Proposal),
            "negotiation" => Ok(ProjectStatus::Negotiation),
            "approved" => Ok(ProjectStatus::Approved),
            "installation" => Ok(ProjectStatus::Installation),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Lead => "Lead",
            ProjectStatus::Proposal => "Proposal",
            ProjectStatus::Negotiation => "Negotiation",
            ProjectStatus::Approved => "Approved",
            ProjectStatus::Installation => "Installation",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the stage ends the engagement.
    ///
    /// Advisory only: transitions out of a terminal stage are not rejected.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// One sales/installation engagement.
///
/// `client_name` is a snapshot of the client's name taken when the project
/// is created or edited. It may drift from the client record afterwards;
/// there is no synchronization mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub client_id: EntityId,
    pub client_name: String,
    pub title: String,
    pub status: ProjectStatus,
    pub power_kwp: f64,
    pub project_value: f64,
    pub panel_count: u32,
    pub inverter: String,
    pub address: String,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Outcome of a stage transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The stage changed. Derived views (stage counts, dashboard totals)
    /// should be recomputed by the caller; there is no built-in fan-out.
    Applied,
    /// The target stage equals the current stage; nothing was written.
    NoOp,
}

/// Move a project to `new_status`.
///
/// Any stage-to-stage move is accepted, including backward moves and moves
/// out of a terminal stage. A same-stage request leaves the record
/// untouched, including `updated_at`.
pub fn request_transition(
    project: &mut Project,
    new_status: ProjectStatus,
    now: Timestamp,
) -> TransitionOutcome {
    if project.status == new_status {
        return TransitionOutcome::NoOp;
    }
    project.status = new_status;
    project.updated_at = now;
    TransitionOutcome::Applied
}

// ---------------------------------------------------------------------------
// Board view
// ---------------------------------------------------------------------------

/// A single board column: one stage and its projects in storage order.
#[derive(Debug, Clone)]
pub struct BoardColumn {
    pub stage: ProjectStatus,
    pub projects: Vec<Project>,
}

/// Group the live (non-cancelled) project set into board columns.
///
/// Storage order is preserved within each column; no re-sorting.
pub fn board(projects: &[Project]) -> Vec<BoardColumn> {
    BOARD_STAGES
        .iter()
        .map(|&stage| BoardColumn {
            stage,
            projects: projects
                .iter()
                .filter(|p| p.status == stage)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Count live projects per board stage.
pub fn stage_counts(projects: &[Project]) -> Vec<(ProjectStatus, usize)> {
    BOARD_STAGES
        .iter()
        .map(|&stage| (stage, projects.iter().filter(|p| p.status == stage).count()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
