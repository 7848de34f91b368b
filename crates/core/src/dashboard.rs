//! Company overview totals.

use serde::Serialize;

use crate::clients::Client;
use crate::pipeline::Project;

/// Headline totals for the company overview tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_projects: usize,
    /// Projects in a non-terminal stage (neither completed nor cancelled).
    pub active_projects: usize,
    pub total_clients: usize,
}

/// Compute the overview totals.
///
/// Callers re-run this after every pipeline mutation; the engine does not
/// push updates.
pub fn dashboard_stats(projects: &[Project], clients: &[Client]) -> DashboardStats {
    DashboardStats {
        total_projects: projects.len(),
        active_projects: projects.iter().filter(|p| !p.status.is_terminal()).count(),
        total_clients: clients.len(),
    }
}
