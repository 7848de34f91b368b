//! Flat in-memory record store.

use tracing::{debug, info};

use solsync_core::alerts::{self, Alert};
use solsync_core::clients::{Client, DEFAULT_COMPANY_ID};
use solsync_core::error::CoreError;
use solsync_core::metrics::ProductionRecord;
use solsync_core::pipeline::{self, Project, ProjectStatus, TransitionOutcome};
use solsync_core::types::{EntityId, Timestamp};
use solsync_core::validate::{
    validate_email, validate_non_negative_amount, validate_positive_amount,
    validate_positive_count, validate_required_text,
};

use crate::ids;
use crate::models::{CreateAlert, CreateProductionRecord, SaveClient, SaveProject};

/// Flat, insertion-ordered store for the four top-level record sets.
///
/// Single-user and synchronous: the caller serializes its own access.
/// Cross-references between records are lookup keys, not ownership links,
/// and there is no delete path: project cancellation is a stage change,
/// not a removal.
#[derive(Debug, Default)]
pub struct RecordStore {
    clients: Vec<Client>,
    projects: Vec<Project>,
    production: Vec<ProductionRecord>,
    alerts: Vec<Alert>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn production_records(&self) -> &[ProductionRecord] {
        &self.production
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    // -----------------------------------------------------------------------
    // Upsert primitives
    // -----------------------------------------------------------------------
    // Replace in place by id (keeping the record's position) or append.

    pub fn upsert_client(&mut self, client: Client) {
        match self.clients.iter_mut().find(|c| c.id == client.id) {
            Some(existing) => *existing = client,
            None => self.clients.push(client),
        }
    }

    pub fn upsert_project(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
    }

    pub fn upsert_production_record(&mut self, record: ProductionRecord) {
        match self.production.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.production.push(record),
        }
    }

    pub fn upsert_alert(&mut self, alert: Alert) {
        match self.alerts.iter_mut().find(|a| a.id == alert.id) {
            Some(existing) => *existing = alert,
            None => self.alerts.push(alert),
        }
    }

    // -----------------------------------------------------------------------
    // Clients
    // -----------------------------------------------------------------------

    /// Create a client from the form payload, returning the new id.
    pub fn create_client(&mut self, input: SaveClient, now: Timestamp) -> Result<EntityId, CoreError> {
        validate_client_input(&input)?;
        let id = ids::new_id();
        self.clients.push(Client {
            id: id.clone(),
            company_id: DEFAULT_COMPANY_ID.to_string(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            tax_id: input.tax_id,
            address: input.address,
            city: input.city,
            state: input.state,
            postal_code: input.postal_code,
            created_at: now,
        });
        debug!(client_id = %id, "client created");
        Ok(id)
    }

    /// Replace a client's contact fields. Identity and creation instant are
    /// untouched.
    pub fn update_client(&mut self, id: &str, input: SaveClient) -> Result<(), CoreError> {
        validate_client_input(&input)?;
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "client",
                id: id.to_string(),
            })?;
        client.name = input.name;
        client.email = input.email;
        client.phone = input.phone;
        client.tax_id = input.tax_id;
        client.address = input.address;
        client.city = input.city;
        client.state = input.state;
        client.postal_code = input.postal_code;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Create a project from the form payload, returning the new id.
    ///
    /// The referenced client must resolve; its name is snapshotted into
    /// `client_name` and will not track later client edits.
    pub fn create_project(&mut self, input: SaveProject, now: Timestamp) -> Result<EntityId, CoreError> {
        validate_project_input(&input)?;
        let client_name = self.client_name_for(&input.client_id)?;
        let id = ids::new_id();
        self.projects.push(Project {
            id: id.clone(),
            client_id: input.client_id,
            client_name,
            title: input.title,
            status: input.status,
            power_kwp: input.power_kwp,
            project_value: input.project_value,
            panel_count: input.panel_count,
            inverter: input.inverter,
            address: input.address,
            start_date: input.start_date,
            completion_date: input.completion_date,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        });
        debug!(project_id = %id, "project created");
        Ok(id)
    }

    /// Full-record project edit.
    ///
    /// Every form field is replaced and `client_name` is re-snapshotted
    /// from the (possibly different) referenced client. The record keeps
    /// its id, storage position, and creation instant.
    pub fn update_project(
        &mut self,
        id: &str,
        input: SaveProject,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        validate_project_input(&input)?;
        let client_name = self.client_name_for(&input.client_id)?;
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "project",
                id: id.to_string(),
            })?;
        project.client_id = input.client_id;
        project.client_name = client_name;
        project.title = input.title;
        project.status = input.status;
        project.power_kwp = input.power_kwp;
        project.project_value = input.project_value;
        project.panel_count = input.panel_count;
        project.inverter = input.inverter;
        project.address = input.address;
        project.start_date = input.start_date;
        project.completion_date = input.completion_date;
        project.notes = input.notes;
        project.updated_at = now;
        Ok(())
    }

    /// Request a pipeline stage move for a project.
    ///
    /// A no-op (same stage) writes nothing. On an applied transition the
    /// caller should recompute derived views such as dashboard totals.
    pub fn transition_project(
        &mut self,
        id: &str,
        new_status: ProjectStatus,
        now: Timestamp,
    ) -> Result<TransitionOutcome, CoreError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "project",
                id: id.to_string(),
            })?;
        let outcome = pipeline::request_transition(project, new_status, now);
        if outcome == TransitionOutcome::Applied {
            debug!(project_id = %id, status = new_status.as_str(), "pipeline transition applied");
        }
        Ok(outcome)
    }

    fn client_name_for(&self, client_id: &str) -> Result<String, CoreError> {
        self.client(client_id)
            .map(|c| c.name.clone())
            .ok_or_else(|| CoreError::NotFound {
                entity: "client",
                id: client_id.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Production records
    // -----------------------------------------------------------------------

    /// Append one daily production reading, returning the new id.
    ///
    /// Duplicate dates are accepted; aggregation sums them.
    pub fn record_production(&mut self, input: CreateProductionRecord) -> Result<EntityId, CoreError> {
        validate_non_negative_amount(input.generation_kwh, "generation_kwh")?;
        validate_non_negative_amount(input.consumption_kwh, "consumption_kwh")?;
        validate_non_negative_amount(input.savings, "savings")?;
        let id = ids::new_id();
        self.production.push(ProductionRecord {
            id: id.clone(),
            date: input.date,
            generation_kwh: input.generation_kwh,
            consumption_kwh: input.consumption_kwh,
            savings: input.savings,
            system_status: input.system_status,
        });
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Alerts
    // -----------------------------------------------------------------------

    /// Raise a new, unresolved alert, returning the new id.
    ///
    /// The project reference is not checked: the flat store carries no
    /// referential integrity, and read-side views degrade to a placeholder
    /// for dangling ids.
    pub fn raise_alert(&mut self, input: CreateAlert, now: Timestamp) -> Result<EntityId, CoreError> {
        validate_required_text(&input.message, "message")?;
        let id = ids::new_id();
        self.alerts.push(Alert {
            id: id.clone(),
            project_id: input.project_id,
            alert_type: input.alert_type,
            severity: input.severity,
            message: input.message,
            resolved: false,
            created_at: now,
            resolved_at: None,
        });
        debug!(alert_id = %id, alert_type = input.alert_type.as_str(), "alert raised");
        Ok(id)
    }

    /// Resolve an alert at `now`.
    ///
    /// Rejected with `AlreadyResolved` if the alert was resolved before;
    /// the first `resolved_at` is never overwritten.
    pub fn resolve_alert(&mut self, id: &str, now: Timestamp) -> Result<(), CoreError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "alert",
                id: id.to_string(),
            })?;
        alerts::resolve(alert, now)?;
        info!(alert_id = %id, "alert resolved");
        Ok(())
    }

    /// Classify a production record and raise one alert per detected
    /// anomaly against `project_id`. Returns the ids of the raised alerts.
    pub fn raise_production_alerts(
        &mut self,
        project_id: &str,
        record_id: &str,
        now: Timestamp,
    ) -> Result<Vec<EntityId>, CoreError> {
        let record = self
            .production
            .iter()
            .find(|r| r.id == record_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "production_record",
                id: record_id.to_string(),
            })?;
        let drafts = alerts::classify_production(record);

        let mut raised = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = self.raise_alert(
                CreateAlert {
                    project_id: project_id.to_string(),
                    alert_type: draft.alert_type,
                    severity: draft.severity,
                    message: draft.message,
                },
                now,
            )?;
            raised.push(id);
        }
        Ok(raised)
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

fn validate_client_input(input: &SaveClient) -> Result<(), CoreError> {
    validate_required_text(&input.name, "name")?;
    validate_email(&input.email)?;
    validate_required_text(&input.phone, "phone")?;
    Ok(())
}

fn validate_project_input(input: &SaveProject) -> Result<(), CoreError> {
    validate_required_text(&input.title, "title")?;
    validate_positive_amount(input.power_kwp, "power_kwp")?;
    validate_positive_amount(input.project_value, "project_value")?;
    validate_positive_count(input.panel_count, "panel_count")?;
    pipeline::validate_inverter(&input.inverter)?;
    validate_required_text(&input.address, "address")?;
    Ok(())
}
