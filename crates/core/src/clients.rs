//! Client entity.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// Owning company for every record in this single-tenant deployment.
pub const DEFAULT_COMPANY_ID: &str = "company-1";

/// A customer of the installation company.
///
/// Identity is immutable once assigned; contact fields are freely editable.
/// Clients are never deleted; projects keep referencing them by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: EntityId,
    pub company_id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub created_at: Timestamp,
}
