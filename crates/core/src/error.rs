use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Alert already resolved: {id}")]
    AlreadyResolved { id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),
}
