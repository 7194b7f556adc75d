//! Error types for Peer Assist.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("State error: {0}")]
    State(String),
}

/// Persistence-layer errors.
///
/// The dialogue engine catches these at the flow-handler boundary and turns
/// them into user-facing chat messages; they never propagate out of
/// `process_message`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
