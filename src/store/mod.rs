//! Persistence layer — the narrow data surface the dialogue engine consumes.

pub mod libsql_backend;
pub mod model;

pub use libsql_backend::LibSqlStore;
pub use model::{
    BuddyPair, Meeting, NewMeeting, Participant, ParticipantStatus, PerformanceMetrics,
    Reflection, ReflectionKind,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;

/// Backend-agnostic data access trait.
///
/// Any store exposing these eight operations can back the dialogue engine.
/// All calls are awaited to completion before the engine builds its reply.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch the performance metrics for a user.
    ///
    /// Fails with `StoreError::NotFound` if the user has no metrics row.
    async fn performance_metrics(&self, user_id: &str) -> Result<PerformanceMetrics, StoreError>;

    /// Fetch all meetings visible to a user (created by them or where they
    /// are a participant). Unfiltered — the caller decides what "upcoming"
    /// means.
    async fn meetings_for_user(&self, user_id: &str) -> Result<Vec<Meeting>, StoreError>;

    /// Fetch the participant list for a meeting.
    async fn meeting_participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, StoreError>;

    /// Look up a user's buddy pairing. `Ok(None)` if the user has no buddy.
    async fn buddy_pair(&self, user_id: &str) -> Result<Option<BuddyPair>, StoreError>;

    /// Create a meeting. Returns the created record with its id.
    async fn create_meeting(&self, meeting: &NewMeeting) -> Result<Meeting, StoreError>;

    /// Register a user as a participant of a meeting.
    async fn add_meeting_participant(
        &self,
        meeting_id: Uuid,
        user_id: &str,
    ) -> Result<(), StoreError>;

    /// Create a reflection for a user. Returns the created record.
    async fn create_reflection(
        &self,
        kind: ReflectionKind,
        content: &str,
        user_id: &str,
    ) -> Result<Reflection, StoreError>;

    /// Case-insensitive substring search over a user's reflection content.
    /// Result order is unspecified — the caller sorts.
    async fn search_reflections(
        &self,
        keyword: &str,
        user_id: &str,
    ) -> Result<Vec<Reflection>, StoreError>;
}
