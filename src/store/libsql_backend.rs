//! libSQL backend — async `DataStore` implementation.
//!
//! Supports local file and in-memory databases. A single connection is
//! reused for all operations; `libsql::Connection` is `Send + Sync` and
//! safe for concurrent async use.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::model::{
    BuddyPair, Meeting, NewMeeting, Participant, ParticipantStatus, PerformanceMetrics,
    Reflection, ReflectionKind,
};
use crate::store::DataStore;

/// libSQL store backend.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and bootstrap the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        info!(path = %path.display(), "Store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Pool(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Pool(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        Ok(store)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create tables and indexes. Idempotent.
    async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS meetings (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    agenda TEXT NOT NULL,
                    links_documents TEXT NOT NULL DEFAULT '',
                    date TEXT NOT NULL,
                    time TEXT NOT NULL,
                    location TEXT NOT NULL,
                    created_by TEXT NOT NULL,
                    cancelled INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_meetings_created_by ON meetings(created_by);
                CREATE INDEX IF NOT EXISTS idx_meetings_date ON meetings(date);

                CREATE TABLE IF NOT EXISTS meeting_participants (
                    meeting_id TEXT NOT NULL,
                    user_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'invited',
                    PRIMARY KEY (meeting_id, user_id)
                );

                CREATE TABLE IF NOT EXISTS reflections (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    content TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_reflections_user ON reflections(user_id);

                CREATE TABLE IF NOT EXISTS buddy_pairs (
                    user_id TEXT PRIMARY KEY,
                    buddy_id TEXT NOT NULL,
                    buddy_name TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS performance_metrics (
                    user_id TEXT PRIMARY KEY,
                    delayed_applications INTEGER NOT NULL,
                    process_days REAL NOT NULL,
                    applications_handled INTEGER NOT NULL
                );",
            )
            .await
            .map_err(|e| StoreError::Query(format!("init_schema: {e}")))?;
        Ok(())
    }

    // ── Portal-side administration ──────────────────────────────────
    //
    // Rows the dialogue engine only reads. Other portal surfaces own these;
    // the methods exist so hosts and tests can seed them.

    /// Set (or replace) a user's buddy pairing.
    pub async fn set_buddy_pair(
        &self,
        user_id: &str,
        buddy_id: &str,
        buddy_name: &str,
    ) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO buddy_pairs (user_id, buddy_id, buddy_name) VALUES (?1, ?2, ?3)",
                params![user_id, buddy_id, buddy_name],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set_buddy_pair: {e}")))?;
        Ok(())
    }

    /// Set (or replace) a user's performance metrics row.
    pub async fn set_performance_metrics(
        &self,
        user_id: &str,
        metrics: &PerformanceMetrics,
    ) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO performance_metrics (user_id, delayed_applications, process_days, applications_handled) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user_id,
                    metrics.delayed_applications as i64,
                    metrics.process_days,
                    metrics.applications_handled as i64,
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set_performance_metrics: {e}")))?;
        Ok(())
    }

    /// Mark a meeting as cancelled.
    pub async fn cancel_meeting(&self, meeting_id: Uuid) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "UPDATE meetings SET cancelled = 1 WHERE id = ?1",
                params![meeting_id.to_string()],
            )
            .await
            .map_err(|e| StoreError::Query(format!("cancel_meeting: {e}")))?;
        Ok(())
    }
}

// ── Row mapping helpers ─────────────────────────────────────────────

/// Parse an RFC 3339 timestamp from a TEXT column.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

const MEETING_COLUMNS: &str =
    "id, name, agenda, links_documents, date, time, location, created_by, cancelled, created_at";

fn row_to_meeting(row: &libsql::Row) -> Result<Meeting, libsql::Error> {
    let id_str: String = row.get(0)?;
    let cancelled: i64 = row.get(8)?;
    let created_str: String = row.get(9)?;

    Ok(Meeting {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        name: row.get(1)?,
        agenda: row.get(2)?,
        links_documents: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        location: row.get(6)?,
        created_by: row.get(7)?,
        cancelled: cancelled != 0,
        created_at: parse_datetime(&created_str),
    })
}

const REFLECTION_COLUMNS: &str = "id, user_id, kind, content, created_at";

fn row_to_reflection(row: &libsql::Row) -> Result<Reflection, libsql::Error> {
    let id_str: String = row.get(0)?;
    let kind_str: String = row.get(2)?;
    let created_str: String = row.get(4)?;

    Ok(Reflection {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        user_id: row.get(1)?,
        kind: ReflectionKind::from_label(&kind_str).unwrap_or(ReflectionKind::Rose),
        content: row.get(3)?,
        created_at: parse_datetime(&created_str),
    })
}

fn str_to_participant_status(s: &str) -> ParticipantStatus {
    match s {
        "accepted" => ParticipantStatus::Accepted,
        "declined" => ParticipantStatus::Declined,
        _ => ParticipantStatus::Invited,
    }
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl DataStore for LibSqlStore {
    async fn performance_metrics(&self, user_id: &str) -> Result<PerformanceMetrics, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT delayed_applications, process_days, applications_handled FROM performance_metrics WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("performance_metrics: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let delayed: i64 = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("performance_metrics row: {e}")))?;
                let days: f64 = row
                    .get(1)
                    .map_err(|e| StoreError::Query(format!("performance_metrics row: {e}")))?;
                let handled: i64 = row
                    .get(2)
                    .map_err(|e| StoreError::Query(format!("performance_metrics row: {e}")))?;
                Ok(PerformanceMetrics {
                    delayed_applications: delayed.max(0) as u32,
                    process_days: days,
                    applications_handled: handled.max(0) as u32,
                })
            }
            Ok(None) => Err(StoreError::NotFound {
                entity: "performance_metrics".into(),
                id: user_id.into(),
            }),
            Err(e) => Err(StoreError::Query(format!("performance_metrics: {e}"))),
        }
    }

    async fn meetings_for_user(&self, user_id: &str) -> Result<Vec<Meeting>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {MEETING_COLUMNS} FROM meetings
                     WHERE created_by = ?1
                        OR id IN (SELECT meeting_id FROM meeting_participants WHERE user_id = ?1)
                     ORDER BY date ASC, time ASC"
                ),
                params![user_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("meetings_for_user: {e}")))?;

        let mut meetings = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_meeting(&row) {
                Ok(meeting) => meetings.push(meeting),
                Err(e) => tracing::warn!("Skipping meeting row: {e}"),
            }
        }
        Ok(meetings)
    }

    async fn meeting_participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT name, status FROM meeting_participants WHERE meeting_id = ?1 ORDER BY name ASC",
                params![meeting_id.to_string()],
            )
            .await
            .map_err(|e| StoreError::Query(format!("meeting_participants: {e}")))?;

        let mut participants = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let name: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("meeting_participants row: {e}")))?;
            let status_str: String = row
                .get(1)
                .map_err(|e| StoreError::Query(format!("meeting_participants row: {e}")))?;
            participants.push(Participant {
                name,
                status: str_to_participant_status(&status_str),
            });
        }
        Ok(participants)
    }

    async fn buddy_pair(&self, user_id: &str) -> Result<Option<BuddyPair>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT buddy_id, buddy_name FROM buddy_pairs WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("buddy_pair: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let buddy_id: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("buddy_pair row: {e}")))?;
                let buddy_name: String = row
                    .get(1)
                    .map_err(|e| StoreError::Query(format!("buddy_pair row: {e}")))?;
                Ok(Some(BuddyPair {
                    buddy_id,
                    buddy_name,
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("buddy_pair: {e}"))),
        }
    }

    async fn create_meeting(&self, meeting: &NewMeeting) -> Result<Meeting, StoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        self.conn()
            .execute(
                "INSERT INTO meetings (id, name, agenda, links_documents, date, time, location, created_by, cancelled, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9)",
                params![
                    id.to_string(),
                    meeting.name.as_str(),
                    meeting.agenda.as_str(),
                    meeting.links_documents.as_str(),
                    meeting.date.as_str(),
                    meeting.time.as_str(),
                    meeting.location.as_str(),
                    meeting.created_by.as_str(),
                    created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("create_meeting: {e}")))?;

        debug!(meeting_id = %id, name = %meeting.name, "Meeting created");
        Ok(Meeting {
            id,
            name: meeting.name.clone(),
            agenda: meeting.agenda.clone(),
            links_documents: meeting.links_documents.clone(),
            date: meeting.date.clone(),
            time: meeting.time.clone(),
            location: meeting.location.clone(),
            created_by: meeting.created_by.clone(),
            cancelled: false,
            created_at,
        })
    }

    async fn add_meeting_participant(
        &self,
        meeting_id: Uuid,
        user_id: &str,
    ) -> Result<(), StoreError> {
        // Name defaults to the user id until a profile sync fills it in.
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO meeting_participants (meeting_id, user_id, name, status)
                 VALUES (?1, ?2, ?2, 'invited')",
                params![meeting_id.to_string(), user_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("add_meeting_participant: {e}")))?;

        debug!(meeting_id = %meeting_id, user_id = %user_id, "Participant added");
        Ok(())
    }

    async fn create_reflection(
        &self,
        kind: ReflectionKind,
        content: &str,
        user_id: &str,
    ) -> Result<Reflection, StoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        self.conn()
            .execute(
                "INSERT INTO reflections (id, user_id, kind, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.to_string(),
                    user_id,
                    kind.label(),
                    content,
                    created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("create_reflection: {e}")))?;

        debug!(reflection_id = %id, kind = %kind, "Reflection created");
        Ok(Reflection {
            id,
            kind,
            content: content.to_string(),
            user_id: user_id.to_string(),
            created_at,
        })
    }

    async fn search_reflections(
        &self,
        keyword: &str,
        user_id: &str,
    ) -> Result<Vec<Reflection>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {REFLECTION_COLUMNS} FROM reflections
                     WHERE user_id = ?1 AND lower(content) LIKE '%' || lower(?2) || '%'"
                ),
                params![user_id, keyword],
            )
            .await
            .map_err(|e| StoreError::Query(format!("search_reflections: {e}")))?;

        let mut reflections = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_reflection(&row) {
                Ok(reflection) => reflections.push(reflection),
                Err(e) => tracing::warn!("Skipping reflection row: {e}"),
            }
        }
        Ok(reflections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(created_by: &str) -> NewMeeting {
        NewMeeting {
            name: "Buddy sync".into(),
            agenda: "Casework questions".into(),
            links_documents: String::new(),
            date: "2031-06-01".into(),
            time: "10:00".into(),
            location: "Teams".into(),
            created_by: created_by.into(),
        }
    }

    #[tokio::test]
    async fn meeting_roundtrip() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let created = store.create_meeting(&draft("officer-1")).await.unwrap();
        assert_eq!(created.name, "Buddy sync");
        assert!(!created.cancelled);

        let meetings = store.meetings_for_user("officer-1").await.unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0], created);

        // Not visible to an unrelated user.
        assert!(store.meetings_for_user("officer-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn participant_makes_meeting_visible() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let created = store.create_meeting(&draft("officer-1")).await.unwrap();
        store
            .add_meeting_participant(created.id, "officer-2")
            .await
            .unwrap();

        let meetings = store.meetings_for_user("officer-2").await.unwrap();
        assert_eq!(meetings.len(), 1);

        let participants = store.meeting_participants(created.id).await.unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].status, ParticipantStatus::Invited);
    }

    #[tokio::test]
    async fn meetings_sorted_by_date_then_time() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let mut late = draft("officer-1");
        late.date = "2031-07-01".into();
        let mut early_same_day = draft("officer-1");
        early_same_day.time = "08:00".into();
        store.create_meeting(&late).await.unwrap();
        store.create_meeting(&draft("officer-1")).await.unwrap();
        store.create_meeting(&early_same_day).await.unwrap();

        let meetings = store.meetings_for_user("officer-1").await.unwrap();
        let keys: Vec<_> = meetings
            .iter()
            .map(|m| (m.date.clone(), m.time.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn cancel_meeting_sets_flag() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let created = store.create_meeting(&draft("officer-1")).await.unwrap();
        store.cancel_meeting(created.id).await.unwrap();

        let meetings = store.meetings_for_user("officer-1").await.unwrap();
        assert!(meetings[0].cancelled);
    }

    #[tokio::test]
    async fn reflection_create_and_search_case_insensitive() {
        let store = LibSqlStore::new_memory().await.unwrap();
        store
            .create_reflection(ReflectionKind::Thorn, "Budget review slipped", "officer-1")
            .await
            .unwrap();
        store
            .create_reflection(ReflectionKind::Rose, "Cleared the backlog", "officer-1")
            .await
            .unwrap();
        store
            .create_reflection(ReflectionKind::Rose, "budget approved early", "officer-2")
            .await
            .unwrap();

        let hits = store.search_reflections("BUDGET", "officer-1").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, ReflectionKind::Thorn);
        assert_eq!(hits[0].content, "Budget review slipped");

        assert!(store.search_reflections("budget", "officer-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn buddy_pair_lookup() {
        let store = LibSqlStore::new_memory().await.unwrap();
        assert!(store.buddy_pair("officer-1").await.unwrap().is_none());

        store
            .set_buddy_pair("officer-1", "officer-9", "Priya N.")
            .await
            .unwrap();
        let pair = store.buddy_pair("officer-1").await.unwrap().unwrap();
        assert_eq!(pair.buddy_id, "officer-9");
        assert_eq!(pair.buddy_name, "Priya N.");
    }

    #[tokio::test]
    async fn metrics_not_found_then_found() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let err = store.performance_metrics("officer-1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let metrics = PerformanceMetrics {
            delayed_applications: 2,
            process_days: 4.5,
            applications_handled: 131,
        };
        store
            .set_performance_metrics("officer-1", &metrics)
            .await
            .unwrap();
        assert_eq!(store.performance_metrics("officer-1").await.unwrap(), metrics);
    }

    #[tokio::test]
    async fn local_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peer-assist.db");
        {
            let store = LibSqlStore::new_local(&path).await.unwrap();
            store.create_meeting(&draft("officer-1")).await.unwrap();
        }
        let store = LibSqlStore::new_local(&path).await.unwrap();
        assert_eq!(store.meetings_for_user("officer-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_calendar_date_survives_storage() {
        let store = LibSqlStore::new_memory().await.unwrap();
        let mut odd = draft("officer-1");
        odd.date = "2025-02-30".into();
        let created = store.create_meeting(&odd).await.unwrap();
        assert_eq!(created.date, "2025-02-30");

        let meetings = store.meetings_for_user("officer-1").await.unwrap();
        assert_eq!(meetings[0].date, "2025-02-30");
    }
}
