//! Record types for the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Meetings ────────────────────────────────────────────────────────

/// A scheduled peer meeting.
///
/// `date` and `time` are stored as the literal `YYYY-MM-DD` / `HH:MM`
/// strings the user entered. Validation is pattern-only (no calendar
/// check), so they must survive storage verbatim. ISO strings also sort
/// lexicographically in chronological order, which the upcoming-meetings
/// listing relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub name: String,
    pub agenda: String,
    /// Links or documents attached to the meeting; empty when none.
    pub links_documents: String,
    /// Meeting date, `YYYY-MM-DD`.
    pub date: String,
    /// Meeting time, `HH:MM` (24h).
    pub time: String,
    pub location: String,
    pub created_by: String,
    pub cancelled: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub name: String,
    pub agenda: String,
    pub links_documents: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub created_by: String,
}

/// A meeting participant as shown in the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub status: ParticipantStatus,
}

/// Participation status for a meeting invitee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Invited,
    Accepted,
    Declined,
}

impl ParticipantStatus {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Reflections ─────────────────────────────────────────────────────

/// The three reflection kinds of the rose/thorn/bud practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionKind {
    /// A success.
    Rose,
    /// A challenge.
    Thorn,
    /// An opportunity.
    Bud,
}

impl ReflectionKind {
    /// Lowercase storage/display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rose => "rose",
            Self::Thorn => "thorn",
            Self::Bud => "bud",
        }
    }

    /// Parse a storage label.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "rose" => Some(Self::Rose),
            "thorn" => Some(Self::Thorn),
            "bud" => Some(Self::Bud),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReflectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A user-authored reflection note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: Uuid,
    pub kind: ReflectionKind,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

// ── Buddy pairs ─────────────────────────────────────────────────────

/// A peer-mentorship pairing, looked up from the invitee's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuddyPair {
    pub buddy_id: String,
    pub buddy_name: String,
}

// ── Performance metrics ─────────────────────────────────────────────

/// Officer performance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Applications currently past their processing deadline.
    pub delayed_applications: u32,
    /// Average processing days per application.
    pub process_days: f64,
    /// Total applications handled.
    pub applications_handled: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_kind_labels_roundtrip() {
        for kind in [ReflectionKind::Rose, ReflectionKind::Thorn, ReflectionKind::Bud] {
            assert_eq!(ReflectionKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ReflectionKind::from_label("daisy"), None);
    }

    #[test]
    fn reflection_kind_display_matches_serde() {
        for kind in [ReflectionKind::Rose, ReflectionKind::Thorn, ReflectionKind::Bud] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn participant_status_labels() {
        assert_eq!(ParticipantStatus::Invited.label(), "invited");
        assert_eq!(ParticipantStatus::Accepted.label(), "accepted");
        assert_eq!(ParticipantStatus::Declined.label(), "declined");
    }

    #[test]
    fn meeting_serde_roundtrip_preserves_raw_date() {
        let meeting = Meeting {
            id: Uuid::new_v4(),
            name: "Casework clinic".into(),
            agenda: "Backlog triage".into(),
            links_documents: String::new(),
            // Pattern-valid but not a calendar date — must survive verbatim.
            date: "2025-02-30".into(),
            time: "09:30".into(),
            location: "Room 4".into(),
            created_by: "officer-7".into(),
            cancelled: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&meeting).unwrap();
        let parsed: Meeting = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.date, "2025-02-30");
        assert_eq!(parsed, meeting);
    }
}
