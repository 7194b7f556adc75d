//! Conversation state — the serializable record threading an in-flight
//! flow across turns.
//!
//! The caller persists the state returned by each turn and passes it back
//! unchanged. Each flow's handler only ever sees its own state struct;
//! anything unrecognized is normalized to idle at the boundary.

use serde::{Deserialize, Serialize};

use crate::store::{BuddyPair, Meeting, Reflection, ReflectionKind};

/// Tagged union over the possible conversation situations.
///
/// `Idle` means "awaiting a fresh intent"; every other variant names the
/// active flow and carries its accumulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "process", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    ScheduleMeeting(ScheduleState),
    AddReflection(ReflectionState),
    Search(SearchState),
    ViewMeetings(ViewMeetingsState),
    ViewReflections(ViewReflectionsState),
}

impl ConversationState {
    /// Whether no flow is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Strictly deserialize a persisted state value.
    pub fn try_from_value(value: serde_json::Value) -> crate::error::Result<Self> {
        serde_json::from_value(value).map_err(|e| crate::error::Error::State(e.to_string()))
    }

    /// Deserialize a persisted state value, falling back to idle on any
    /// unrecognized shape. Lost context is recoverable — the user just
    /// starts a fresh intent.
    pub fn from_value(value: serde_json::Value) -> Self {
        match Self::try_from_value(value) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Discarding malformed conversation state: {e}");
                Self::Idle
            }
        }
    }
}

// ── Schedule meeting ────────────────────────────────────────────────

/// Step cursor for the scheduling flow. Each step interprets the incoming
/// message as the answer to the question asked on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStep {
    Name,
    Agenda,
    Links,
    Date,
    Time,
    Location,
    InviteBuddy,
    Confirm,
}

/// Meeting fields captured so far. Fields stay absent until their step
/// has run, so a serialized draft shows exactly what has been captured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links_documents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Accumulator for the scheduling flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub step: ScheduleStep,
    #[serde(default)]
    pub draft: MeetingDraft,
    /// Buddy pairing found at the location step, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buddy: Option<BuddyPair>,
    /// Whether the user asked to invite their buddy. False until asked.
    #[serde(default)]
    pub invite_buddy: bool,
}

impl ScheduleState {
    /// Fresh flow, waiting for the meeting name.
    pub fn start() -> Self {
        Self {
            step: ScheduleStep::Name,
            draft: MeetingDraft::default(),
            buddy: None,
            invite_buddy: false,
        }
    }
}

// ── Add reflection ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionStep {
    /// Waiting for a rose/thorn/bud choice.
    ChooseKind,
    /// Waiting for the narrative content.
    Content,
}

/// Accumulator for the reflection flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionState {
    pub step: ReflectionStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReflectionKind>,
}

impl ReflectionState {
    /// Fresh flow, waiting for the kind choice.
    pub fn start() -> Self {
        Self {
            step: ReflectionStep::ChooseKind,
            kind: None,
        }
    }
}

// ── Search ──────────────────────────────────────────────────────────

/// How the search flow was entered. Both scopes converge on the same
/// keyword handler — only a reflections search is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Reflections,
    Menu,
}

/// Accumulator for the search flow (single step: the keyword).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub scope: SearchScope,
}

// ── View meetings ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMeetingsStep {
    /// Waiting for a 1-based pick from the listed meetings.
    Select,
    /// Detail shown; waiting on the reschedule/cancel/back menu.
    Menu,
}

/// Accumulator for the meeting-lookup flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewMeetingsState {
    pub step: ViewMeetingsStep,
    /// The meetings listed to the user, in display order.
    pub meetings: Vec<Meeting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Meeting>,
}

// ── View reflections (extension point) ──────────────────────────────

/// Search results handed off for selection. No step handler exists yet;
/// the engine answers follow-ups with an explicit not-available message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewReflectionsState {
    /// The reflections shown to the user, in display order.
    pub reflections: Vec<Reflection>,
}
