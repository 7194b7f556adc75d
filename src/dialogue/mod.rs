//! Dialogue engine — multi-turn conversational core.
//!
//! The engine is a pure function of (user message, user id, conversation
//! state) to (bot messages, next state). The caller owns the transcript and
//! persists the state blob between turns; the engine holds nothing in
//! memory across invocations.

pub mod engine;
pub mod intent;
pub mod meetings;
pub mod message;
pub mod reflection;
pub mod replies;
pub mod schedule;
pub mod search;
pub mod state;

pub use engine::{DialogueEngine, DialogueTurn};
pub use intent::Intent;
pub use message::{ChatMessage, MessageMeta, Sender};
pub use state::{
    ConversationState, MeetingDraft, ReflectionState, ReflectionStep, ScheduleState,
    ScheduleStep, SearchScope, SearchState, ViewMeetingsState, ViewMeetingsStep,
    ViewReflectionsState,
};
