//! DialogueEngine — public entry point and dispatch.
//!
//! `process_message` is infallible: validation failures re-prompt, store
//! failures become apology messages, and malformed state is normalized to
//! idle. The caller replaces its stored state with `DialogueTurn::state`
//! after every call and must serialize calls per conversation.

use std::sync::Arc;

use tracing::warn;

use crate::config::EngineConfig;
use crate::store::DataStore;

use super::intent::{self, Intent};
use super::message::ChatMessage;
use super::replies;
use super::state::{ConversationState, ReflectionState, ScheduleState, SearchScope, SearchState};
use super::{meetings, reflection, schedule, search};

/// The result of one turn: bot messages to append to the transcript, and
/// the state that fully replaces the caller's stored state.
#[derive(Debug, Clone)]
pub struct DialogueTurn {
    pub messages: Vec<ChatMessage>,
    pub state: ConversationState,
}

impl DialogueTurn {
    /// A turn with a single bot message.
    pub fn bot(body: impl Into<String>, state: ConversationState) -> Self {
        Self {
            messages: vec![ChatMessage::bot(body)],
            state,
        }
    }
}

/// Stateful-conversation engine over a stateless core.
///
/// Holds only the store handle and display limits; all conversation
/// progress lives in the caller-owned `ConversationState`.
pub struct DialogueEngine {
    store: Arc<dyn DataStore>,
    config: EngineConfig,
}

impl DialogueEngine {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<dyn DataStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The greeting transcript shown before the first user turn.
    pub fn initial_messages(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::bot(replies::greeting())]
    }

    /// Process one user utterance.
    ///
    /// An active flow consumes the message unconditionally — intents are
    /// only evaluated from the idle state, so mid-flow commands like
    /// "cancel" are read as literal step input.
    pub async fn process_message(
        &self,
        message: &str,
        user_id: &str,
        state: ConversationState,
    ) -> DialogueTurn {
        let store = self.store.as_ref();
        match state {
            ConversationState::Idle => self.route_intent(message, user_id).await,
            ConversationState::ScheduleMeeting(s) => {
                schedule::handle(store, message, user_id, s).await
            }
            ConversationState::AddReflection(s) => {
                reflection::handle(store, message, user_id, s).await
            }
            ConversationState::Search(s) => {
                search::handle(store, &self.config, message, user_id, s).await
            }
            ConversationState::ViewMeetings(s) => meetings::handle(store, message, s).await,
            // Open extension point: selecting a search result has no
            // handler yet.
            ConversationState::ViewReflections(_) => DialogueTurn::bot(
                replies::reflection_selection_unavailable(),
                ConversationState::Idle,
            ),
        }
    }

    /// Classify a fresh message and either answer it or start a flow.
    async fn route_intent(&self, message: &str, user_id: &str) -> DialogueTurn {
        match intent::classify(message) {
            Intent::ScheduleMeeting => DialogueTurn::bot(
                replies::ask_meeting_name(),
                ConversationState::ScheduleMeeting(ScheduleState::start()),
            ),
            Intent::PerformanceMetrics => match self.store.performance_metrics(user_id).await {
                Ok(metrics) => {
                    DialogueTurn::bot(replies::metrics_summary(&metrics), ConversationState::Idle)
                }
                Err(e) => {
                    warn!("Failed to fetch performance metrics: {e}");
                    DialogueTurn::bot(replies::metrics_unavailable(), ConversationState::Idle)
                }
            },
            Intent::SearchReflections => DialogueTurn::bot(
                replies::search_keyword_prompt(),
                ConversationState::Search(SearchState {
                    scope: SearchScope::Reflections,
                }),
            ),
            Intent::SearchMenu => DialogueTurn::bot(
                replies::search_menu(),
                ConversationState::Search(SearchState {
                    scope: SearchScope::Menu,
                }),
            ),
            Intent::AddReflection => DialogueTurn::bot(
                replies::reflection_menu(),
                ConversationState::AddReflection(ReflectionState::start()),
            ),
            Intent::UpcomingMeetings => {
                meetings::list_upcoming(self.store.as_ref(), &self.config, user_id).await
            }
            Intent::Help => DialogueTurn::bot(replies::help_text(), ConversationState::Idle),
            Intent::Unknown => DialogueTurn::bot(replies::fallback(), ConversationState::Idle),
        }
    }
}

// Note: Engine-level behavior is covered by the scenario tests in
// tests/dialogue_flows.rs, which drive process_message end to end against
// a scriptable mock store. Flow internals are tested in their own modules.
