//! Rose/thorn/bud reflection flow — two steps: pick a kind, then capture
//! the narrative.

use tracing::{debug, warn};

use crate::store::{DataStore, ReflectionKind};

use super::engine::DialogueTurn;
use super::replies;
use super::state::{ConversationState, ReflectionState, ReflectionStep};

/// Interpret a kind choice: the numeric literals 1/2/3, or a substring
/// match on the kind's name or plain-language synonym. First matching kind
/// wins; nothing recognized means re-prompt.
pub(crate) fn parse_kind(input: &str) -> Option<ReflectionKind> {
    match input.trim() {
        "1" => return Some(ReflectionKind::Rose),
        "2" => return Some(ReflectionKind::Thorn),
        "3" => return Some(ReflectionKind::Bud),
        _ => {}
    }
    let lower = input.to_lowercase();
    if lower.contains("rose") || lower.contains("success") {
        Some(ReflectionKind::Rose)
    } else if lower.contains("thorn") || lower.contains("challenge") {
        Some(ReflectionKind::Thorn)
    } else if lower.contains("bud") || lower.contains("opportunity") {
        Some(ReflectionKind::Bud)
    } else {
        None
    }
}

/// Handle one turn of the reflection flow.
pub(crate) async fn handle(
    store: &dyn DataStore,
    message: &str,
    user_id: &str,
    state: ReflectionState,
) -> DialogueTurn {
    match state.step {
        ReflectionStep::ChooseKind => match parse_kind(message) {
            Some(kind) => DialogueTurn::bot(
                replies::reflection_content_prompt(kind),
                ConversationState::AddReflection(ReflectionState {
                    step: ReflectionStep::Content,
                    kind: Some(kind),
                }),
            ),
            None => DialogueTurn::bot(
                replies::reflection_invalid_choice(),
                ConversationState::AddReflection(state),
            ),
        },
        ReflectionStep::Content => {
            let Some(kind) = state.kind else {
                // Unreachable through normal transitions; a tampered state
                // blob is treated as lost context.
                warn!("Reflection content step reached without a kind");
                return DialogueTurn::bot(replies::lost_context(), ConversationState::Idle);
            };
            // The whole message is the reflection, verbatim.
            match store.create_reflection(kind, message, user_id).await {
                Ok(created) => {
                    debug!(user_id = %user_id, reflection_id = %created.id, kind = %kind, "Reflection captured via chat");
                    DialogueTurn::bot(replies::reflection_saved(kind), ConversationState::Idle)
                }
                Err(e) => {
                    warn!("Failed to save reflection: {e}");
                    DialogueTurn::bot(replies::reflection_failed(), ConversationState::Idle)
                }
            }
        }
    }
}
