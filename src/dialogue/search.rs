//! Reflection search flow — single step: the whole message is the keyword.
//!
//! Search is single-shot: a hit list or a miss both end the flow (hits hand
//! off to the view-reflections extension point). Only a store failure keeps
//! the step alive so the keyword can be retried.

use tracing::warn;

use crate::config::EngineConfig;
use crate::store::DataStore;

use super::engine::DialogueTurn;
use super::message::{ChatMessage, MessageMeta};
use super::replies;
use super::state::{ConversationState, SearchState, ViewReflectionsState};

/// Handle one turn of the search flow.
pub(crate) async fn handle(
    store: &dyn DataStore,
    config: &EngineConfig,
    message: &str,
    user_id: &str,
    state: SearchState,
) -> DialogueTurn {
    let keyword = message.trim();
    if keyword.is_empty() {
        return DialogueTurn::bot(
            replies::search_keyword_prompt(),
            ConversationState::Search(state),
        );
    }

    match store.search_reflections(keyword, user_id).await {
        Err(e) => {
            warn!("Reflection search failed: {e}");
            // Keep the step so the user can retry the same keyword.
            DialogueTurn::bot(replies::search_failed(), ConversationState::Search(state))
        }
        Ok(results) if results.is_empty() => DialogueTurn::bot(
            replies::search_no_results(keyword),
            ConversationState::Idle,
        ),
        Ok(mut results) => {
            let total = results.len();
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            results.truncate(config.search_results_limit);

            let body =
                replies::search_results(keyword, &results, total, config.snippet_max_chars);
            let reply = ChatMessage::bot_with_meta(
                body,
                MessageMeta::Reflections {
                    reflections: results.clone(),
                },
            );
            DialogueTurn {
                messages: vec![reply],
                state: ConversationState::ViewReflections(ViewReflectionsState {
                    reflections: results,
                }),
            }
        }
    }
}
