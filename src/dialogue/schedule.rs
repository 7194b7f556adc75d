//! Meeting scheduling flow — eight slot-filling steps with one branch.
//!
//! Name → agenda → links → date → time → location → (invite buddy, if one
//! exists) → confirm. Date and time are validated by pattern only at their
//! own steps and never re-checked later.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{DataStore, NewMeeting};

use super::engine::DialogueTurn;
use super::replies;
use super::state::{ConversationState, ScheduleState, ScheduleStep};

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap())
}

/// Pattern-only date check: four digits, dash, two, dash, two. No calendar
/// validity beyond the shape.
pub(crate) fn is_valid_date(input: &str) -> bool {
    date_re().is_match(input)
}

/// `HH:MM` with HH in 00–23 and MM in 00–59.
pub(crate) fn is_valid_time(input: &str) -> bool {
    time_re().is_match(input)
}

/// The literal input `none` (exact case) means "no links"; anything else is
/// stored verbatim.
pub(crate) fn normalize_links(input: &str) -> String {
    if input == "none" {
        String::new()
    } else {
        input.to_string()
    }
}

/// Exact case-insensitive `yes` is true; anything else is false.
pub(crate) fn parse_yes(input: &str) -> bool {
    input.eq_ignore_ascii_case("yes")
}

/// Handle one turn of the scheduling flow.
pub(crate) async fn handle(
    store: &dyn DataStore,
    message: &str,
    user_id: &str,
    mut state: ScheduleState,
) -> DialogueTurn {
    let input = message.trim();

    match state.step {
        ScheduleStep::Name => {
            if input.is_empty() {
                return stay(replies::ask_meeting_name(), state);
            }
            state.draft.name = Some(input.to_string());
            state.step = ScheduleStep::Agenda;
            stay(replies::ask_agenda(), state)
        }
        ScheduleStep::Agenda => {
            if input.is_empty() {
                return stay(replies::ask_agenda(), state);
            }
            state.draft.agenda = Some(input.to_string());
            state.step = ScheduleStep::Links;
            stay(replies::ask_links(), state)
        }
        ScheduleStep::Links => {
            if input.is_empty() {
                return stay(replies::ask_links(), state);
            }
            state.draft.links_documents = Some(normalize_links(input));
            state.step = ScheduleStep::Date;
            stay(replies::ask_date(), state)
        }
        ScheduleStep::Date => {
            if !is_valid_date(input) {
                return stay(replies::invalid_date(), state);
            }
            state.draft.date = Some(input.to_string());
            state.step = ScheduleStep::Time;
            stay(replies::ask_time(), state)
        }
        ScheduleStep::Time => {
            if !is_valid_time(input) {
                return stay(replies::invalid_time(), state);
            }
            state.draft.time = Some(input.to_string());
            state.step = ScheduleStep::Location;
            stay(replies::ask_location(), state)
        }
        ScheduleStep::Location => {
            if input.is_empty() {
                return stay(replies::ask_location(), state);
            }
            state.draft.location = Some(input.to_string());

            // A lookup failure is treated the same as having no buddy: the
            // invite question is simply skipped.
            match store.buddy_pair(user_id).await {
                Ok(Some(pair)) => {
                    let question = replies::ask_invite_buddy(&pair.buddy_name);
                    state.buddy = Some(pair);
                    state.step = ScheduleStep::InviteBuddy;
                    stay(question, state)
                }
                Ok(None) => {
                    state.step = ScheduleStep::Confirm;
                    let summary = replies::confirm_summary(&state.draft, None);
                    stay(summary, state)
                }
                Err(e) => {
                    warn!("Buddy lookup failed, skipping invite step: {e}");
                    state.step = ScheduleStep::Confirm;
                    let summary = replies::confirm_summary(&state.draft, None);
                    stay(summary, state)
                }
            }
        }
        ScheduleStep::InviteBuddy => {
            state.invite_buddy = parse_yes(input);
            state.step = ScheduleStep::Confirm;
            let buddy_name = state
                .buddy
                .as_ref()
                .map(|b| b.buddy_name.clone())
                .unwrap_or_default();
            let summary = replies::confirm_summary(
                &state.draft,
                Some((buddy_name.as_str(), state.invite_buddy)),
            );
            stay(summary, state)
        }
        ScheduleStep::Confirm => {
            if !parse_yes(input) {
                // Anything but yes discards the draft entirely.
                return DialogueTurn::bot(replies::schedule_discarded(), ConversationState::Idle);
            }
            match commit(store, user_id, &state).await {
                Ok(name) => {
                    debug!(user_id = %user_id, meeting = %name, "Meeting scheduled via chat");
                    DialogueTurn::bot(replies::meeting_created(&name), ConversationState::Idle)
                }
                Err(e) => {
                    warn!("Failed to create meeting: {e}");
                    DialogueTurn::bot(replies::schedule_failed(), ConversationState::Idle)
                }
            }
        }
    }
}

fn stay(body: String, state: ScheduleState) -> DialogueTurn {
    DialogueTurn::bot(body, ConversationState::ScheduleMeeting(state))
}

/// Create the meeting and, if requested, register the buddy. All-or-nothing
/// from the user's perspective: any failure yields the apology and discards
/// the draft.
async fn commit(
    store: &dyn DataStore,
    user_id: &str,
    state: &ScheduleState,
) -> Result<String, StoreError> {
    let draft = &state.draft;
    let meeting = store
        .create_meeting(&NewMeeting {
            name: draft.name.clone().unwrap_or_default(),
            agenda: draft.agenda.clone().unwrap_or_default(),
            links_documents: draft.links_documents.clone().unwrap_or_default(),
            date: draft.date.clone().unwrap_or_default(),
            time: draft.time.clone().unwrap_or_default(),
            location: draft.location.clone().unwrap_or_default(),
            created_by: user_id.to_string(),
        })
        .await?;

    if state.invite_buddy {
        if let Some(buddy) = &state.buddy {
            store
                .add_meeting_participant(meeting.id, &buddy.buddy_id)
                .await?;
        }
    }
    Ok(meeting.name)
}
