//! Upcoming-meetings lookup flow — list, pick by number, show detail.
//!
//! The follow-up menu (reschedule/cancel/back) has no handler; picking from
//! it gets an explicit not-available reply and resets the conversation.

use chrono::Utc;
use tracing::warn;

use crate::config::EngineConfig;
use crate::store::{DataStore, Meeting};

use super::engine::DialogueTurn;
use super::message::{ChatMessage, MessageMeta};
use super::replies;
use super::state::{ConversationState, ViewMeetingsState, ViewMeetingsStep};

/// Filter to future, non-cancelled meetings, date-ascending, capped.
///
/// `today` is an ISO `YYYY-MM-DD` string; ISO dates compare
/// chronologically as plain strings, which also keeps pattern-valid but
/// non-calendar dates from panicking a parser.
pub(crate) fn upcoming(mut meetings: Vec<Meeting>, today: &str, limit: usize) -> Vec<Meeting> {
    meetings.retain(|m| !m.cancelled && m.date.as_str() >= today);
    meetings.sort_by(|a, b| (a.date.as_str(), a.time.as_str()).cmp(&(b.date.as_str(), b.time.as_str())));
    meetings.truncate(limit);
    meetings
}

/// The meetings intent: list upcoming meetings and open the selection step
/// when there is anything to select.
pub(crate) async fn list_upcoming(
    store: &dyn DataStore,
    config: &EngineConfig,
    user_id: &str,
) -> DialogueTurn {
    let all = match store.meetings_for_user(user_id).await {
        Ok(meetings) => meetings,
        Err(e) => {
            warn!("Failed to fetch meetings: {e}");
            return DialogueTurn::bot(replies::meetings_unavailable(), ConversationState::Idle);
        }
    };

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let meetings = upcoming(all, &today, config.upcoming_meetings_limit);
    if meetings.is_empty() {
        return DialogueTurn::bot(replies::no_upcoming_meetings(), ConversationState::Idle);
    }

    let body = replies::upcoming_meetings_list(&meetings);
    let message = ChatMessage::bot_with_meta(
        body,
        MessageMeta::Meetings {
            meetings: meetings.clone(),
        },
    );
    DialogueTurn {
        messages: vec![message],
        state: ConversationState::ViewMeetings(ViewMeetingsState {
            step: ViewMeetingsStep::Select,
            meetings,
            selected: None,
        }),
    }
}

/// Handle one turn of the view-meetings flow.
pub(crate) async fn handle(
    store: &dyn DataStore,
    message: &str,
    mut state: ViewMeetingsState,
) -> DialogueTurn {
    match state.step {
        ViewMeetingsStep::Select => {
            let count = state.meetings.len();
            let pick = message
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=count).contains(n));
            let Some(n) = pick else {
                return DialogueTurn::bot(
                    replies::meeting_pick_invalid(count),
                    ConversationState::ViewMeetings(state),
                );
            };

            let meeting = state.meetings[n - 1].clone();
            match store.meeting_participants(meeting.id).await {
                Ok(participants) => {
                    let body = replies::meeting_detail(&meeting, &participants);
                    state.selected = Some(meeting);
                    state.step = ViewMeetingsStep::Menu;
                    DialogueTurn::bot(body, ConversationState::ViewMeetings(state))
                }
                Err(e) => {
                    warn!("Failed to fetch participants: {e}");
                    DialogueTurn::bot(
                        replies::meeting_detail_unavailable(),
                        ConversationState::Idle,
                    )
                }
            }
        }
        // Open extension point: no reschedule/cancel handler exists yet.
        ViewMeetingsStep::Menu => DialogueTurn::bot(
            replies::meeting_actions_unavailable(),
            ConversationState::Idle,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn meeting(name: &str, date: &str, time: &str, cancelled: bool) -> Meeting {
        Meeting {
            id: Uuid::new_v4(),
            name: name.into(),
            agenda: String::new(),
            links_documents: String::new(),
            date: date.into(),
            time: time.into(),
            location: "Online".into(),
            created_by: "officer-1".into(),
            cancelled,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn drops_past_and_cancelled() {
        let meetings = vec![
            meeting("past", "2025-01-01", "10:00", false),
            meeting("cancelled", "2025-12-01", "10:00", true),
            meeting("kept", "2025-12-02", "10:00", false),
        ];
        let out = upcoming(meetings, "2025-06-15", 3);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "kept");
    }

    #[test]
    fn today_counts_as_upcoming() {
        let meetings = vec![meeting("today", "2025-06-15", "09:00", false)];
        assert_eq!(upcoming(meetings, "2025-06-15", 3).len(), 1);
    }

    #[test]
    fn sorted_ascending_and_capped() {
        let meetings = vec![
            meeting("d", "2025-09-04", "10:00", false),
            meeting("b", "2025-09-02", "10:00", false),
            meeting("a", "2025-09-01", "10:00", false),
            meeting("c", "2025-09-03", "10:00", false),
        ];
        let out = upcoming(meetings, "2025-06-15", 3);
        let names: Vec<_> = out.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn same_day_sorted_by_time() {
        let meetings = vec![
            meeting("later", "2025-09-01", "15:00", false),
            meeting("earlier", "2025-09-01", "08:30", false),
        ];
        let out = upcoming(meetings, "2025-06-15", 3);
        assert_eq!(out[0].name, "earlier");
    }

    #[test]
    fn non_calendar_date_does_not_panic() {
        let meetings = vec![meeting("odd", "2025-02-30", "10:00", false)];
        // String comparison handles it: 2025-02-30 is before 2025-06-15.
        assert!(upcoming(meetings, "2025-06-15", 3).is_empty());
    }
}
