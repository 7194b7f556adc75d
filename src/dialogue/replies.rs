//! Bot copy and formatting helpers.
//!
//! Every user-visible utterance lives here so the flow handlers stay lean
//! and the wording can be reviewed in one place.

use chrono::{DateTime, NaiveDate, Utc};

use crate::store::{Meeting, Participant, PerformanceMetrics, Reflection, ReflectionKind};

use super::state::MeetingDraft;

// ── General ─────────────────────────────────────────────────────────

/// Greeting shown before the first user turn.
pub fn greeting() -> String {
    "Hi! I'm your peer-learning assistant. I can schedule meetings with your \
     peers, capture rose/thorn/bud reflections, search your past reflections, \
     show your upcoming meetings, and pull up your performance metrics. \
     What would you like to do?"
        .to_string()
}

/// Static capability summary for the help intent.
pub fn help_text() -> String {
    "Here's what I can help with:\n\
     - \"Schedule a meeting\" to set up a peer meeting step by step\n\
     - \"Add a reflection\" to capture a rose, thorn, or bud\n\
     - \"Search reflections\" to look through your past notes\n\
     - \"Show my meetings\" to see what's coming up\n\
     - \"Show my performance\" for your metrics snapshot"
        .to_string()
}

/// Fallback when no intent matches.
pub fn fallback() -> String {
    "Sorry, I didn't catch that. Try \"help\" to see what I can do.".to_string()
}

/// Recoverable lost-context reply (unknown or malformed state).
pub fn lost_context() -> String {
    "I lost track of where we were. Let's start over — what would you like to do?".to_string()
}

// ── Scheduling flow ─────────────────────────────────────────────────

pub fn ask_meeting_name() -> String {
    "Let's set up your meeting. What should it be called?".to_string()
}

pub fn ask_agenda() -> String {
    "Got it. What's the agenda?".to_string()
}

pub fn ask_links() -> String {
    "Any links or documents to attach? Type none if there aren't any.".to_string()
}

pub fn ask_date() -> String {
    "What date? Please use YYYY-MM-DD, for example 2025-09-30.".to_string()
}

pub fn invalid_date() -> String {
    "That doesn't look like a date I can use. Please enter it as YYYY-MM-DD, \
     for example 2025-09-30."
        .to_string()
}

pub fn ask_time() -> String {
    "What time? Please use 24-hour HH:MM, for example 14:30.".to_string()
}

pub fn invalid_time() -> String {
    "That doesn't look like a valid time. Please enter it as HH:MM in 24-hour \
     format, for example 14:30."
        .to_string()
}

pub fn ask_location() -> String {
    "Where will it take place? A room, an address, or a video link all work.".to_string()
}

pub fn ask_invite_buddy(buddy_name: &str) -> String {
    format!("Would you like to invite your buddy {buddy_name}? (yes/no)")
}

/// Confirmation summary before the create. `invite` is present only when
/// the buddy question was asked.
pub fn confirm_summary(draft: &MeetingDraft, invite: Option<(&str, bool)>) -> String {
    let links = match draft.links_documents.as_deref() {
        None | Some("") => "None".to_string(),
        Some(l) => l.to_string(),
    };
    let mut out = format!(
        "Here's what I have:\n\
         Name: {}\n\
         Agenda: {}\n\
         Links/Documents: {}\n\
         Date: {}\n\
         Time: {}\n\
         Location: {}",
        draft.name.as_deref().unwrap_or(""),
        draft.agenda.as_deref().unwrap_or(""),
        links,
        draft.date.as_deref().unwrap_or(""),
        draft.time.as_deref().unwrap_or(""),
        draft.location.as_deref().unwrap_or(""),
    );
    if let Some((buddy_name, yes)) = invite {
        out.push_str(&format!(
            "\nInvite {}: {}",
            buddy_name,
            if yes { "yes" } else { "no" }
        ));
    }
    out.push_str("\n\nShall I create this meeting? (yes/no)");
    out
}

pub fn meeting_created(name: &str) -> String {
    format!("Done! \"{name}\" is on the calendar. Anything else I can help with?")
}

pub fn schedule_discarded() -> String {
    "No problem, let's start over. Just say \"schedule a meeting\" whenever \
     you're ready."
        .to_string()
}

pub fn schedule_failed() -> String {
    "Sorry, I couldn't save the meeting just now. Nothing was created — \
     please try scheduling it again in a moment."
        .to_string()
}

// ── Reflection flow ─────────────────────────────────────────────────

pub fn reflection_menu() -> String {
    "What kind of reflection would you like to add?\n\
     1. Rose (a success)\n\
     2. Thorn (a challenge)\n\
     3. Bud (an opportunity)"
        .to_string()
}

pub fn reflection_invalid_choice() -> String {
    "Please pick one: 1 for a rose, 2 for a thorn, or 3 for a bud.".to_string()
}

pub fn reflection_content_prompt(kind: ReflectionKind) -> String {
    match kind {
        ReflectionKind::Rose => {
            "A rose — lovely. Tell me about the success you'd like to record.".to_string()
        }
        ReflectionKind::Thorn => {
            "A thorn, noted. What was the challenge you ran into?".to_string()
        }
        ReflectionKind::Bud => {
            "A bud — great. What opportunity do you see?".to_string()
        }
    }
}

pub fn reflection_saved(kind: ReflectionKind) -> String {
    format!("Thanks, your {kind} has been saved. Keep them coming!")
}

pub fn reflection_failed() -> String {
    "Sorry, I couldn't save that reflection. Please try adding it again in a \
     moment."
        .to_string()
}

// ── Search flow ─────────────────────────────────────────────────────

pub fn search_keyword_prompt() -> String {
    "Sure — what keyword should I look for in your reflections?".to_string()
}

pub fn search_menu() -> String {
    "What would you like to search?\n\
     1. Reflections\n\
     2. Resources\n\
     Or just type a keyword and I'll search your reflections."
        .to_string()
}

pub fn search_no_results(keyword: &str) -> String {
    format!(
        "I couldn't find any reflections mentioning \"{keyword}\". \
         Try a different term by asking me to search again."
    )
}

pub fn search_failed() -> String {
    "Sorry, the search didn't go through. Give me the keyword again and I'll \
     retry."
        .to_string()
}

/// Numbered search results. The count note appears when more matches exist
/// than are shown.
pub fn search_results(
    keyword: &str,
    shown: &[Reflection],
    total: usize,
    snippet_max_chars: usize,
) -> String {
    let mut out = if total > shown.len() {
        format!(
            "Found {total} reflections matching \"{keyword}\". Showing the first {}:",
            shown.len()
        )
    } else if total == 1 {
        format!("Found 1 reflection matching \"{keyword}\":")
    } else {
        format!("Found {total} reflections matching \"{keyword}\":")
    };
    for (i, reflection) in shown.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} ({}): {}",
            i + 1,
            reflection.kind.label().to_uppercase(),
            display_datetime(reflection.created_at),
            truncate_chars(&reflection.content, snippet_max_chars),
        ));
    }
    out
}

pub fn reflection_selection_unavailable() -> String {
    "Opening a reflection from chat isn't available yet — you can find the \
     full notes in your reflection journal. What else can I do for you?"
        .to_string()
}

// ── Metrics ─────────────────────────────────────────────────────────

pub fn metrics_summary(metrics: &PerformanceMetrics) -> String {
    format!(
        "Here's your performance snapshot:\n\
         - Applications handled: {}\n\
         - Average processing days: {:.1}\n\
         - Delayed applications: {}",
        metrics.applications_handled, metrics.process_days, metrics.delayed_applications,
    )
}

pub fn metrics_unavailable() -> String {
    "Sorry, I couldn't fetch your performance metrics right now. Please try \
     again in a moment."
        .to_string()
}

// ── Meetings ────────────────────────────────────────────────────────

pub fn no_upcoming_meetings() -> String {
    "You have no upcoming meetings. Say \"schedule a meeting\" to set one up."
        .to_string()
}

pub fn meetings_unavailable() -> String {
    "Sorry, I couldn't fetch your meetings right now. Please try again in a \
     moment."
        .to_string()
}

/// Numbered upcoming-meetings listing with a selection prompt.
pub fn upcoming_meetings_list(meetings: &[Meeting]) -> String {
    let mut out = String::from("Here are your upcoming meetings:");
    for (i, meeting) in meetings.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} on {} at {}",
            i + 1,
            meeting.name,
            display_date(&meeting.date),
            meeting.time,
        ));
    }
    out.push_str("\n\nReply with a number to see the details.");
    out
}

pub fn meeting_pick_invalid(count: usize) -> String {
    format!("Please reply with a number between 1 and {count}.")
}

/// Full meeting detail plus the follow-up menu.
pub fn meeting_detail(meeting: &Meeting, participants: &[Participant]) -> String {
    let mut out = format!(
        "Here are the details for \"{}\":\n\
         Date: {}\n\
         Time: {}\n\
         Location: {}\n\
         Agenda: {}",
        meeting.name,
        display_date(&meeting.date),
        meeting.time,
        meeting.location,
        meeting.agenda,
    );
    if !meeting.links_documents.is_empty() {
        out.push_str(&format!("\nLinks/Documents: {}", meeting.links_documents));
    }
    if !participants.is_empty() {
        out.push_str("\nParticipants:");
        for p in participants {
            out.push_str(&format!("\n- {} ({})", p.name, p.status));
        }
    }
    out.push_str(
        "\n\nWhat would you like to do?\n\
         1. Reschedule\n\
         2. Cancel\n\
         3. Go back",
    );
    out
}

pub fn meeting_actions_unavailable() -> String {
    "Rescheduling and cancelling from chat aren't available yet — please use \
     the meetings page for that. What else can I do for you?"
        .to_string()
}

pub fn meeting_detail_unavailable() -> String {
    "Sorry, I couldn't load that meeting's details. Please ask for your \
     meetings again."
        .to_string()
}

// ── Formatting helpers ──────────────────────────────────────────────

/// Truncate to `max_chars` characters, appending "..." when shortened.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }
}

/// Render a stored `YYYY-MM-DD` date for display (M/D/YYYY). Dates that
/// pass the pattern check but aren't calendar dates fall back to the raw
/// string.
pub fn display_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Render a timestamp's date portion for display (M/D/YYYY).
pub fn display_datetime(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}
