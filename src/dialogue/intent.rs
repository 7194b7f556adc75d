//! Intent classification for fresh (no active flow) messages.
//!
//! An ordered list of case-insensitive substring predicates, first match
//! wins. The ordering is load-bearing: predicates overlap ("search
//! reflection" matches both the reflections-search and generic-search
//! rules), so this is a precedence list, not a scored classifier.

/// The single-turn classification of a fresh message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the meeting scheduling flow.
    ScheduleMeeting,
    /// Fetch and show performance metrics.
    PerformanceMetrics,
    /// Start a reflections search (keyword prompt).
    SearchReflections,
    /// Start the generic search menu.
    SearchMenu,
    /// Start the rose/thorn/bud reflection flow.
    AddReflection,
    /// List upcoming meetings.
    UpcomingMeetings,
    /// Static capability summary.
    Help,
    /// No predicate matched.
    Unknown,
}

/// Classify a message. Matching is case-insensitive substring containment.
pub fn classify(message: &str) -> Intent {
    let m = message.to_lowercase();

    if m.contains("schedule") && m.contains("meeting") {
        return Intent::ScheduleMeeting;
    }
    if m.contains("performance") || m.contains("metrics") {
        return Intent::PerformanceMetrics;
    }
    if m.contains("search") && m.contains("reflection") {
        return Intent::SearchReflections;
    }
    if m.contains("search") || m.contains("find") {
        return Intent::SearchMenu;
    }
    if ["reflection", "rose", "thorn", "bud"]
        .iter()
        .any(|k| m.contains(k))
    {
        return Intent::AddReflection;
    }
    if m.contains("meetings") || m.contains("upcoming") {
        return Intent::UpcomingMeetings;
    }
    if m.contains("help") {
        return Intent::Help;
    }
    Intent::Unknown
}
