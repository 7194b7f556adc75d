//! Configuration types.

/// Dialogue engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum upcoming meetings listed by the meetings intent.
    pub upcoming_meetings_limit: usize,
    /// Maximum reflection search results shown per query.
    pub search_results_limit: usize,
    /// Maximum characters of reflection content shown in a result snippet.
    pub snippet_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upcoming_meetings_limit: 3,
            search_results_limit: 5,
            snippet_max_chars: 100,
        }
    }
}
