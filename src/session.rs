use crate::capabilities::RepositorySummary;

/// Per-conversation memory: the most recent search results, so that
/// "download the second one" has something to refer to.
///
/// Written only by a successful search, read only by download resolution.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    last_search_results: Vec<RepositorySummary>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the previous result set, even with an empty one.
    pub fn record_search(&mut self, results: Vec<RepositorySummary>) {
        self.last_search_results = results;
    }

    pub fn last_search_results(&self) -> &[RepositorySummary] {
        &self.last_search_results
    }

    pub fn has_results(&self) -> bool {
        !self.last_search_results.is_empty()
    }
}
