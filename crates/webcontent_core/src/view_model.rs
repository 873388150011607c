use crate::transform::format_every_nth;
use crate::{Phase, RefreshError};

/// Snapshot handed to observers. Built in one piece from `AppState`, so both
/// derived results always come from the same transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub phase: Phase,
    pub busy: bool,
    pub failed: bool,
    pub word_counter_result: Option<Vec<String>>,
    pub every_nth_result: Option<Vec<String>>,
    pub nth: usize,
    pub cycle: u64,
    pub last_error: Option<RefreshError>,
}

impl SessionView {
    /// Number of word tokens, the figure shown to users.
    pub fn word_count(&self) -> Option<usize> {
        self.word_counter_result.as_ref().map(Vec::len)
    }

    pub fn every_nth_text(&self) -> Option<String> {
        self.every_nth_result.as_deref().map(format_every_nth)
    }
}
