#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch (or reuse cached content for) every source, then report back
    /// with `Msg::RefreshCompleted` carrying the same cycle.
    Refresh {
        cycle: u64,
        sources: Vec<crate::Source>,
    },
}
