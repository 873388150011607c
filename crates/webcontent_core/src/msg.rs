#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a refresh cycle.
    TriggerClicked,
    /// The aggregate fetch issued for `cycle` resolved.
    RefreshCompleted {
        cycle: u64,
        result: crate::AggregateResult,
    },
}
