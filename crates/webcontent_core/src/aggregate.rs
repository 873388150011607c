use std::collections::BTreeMap;

use crate::{RefreshError, SourceKey};

/// Verdict of one aggregate fetch.
///
/// `AllSucceeded` holds the content of every requested source, cached or
/// freshly fetched. `AnyFailed` holds the first failure observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateResult {
    AllSucceeded(BTreeMap<SourceKey, String>),
    AnyFailed(RefreshError),
}

impl AggregateResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AggregateResult::AllSucceeded(_))
    }
}
