//! Webcontent engine: fetching, caching, aggregation and the session
//! coordinator that drives the core state machine.
mod aggregator;
mod cache;
mod decode;
mod fetch;
mod session;
mod types;

pub use aggregator::{ContentAggregator, FetchOutcome};
pub use cache::ContentCache;
pub use decode::{decode_text, DecodeError, DecodedText};
pub use fetch::{ContentFetcher, FetchSettings, ReqwestFetcher};
pub use session::{SessionHandle, SessionObserver, Subscription};
pub use types::{FailureKind, FetchError};
