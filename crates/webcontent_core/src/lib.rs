//! Webcontent core: pure data model, transforms and the session state machine.
mod aggregate;
mod effect;
mod error;
mod msg;
mod source;
mod state;
pub mod transform;
mod update;
mod view_model;

pub use aggregate::AggregateResult;
pub use effect::Effect;
pub use error::RefreshError;
pub use msg::Msg;
pub use source::{SessionConfig, Source, SourceKey, Transform, DEFAULT_CONTENT_URL};
pub use state::{AppState, Phase};
pub use transform::{every_nth_character, format_every_nth, word_counter, DEFAULT_NTH};
pub use update::update;
pub use view_model::SessionView;
