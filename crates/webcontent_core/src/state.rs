use crate::transform::{every_nth_character, word_counter};
use crate::view_model::SessionView;
use crate::{AggregateResult, RefreshError, SessionConfig, Source, Transform};

/// Lifecycle of the session. `busy` is `Loading`; `failed` is tracked as its
/// own flag because a content-unavailable guard can raise it outside a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: SessionConfig,
    phase: Phase,
    failed: bool,
    word_counter_words: Option<Vec<String>>,
    every_nth_sequence: Option<Vec<String>>,
    last_error: Option<RefreshError>,
    cycle: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            busy: self.is_busy(),
            failed: self.failed,
            word_counter_result: self.word_counter_words.clone(),
            every_nth_result: self.every_nth_sequence.clone(),
            nth: self.config.nth,
            cycle: self.cycle,
            last_error: self.last_error.clone(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Current refresh cycle; increments on every accepted trigger.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Publishes the word tokens of `content`, or raises the
    /// content-unavailable condition when there is nothing to count.
    pub fn apply_word_counter(&mut self, content: Option<&str>) {
        match content {
            Some(content) => self.word_counter_words = Some(word_counter(content)),
            None => self.content_unavailable(Transform::WordCounter),
        }
        self.dirty = true;
    }

    /// Publishes the every-Nth characters of `content`. The sequence is
    /// recomputed from scratch; nothing carries over from earlier cycles.
    pub fn apply_every_nth(&mut self, content: Option<&str>) {
        match content {
            Some(content) => {
                self.every_nth_sequence = Some(every_nth_character(content, self.config.nth))
            }
            None => self.content_unavailable(Transform::EveryNth),
        }
        self.dirty = true;
    }

    pub(crate) fn begin_refresh(&mut self) -> (u64, Vec<Source>) {
        self.cycle += 1;
        self.phase = Phase::Loading;
        self.failed = false;
        self.last_error = None;
        self.dirty = true;
        (self.cycle, self.config.sources())
    }

    pub(crate) fn finish_refresh(&mut self, result: AggregateResult) {
        match result {
            AggregateResult::AllSucceeded(contents) => {
                let word_counter_key = Transform::WordCounter.key();
                let every_nth_key = Transform::EveryNth.key();
                self.apply_word_counter(contents.get(&word_counter_key).map(String::as_str));
                self.apply_every_nth(contents.get(&every_nth_key).map(String::as_str));
            }
            AggregateResult::AnyFailed(err) => {
                // Previously published results stay as they were.
                self.failed = true;
                self.last_error = Some(err);
            }
        }
        self.phase = if self.failed {
            Phase::Failed
        } else {
            Phase::Succeeded
        };
        self.dirty = true;
    }

    fn content_unavailable(&mut self, transform: Transform) {
        self.failed = true;
        if self.last_error.is_none() {
            self.last_error = Some(RefreshError::ContentUnavailable { transform });
        }
    }
}
