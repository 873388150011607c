use std::collections::BTreeMap;
use std::sync::Once;

use pretty_assertions::assert_eq;
use webcontent_core::{
    update, AggregateResult, AppState, Effect, Msg, Phase, RefreshError, SessionConfig, Source,
    SourceKey, Transform,
};

const SAMPLE: &str = "<p> Compass Hello World </p>";

fn clusters(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn trigger(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::TriggerClicked);
    let cycle = match effects.as_slice() {
        [Effect::Refresh { cycle, .. }] => *cycle,
        other => panic!("expected one refresh effect, got {other:?}"),
    };
    (state, cycle)
}

fn all_succeeded(word_counter: &str, every_nth: &str) -> AggregateResult {
    let mut contents = BTreeMap::new();
    contents.insert(Transform::WordCounter.key(), word_counter.to_string());
    contents.insert(Transform::EveryNth.key(), every_nth.to_string());
    AggregateResult::AllSucceeded(contents)
}

fn invalid_url() -> AggregateResult {
    AggregateResult::AnyFailed(RefreshError::InvalidUrl {
        key: Transform::EveryNth.key(),
        value: String::new(),
    })
}

#[test]
fn new_state_is_idle_with_no_results() {
    init_logging();
    let view = AppState::new().view();

    assert_eq!(view.phase, Phase::Idle);
    assert!(!view.busy);
    assert!(!view.failed);
    assert_eq!(view.word_counter_result, None);
    assert_eq!(view.every_nth_result, None);
}

#[test]
fn trigger_enters_loading_and_requests_both_sources() {
    init_logging();
    let config = SessionConfig {
        word_counter_url: "https://a.example.com".to_string(),
        every_nth_url: "https://b.example.com".to_string(),
        nth: 10,
    };
    let (mut next, effects) = update(AppState::with_config(config), Msg::TriggerClicked);

    assert!(next.view().busy);
    assert_eq!(next.phase(), Phase::Loading);
    assert!(next.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::Refresh {
            cycle: 1,
            sources: vec![
                Source::new("wordCounter", "https://a.example.com"),
                Source::new("everyNth", "https://b.example.com"),
            ],
        }]
    );
}

#[test]
fn trigger_while_loading_is_rejected() {
    init_logging();
    let (mut state, _cycle) = trigger(AppState::new());
    assert!(state.consume_dirty());

    let (mut next, effects) = update(state, Msg::TriggerClicked);

    assert!(effects.is_empty());
    assert_eq!(next.cycle(), 1);
    assert!(next.view().busy);
    assert!(!next.consume_dirty());
}

#[test]
fn success_publishes_both_results_together() {
    init_logging();
    let (state, cycle) = trigger(AppState::new());
    let (mut next, effects) = update(
        state,
        Msg::RefreshCompleted {
            cycle,
            result: all_succeeded(SAMPLE, SAMPLE),
        },
    );
    let view = next.view();

    assert!(effects.is_empty());
    assert_eq!(view.phase, Phase::Succeeded);
    assert!(!view.busy);
    assert!(!view.failed);
    assert_eq!(view.word_count(), Some(5));
    assert_eq!(view.every_nth_result, Some(clusters(&["s", "r"])));
    assert_eq!(view.every_nth_text().as_deref(), Some("s r"));
    assert!(next.consume_dirty());
}

#[test]
fn failure_sets_flag_and_leaves_results_absent() {
    init_logging();
    let (state, cycle) = trigger(AppState::new());
    let (next, _effects) = update(
        state,
        Msg::RefreshCompleted {
            cycle,
            result: invalid_url(),
        },
    );
    let view = next.view();

    assert_eq!(view.phase, Phase::Failed);
    assert!(!view.busy);
    assert!(view.failed);
    assert_eq!(view.word_counter_result, None);
    assert_eq!(view.every_nth_result, None);
    assert_eq!(
        view.last_error.as_ref().and_then(RefreshError::key),
        Some(&SourceKey::new("everyNth"))
    );
}

#[test]
fn failure_keeps_stale_results() {
    init_logging();
    let (state, cycle) = trigger(AppState::new());
    let (state, _) = update(
        state,
        Msg::RefreshCompleted {
            cycle,
            result: all_succeeded(SAMPLE, SAMPLE),
        },
    );

    let (state, cycle) = trigger(state);
    assert!(!state.view().failed);
    let (next, _) = update(
        state,
        Msg::RefreshCompleted {
            cycle,
            result: AggregateResult::AnyFailed(RefreshError::TransportFailure {
                key: Transform::WordCounter.key(),
                description: "http status 500".to_string(),
            }),
        },
    );
    let view = next.view();

    assert!(view.failed);
    assert_eq!(view.word_count(), Some(5));
    assert_eq!(view.every_nth_result, Some(clusters(&["s", "r"])));
}

#[test]
fn retrigger_after_failure_clears_failed_flag() {
    init_logging();
    let (state, cycle) = trigger(AppState::new());
    let (state, _) = update(
        state,
        Msg::RefreshCompleted {
            cycle,
            result: invalid_url(),
        },
    );
    assert!(state.view().failed);

    let (state, cycle) = trigger(state);
    let view = state.view();
    assert_eq!(cycle, 2);
    assert!(view.busy);
    assert!(!view.failed);
    assert_eq!(view.last_error, None);
}

#[test]
fn stale_completion_is_ignored() {
    init_logging();
    let (state, _cycle) = trigger(AppState::new());
    let before = state.view();

    let (next, effects) = update(
        state,
        Msg::RefreshCompleted {
            cycle: 42,
            result: all_succeeded(SAMPLE, SAMPLE),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(next.view(), before);
}

#[test]
fn completion_without_trigger_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (next, _) = update(
        state.clone(),
        Msg::RefreshCompleted {
            cycle: 0,
            result: all_succeeded(SAMPLE, SAMPLE),
        },
    );
    assert_eq!(next, state);
}

#[test]
fn each_transform_reads_its_own_source() {
    init_logging();
    let (state, cycle) = trigger(AppState::new());
    let (next, _) = update(
        state,
        Msg::RefreshCompleted {
            cycle,
            result: all_succeeded("one two three", "0123456789A123456789B"),
        },
    );
    let view = next.view();

    assert_eq!(view.word_count(), Some(3));
    assert_eq!(view.every_nth_result, Some(clusters(&["A", "B"])));
}
