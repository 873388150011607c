use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TriggerClicked => {
            // Overlapping cycles would race on the published results, so a
            // trigger while loading is dropped.
            if state.is_busy() {
                return (state, Vec::new());
            }
            let (cycle, sources) = state.begin_refresh();
            vec![Effect::Refresh { cycle, sources }]
        }
        Msg::RefreshCompleted { cycle, result } => {
            if state.is_busy() && state.cycle() == cycle {
                state.finish_refresh(result);
            }
            Vec::new()
        }
    };

    (state, effects)
}
