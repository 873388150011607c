use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use engine_logging::{engine_debug, engine_error, engine_info};
use webcontent_core::{update, AggregateResult, AppState, Effect, Msg, SessionConfig, SessionView};

use crate::{ContentAggregator, ContentFetcher};

/// Receives a full snapshot after every state transition, on the
/// coordination thread.
pub trait SessionObserver: Send {
    fn on_change(&self, view: &SessionView);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionView) + Send,
{
    fn on_change(&self, view: &SessionView) {
        self(view)
    }
}

enum SessionCommand {
    Trigger,
    Completed {
        cycle: u64,
        result: AggregateResult,
    },
    Subscribe {
        id: u64,
        observer: Box<dyn SessionObserver>,
    },
    Unsubscribe {
        id: u64,
    },
    Snapshot {
        reply: mpsc::Sender<SessionView>,
    },
    Shutdown,
}

/// Entry point to a session. Cheap to clone and usable from any thread;
/// all work is forwarded to one coordination thread that owns the state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    cmd_tx: mpsc::Sender<SessionCommand>,
    next_subscription: AtomicU64,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(SessionCommand::Shutdown);
    }
}

impl SessionHandle {
    pub fn new(config: SessionConfig, fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::with_aggregator(config, Arc::new(ContentAggregator::new(fetcher)))
    }

    /// Builds a session around an existing aggregator, sharing its cache.
    pub fn with_aggregator(config: SessionConfig, aggregator: Arc<ContentAggregator>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let loop_tx = cmd_tx.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start fetch runtime: {}", err);
                    return;
                }
            };
            let mut coordinator = Coordinator {
                state: AppState::with_config(config),
                observers: Vec::new(),
                aggregator,
                cmd_tx: loop_tx,
                runtime,
            };
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, SessionCommand::Shutdown) {
                    break;
                }
                coordinator.handle(command);
            }
            engine_debug!("Session coordinator stopped");
        });

        Self {
            inner: Arc::new(HandleInner {
                cmd_tx,
                next_subscription: AtomicU64::new(1),
            }),
        }
    }

    /// Starts a refresh cycle. Ignored while one is already running.
    pub fn trigger(&self) {
        if self.inner.cmd_tx.send(SessionCommand::Trigger).is_err() {
            engine_error!("Trigger dropped: session coordinator is not running");
        }
    }

    /// Registers `observer`. It is called once right away with the current
    /// state, then after every transition until the subscription is dropped.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: SessionObserver + 'static,
    {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        let _ = self.inner.cmd_tx.send(SessionCommand::Subscribe {
            id,
            observer: Box::new(observer),
        });
        Subscription {
            id,
            cmd_tx: self.inner.cmd_tx.clone(),
        }
    }

    /// Current state, or `None` if the coordination thread is gone.
    pub fn snapshot(&self) -> Option<SessionView> {
        let (reply, rx) = mpsc::channel();
        self.inner
            .cmd_tx
            .send(SessionCommand::Snapshot { reply })
            .ok()?;
        rx.recv().ok()
    }

    /// Blocks until the session is not busy, or `timeout` elapses.
    ///
    /// Commands are processed in order, so a `trigger()` issued earlier from
    /// this thread is always observed before the wait starts.
    pub fn wait_until_idle(&self, timeout: Duration) -> Option<SessionView> {
        let deadline = Instant::now() + timeout;
        let (tx, rx) = mpsc::channel();
        let _subscription = self.subscribe(move |view: &SessionView| {
            let _ = tx.send(view.clone());
        });
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let view = rx.recv_timeout(remaining).ok()?;
            if !view.busy {
                return Some(view);
            }
        }
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    cmd_tx: mpsc::Sender<SessionCommand>,
}

impl Subscription {
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(SessionCommand::Unsubscribe { id: self.id });
    }
}

struct Coordinator {
    state: AppState,
    observers: Vec<(u64, Box<dyn SessionObserver>)>,
    aggregator: Arc<ContentAggregator>,
    cmd_tx: mpsc::Sender<SessionCommand>,
    runtime: tokio::runtime::Runtime,
}

impl Coordinator {
    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Trigger => {
                let effects = self.dispatch(Msg::TriggerClicked);
                if effects.is_empty() {
                    engine_info!("Trigger ignored: refresh already in progress");
                }
                self.run_effects(effects);
            }
            SessionCommand::Completed { cycle, result } => {
                engine_info!(
                    "Refresh cycle {} finished: {}",
                    cycle,
                    if result.is_success() { "ok" } else { "failed" }
                );
                let effects = self.dispatch(Msg::RefreshCompleted { cycle, result });
                self.run_effects(effects);
            }
            SessionCommand::Subscribe { id, observer } => {
                if notify(id, observer.as_ref(), &self.state.view()) {
                    self.observers.push((id, observer));
                }
            }
            SessionCommand::Unsubscribe { id } => {
                self.observers.retain(|(observer_id, _)| *observer_id != id);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.view());
            }
            SessionCommand::Shutdown => {}
        }
    }

    /// Applies `msg` and publishes the new snapshot if anything changed.
    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            let view = self.state.view();
            self.observers
                .retain(|(id, observer)| notify(*id, observer.as_ref(), &view));
        }
        effects
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Refresh { cycle, sources } => {
                    engine_info!("Refresh cycle {} started for {} sources", cycle, sources.len());
                    let aggregator = self.aggregator.clone();
                    let cmd_tx = self.cmd_tx.clone();
                    self.runtime.spawn(async move {
                        let result = aggregator.refresh(&sources).await;
                        let _ = cmd_tx.send(SessionCommand::Completed { cycle, result });
                    });
                }
            }
        }
    }
}

/// Calls one observer, containing any panic. Returns `false` if the observer
/// panicked and should be dropped.
fn notify(id: u64, observer: &dyn SessionObserver, view: &SessionView) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| observer.on_change(view))) {
        Ok(()) => true,
        Err(_) => {
            engine_error!("Observer {} panicked and was unsubscribed", id);
            false
        }
    }
}
