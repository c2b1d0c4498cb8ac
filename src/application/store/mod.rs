//! Process-wide state container.
//!
//! The [`Store`] owns the [`ApplicationState`] tree. `dispatch` is the only
//! way to change it: the owning slice reduces the action into a fresh
//! snapshot, the snapshot replaces the current one, then every subscriber is
//! called with it before `dispatch` returns. Snapshots handed out by
//! [`Store::state`] are immutable `Arc`s and never change underneath their
//! holders.

pub mod action;
pub mod lifecycle;
pub mod state;

pub use action::Action;
pub use lifecycle::{
    AsyncEvent, AsyncOperation, AsyncPhase, AsyncStatus, InFlight, RequestId, ResolutionPolicy,
};
pub use state::ApplicationState;

use parking_lot::ReentrantMutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub type Snapshot = Arc<ApplicationState>;

struct Listener {
    id: u64,
    /// Version of the newest snapshot handed to `callback`.
    seen: AtomicU64,
    callback: Box<dyn Fn(&Snapshot) + Send + Sync>,
}

struct StoreInner {
    /// Serializes dispatch, `begin` and `complete` across threads. Reentrant
    /// so listeners may dispatch.
    gate: ReentrantMutex<()>,
    state: RwLock<Snapshot>,
    version: AtomicU64,
    listeners: Mutex<Vec<Arc<Listener>>>,
    next_listener_id: AtomicU64,
    next_request_id: AtomicU64,
    latest_issued: Mutex<HashMap<&'static str, RequestId>>,
    policy: ResolutionPolicy,
    watch_tx: watch::Sender<Snapshot>,
}

/// Cheap to clone; clones share the same state tree.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_policy(ResolutionPolicy::default())
    }

    pub fn with_policy(policy: ResolutionPolicy) -> Self {
        Self::with_state(ApplicationState::default(), policy)
    }

    /// Starts from a preloaded tree instead of the slice defaults.
    pub fn with_state(initial: ApplicationState, policy: ResolutionPolicy) -> Self {
        let snapshot = Arc::new(initial);
        let (watch_tx, _) = watch::channel(Arc::clone(&snapshot));

        Self {
            inner: Arc::new(StoreInner {
                gate: ReentrantMutex::new(()),
                state: RwLock::new(snapshot),
                version: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                next_request_id: AtomicU64::new(0),
                latest_issued: Mutex::new(HashMap::new()),
                policy,
                watch_tx,
            }),
        }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.inner.policy
    }

    /// Current snapshot.
    pub fn state(&self) -> Snapshot {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Reduces `action`, swaps in the new snapshot and notifies subscribers.
    ///
    /// Dispatches from different threads are applied and delivered one at a
    /// time, so every subscriber and the `watch` channel end on the same
    /// snapshot as [`Store::state`].
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        debug!(action = action.kind(), "Store: dispatch");

        let _gate = self.inner.gate.lock();
        let (version, next) = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = Arc::new(guard.reduce(&action));
            let version = self.inner.version.fetch_add(1, Ordering::SeqCst) + 1;
            *guard = Arc::clone(&next);
            self.inner.watch_tx.send_replace(Arc::clone(&next));
            (version, next)
        };

        self.notify(version, &next);
    }

    /// Registers `listener`; it runs after every dispatch until the returned
    /// guard is dropped or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(Listener {
                id,
                seen: AtomicU64::new(0),
                callback: Box::new(listener),
            }));

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Channel view of the state for async consumers. Intermediate snapshots
    /// may be skipped by a slow receiver.
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.inner.watch_tx.subscribe()
    }

    /// Dispatches the `Pending` phase of `Op` and returns the token used to
    /// settle it.
    pub fn begin<Op: AsyncOperation>(&self) -> InFlight<Op> {
        let _gate = self.inner.gate.lock();
        let seq = self.inner.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let request_id = RequestId(seq);
        self.inner
            .latest_issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Op::NAME, request_id);

        info!("{}: started {}", Op::NAME, request_id);
        self.dispatch(Op::into_action(AsyncEvent {
            request_id,
            phase: AsyncPhase::Pending,
        }));

        InFlight::new(self.clone(), request_id)
    }

    pub(crate) fn complete<Op: AsyncOperation>(
        &self,
        request_id: RequestId,
        phase: AsyncPhase<Op::Payload>,
    ) {
        // Held across the check and the dispatch so a newer `begin` cannot
        // slip in between.
        let _gate = self.inner.gate.lock();
        if self.inner.policy == ResolutionPolicy::LatestIssuedWins
            && !self.is_latest(Op::NAME, request_id)
        {
            debug!(
                "{}: dropping {} result of superseded {}",
                Op::NAME,
                phase.label(),
                request_id
            );
            return;
        }

        match &phase {
            AsyncPhase::Rejected(reason) => {
                warn!("{}: {} rejected: {}", Op::NAME, request_id, reason)
            }
            _ => info!("{}: {} {}", Op::NAME, request_id, phase.label()),
        }

        self.dispatch(Op::into_action(AsyncEvent { request_id, phase }));
    }

    fn is_latest(&self, name: &'static str, request_id: RequestId) -> bool {
        self.inner
            .latest_issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .is_none_or(|latest| *latest == request_id)
    }

    fn notify(&self, version: u64, snapshot: &Snapshot) {
        // Copy out so listeners may subscribe/unsubscribe or dispatch while running.
        let listeners: Vec<Arc<Listener>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for listener in listeners {
            // A listener that dispatched has already been handed the newer
            // snapshot; skip the stale one.
            if listener.seen.fetch_max(version, Ordering::SeqCst) < version {
                (listener.callback)(snapshot);
            }
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle returned by [`Store::subscribe`].
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|listener| listener.id != self.id);
        }
    }
}
