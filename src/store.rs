//! State container.
//!
//! Owns the current snapshot of a reducer's state, applies intents through
//! the reducer and notifies subscribers after every commit.
//!
//! ```text
//! dispatch(Intent)   ──→ reduce ──→ commit ──→ notify subscribers
//! dispatch(Workflow) ──→ run sync prefix with the store ──→ spawn the rest
//! ```
//!
//! Stores are plain values: construct as many as needed and pass clones
//! around. A clone is a handle to the same state.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tokio::task::JoinHandle;

use crate::mvi::Reducer;

/// Callback invoked after every committed state replacement.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// The asynchronous tail of a workflow.
pub type WorkflowFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A dispatchable unit of multi-step logic.
///
/// Called immediately with the store; whatever it does before returning runs
/// synchronously inside `dispatch`, the returned future is spawned.
pub type Workflow<R> = Box<dyn FnOnce(Store<R>) -> WorkflowFuture + Send>;

/// Anything that can be handed to [`Store::dispatch`].
pub enum Dispatch<R: Reducer> {
    Intent(R::Intent),
    Workflow(Workflow<R>),
}

impl<R: Reducer> Dispatch<R> {
    pub fn workflow<F>(f: F) -> Self
    where
        F: FnOnce(Store<R>) -> WorkflowFuture + Send + 'static,
    {
        Dispatch::Workflow(Box::new(f))
    }
}

impl<R: Reducer> fmt::Debug for Dispatch<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Intent(intent) => f.debug_tuple("Intent").field(intent).finish(),
            Dispatch::Workflow(_) => f.write_str("Workflow"),
        }
    }
}

/// Outcome of a dispatch.
#[derive(Debug)]
pub enum Dispatched {
    /// An intent was reduced and committed.
    Applied,
    /// A workflow was started; its asynchronous part is still running.
    Pending(WorkflowHandle),
}

impl Dispatched {
    /// Wait for the spawned workflow, if any.
    pub async fn wait(self) {
        if let Dispatched::Pending(handle) = self {
            handle.wait().await;
        }
    }
}

/// Handle to a spawned workflow. Dropping it detaches the task.
#[derive(Debug)]
pub struct WorkflowHandle {
    task: JoinHandle<()>,
}

impl WorkflowHandle {
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::warn!("Workflow task ended abnormally: {}", e);
        }
    }
}

struct StoreInner<R: Reducer> {
    state: RwLock<R::State>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    // Serializes reduce+commit+notify so subscribers observe commits in
    // order. Reentrant: a listener may dispatch.
    commit: ReentrantMutex<()>,
    _reducer: PhantomData<fn() -> R>,
}

/// Shared handle to a reducer-driven state container.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                commit: ReentrantMutex::new(()),
                _reducer: PhantomData,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> R::State {
        self.inner.state.read().clone()
    }

    /// Reduce an intent or start a workflow.
    ///
    /// Workflows are spawned with `tokio::spawn`, so dispatching one must
    /// happen inside a Tokio runtime.
    pub fn dispatch(&self, dispatch: Dispatch<R>) -> Dispatched {
        match dispatch {
            Dispatch::Intent(intent) => {
                self.apply(intent);
                Dispatched::Applied
            }
            Dispatch::Workflow(workflow) => {
                let future = workflow(self.clone());
                Dispatched::Pending(WorkflowHandle {
                    task: tokio::spawn(future),
                })
            }
        }
    }

    /// Register a listener; it runs after every committed transition.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));

        let inner = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.listeners.lock().retain(|(lid, _)| *lid != id);
                }
            }),
        }
    }

    /// Handle that does not keep the store alive. Listeners that read the
    /// store they are registered on should capture one of these.
    pub fn downgrade(&self) -> WeakStore<R> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn apply(&self, intent: R::Intent) {
        let _commit = self.inner.commit.lock();
        tracing::trace!(?intent, "Reducing intent");
        {
            let mut state = self.inner.state.write();
            let current = std::mem::take(&mut *state);
            *state = R::reduce(current, intent);
        }

        // Snapshot the list so listeners may subscribe, unsubscribe or read
        // state without deadlocking.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

/// Non-owning handle from [`Store::downgrade`].
pub struct WeakStore<R: Reducer> {
    inner: Weak<StoreInner<R>>,
}

impl<R: Reducer> WeakStore<R> {
    /// `None` once every [`Store`] handle has been dropped.
    pub fn upgrade(&self) -> Option<Store<R>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<R: Reducer> Clone for WeakStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Registration returned by [`Store::subscribe`].
///
/// The listener stays registered until [`Subscription::unsubscribe`] is
/// called; dropping the value does not remove it.
pub struct Subscription {
    unsubscribe: Box<dyn FnOnce() + Send>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        (self.unsubscribe)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
