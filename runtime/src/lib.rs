//! # Todo Runtime
//!
//! The Store owns the state object, runs the reducer for every action and
//! starts the effects the reducer returns.
//!
//! ## Example
//!
//! ```ignore
//! use todo_runtime::Store;
//!
//! let store = Store::new(TodoState::new(), TodoReducer::new(), environment);
//!
//! store.send(TodoAction::AddTodo { text: "Buy milk".into() }).await?;
//! let left = store.state(TodoState::remaining_count).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use todo_core::{effect::Effect, reducer::Reducer};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use todo_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_shutdown_timeout(Duration::from_millis(500));
/// assert_eq!(config.default_shutdown_timeout, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Timeout used by [`Store::shutdown_default`]
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Decrements the pending-effect counter when an effect task ends, panicking or not
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, Duration, Effect, Ordering, PendingGuard, Reducer, RwLock,
        StoreConfig, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// State sits behind an `RwLock` and the reducer runs under the write
    /// lock, so actions are applied one at a time in the order their `send`
    /// calls acquire it.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Returns true once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Number of effect tasks still running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions from now on, then waits for running effects.
        /// Actions those effects produce are dropped.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// when `timeout` elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                let pending = self.pending_effects();
                if pending == 0 {
                    tracing::info!("Shutdown complete");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if tokio::time::Instant::now() >= deadline {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(pending_effects = pending, "Waiting for effects to complete");
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Send an action to the store
        ///
        /// Runs the reducer under the write lock and starts the returned
        /// effects. Returns once the state is updated; effects keep running in
        /// the background and feed their actions back through `send`.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shutting_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                effects
            };

            tracing::trace!(effects = effects.len(), "Reducer completed");
            for effect in effects {
                self.execute_effect(effect);
            }
            Ok(())
        }

        /// Read current state via a closure
        ///
        /// The read lock is held only while `f` runs:
        ///
        /// ```ignore
        /// let remaining = store.state(TodoState::remaining_count).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Feed an effect-produced action back into the store
        async fn feed_back(&self, action: A) {
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped effect-produced action");
            }
        }

        /// Start one effect
        ///
        /// A `Future` runs in its own task. A panic there is reported by tokio
        /// and the guard still releases the pending count.
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let guard = PendingGuard(Arc::clone(&self.pending_effects));
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect produced an action");
                            store.feed_back(action).await;
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

    /// Tally that can ask for a deferred bump
    #[derive(Debug, Default)]
    struct Tally {
        total: u32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Add(u32),
        AddLater(u32),
        Explode,
        Stall,
    }

    #[derive(Clone)]
    struct TallyReducer;

    #[allow(clippy::panic)] // Panicking effect under test
    async fn explode() -> Option<TallyAction> {
        panic!("effect failed")
    }

    impl Reducer for TallyReducer {
        type State = Tally;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Tally,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    smallvec![Effect::None]
                },
                TallyAction::AddLater(n) => {
                    smallvec![Effect::future(async move { Some(TallyAction::Add(n)) })]
                },
                TallyAction::Explode => smallvec![Effect::future(explode())],
                TallyAction::Stall => smallvec![Effect::future(async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    None
                })],
            }
        }
    }

    type TallyStore = Store<Tally, TallyAction, (), TallyReducer>;

    fn tally_store() -> TallyStore {
        Store::new(Tally::default(), TallyReducer, ())
    }

    /// Waits until every effect task has ended
    async fn settle(store: &TallyStore) {
        while store.pending_effects() > 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn actions_apply_in_order() -> Result<(), StoreError> {
        let store = tally_store();
        store.send(TallyAction::Add(2)).await?;
        store.send(TallyAction::Add(3)).await?;
        assert_eq!(store.state(|s| s.total).await, 5);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() -> Result<(), StoreError> {
        let store = tally_store();
        store.send(TallyAction::AddLater(4)).await?;

        tokio::time::timeout(Duration::from_secs(1), settle(&store))
            .await
            .map_err(|_| StoreError::ShutdownTimeout(store.pending_effects()))?;
        assert_eq!(store.state(|s| s.total).await, 4);
        Ok(())
    }

    #[tokio::test]
    async fn panicking_effect_is_isolated() -> Result<(), StoreError> {
        let store = tally_store();
        store.send(TallyAction::Explode).await?;
        settle(&store).await;

        store.send(TallyAction::Add(1)).await?;
        assert_eq!(store.state(|s| s.total).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_state() -> Result<(), StoreError> {
        let store = tally_store();
        let other = store.clone();

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.send(TallyAction::Add(1)).await })
            })
            .collect();
        for task in tasks {
            if let Ok(result) = task.await {
                result?;
            }
        }

        assert_eq!(other.state(|s| s.total).await, 10);
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = tally_store();
        store.shutdown(Duration::from_millis(100)).await?;
        assert!(store.is_shutting_down());

        assert_eq!(
            store.send(TallyAction::Add(1)).await,
            Err(StoreError::ShutdownInProgress)
        );
        assert_eq!(store.state(|s| s.total).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_times_out_on_running_effects() -> Result<(), StoreError> {
        let store = tally_store();
        store.send(TallyAction::Stall).await?;

        let result = store.shutdown(Duration::from_millis(20)).await;
        assert_eq!(result, Err(StoreError::ShutdownTimeout(1)));
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_waits_for_running_effects() -> Result<(), StoreError> {
        let store: TallyStore = Store::with_config(
            Tally::default(),
            TallyReducer,
            (),
            StoreConfig::default().with_shutdown_timeout(Duration::from_secs(1)),
        );
        store.send(TallyAction::AddLater(7)).await?;

        store.shutdown_default().await?;
        assert_eq!(store.pending_effects(), 0);
        // The fed-back action either landed before shutdown or was dropped
        assert!(matches!(store.state(|s| s.total).await, 0 | 7));
        Ok(())
    }
}
