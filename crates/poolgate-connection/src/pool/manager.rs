//! Pool manager handle and shared state

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use poolgate_core::{
    AdapterBuilder, AdapterFactory, ClientBuilder, PoolClient, PoolError, PoolLogger, Result,
    logger_or_noop,
};
use tokio::sync::broadcast;

use crate::config::PoolConfig;
use crate::events::PoolEvent;
use crate::retry::{Sleeper, TokioSleeper};

/// Buffered lifecycle events per subscriber
const EVENT_CAPACITY: usize = 64;

/// One initialization, shared by every caller that waits on it
pub(super) type Initialization<C> = Shared<BoxFuture<'static, Result<Arc<C>>>>;

pub(super) struct PoolState<C> {
    pub(super) adapter_factory: Option<Arc<dyn AdapterFactory>>,
    pub(super) client: Option<Arc<C>>,
    pub(super) pending: Option<Initialization<C>>,
    /// Bumped by every dispose; an initialization only commits into the
    /// generation it started in
    pub(super) generation: u64,
}

impl<C> PoolState<C> {
    fn new() -> Self {
        Self {
            adapter_factory: None,
            client: None,
            pending: None,
            generation: 0,
        }
    }
}

pub(super) struct PoolInner<C> {
    pub(super) client_builder: Arc<dyn ClientBuilder<C>>,
    pub(super) adapter_builder: Arc<dyn AdapterBuilder>,
    pub(super) config: PoolConfig,
    pub(super) sleeper: Arc<dyn Sleeper>,
    pub(super) events: broadcast::Sender<PoolEvent>,
    /// Never held across an await
    pub(super) state: Mutex<PoolState<C>>,
}

impl<C> PoolInner<C> {
    pub(super) fn emit(&self, event: PoolEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Lazily builds, validates and caches a single database client.
///
/// The handle is cheap to clone; clones share the same client and the same
/// in-flight initialization.
pub struct PoolManager<C: PoolClient> {
    inner: Arc<PoolInner<C>>,
}

impl<C: PoolClient> Clone for PoolManager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: PoolClient> PoolManager<C> {
    /// Create a pool manager with default configuration from two builder closures
    pub fn new<CB, AB>(client_builder: CB, adapter_builder: AB) -> Self
    where
        CB: Fn(Arc<dyn AdapterFactory>, Arc<dyn PoolLogger>) -> Result<C> + Send + Sync + 'static,
        AB: Fn(Arc<dyn PoolLogger>) -> Result<Arc<dyn AdapterFactory>> + Send + Sync + 'static,
    {
        Self::from_parts(
            Arc::new(client_builder),
            Arc::new(adapter_builder),
            PoolConfig::default(),
            Arc::new(TokioSleeper),
        )
    }

    /// Start building a pool manager from two builder closures
    pub fn builder<CB, AB>(client_builder: CB, adapter_builder: AB) -> PoolManagerBuilder<C>
    where
        CB: Fn(Arc<dyn AdapterFactory>, Arc<dyn PoolLogger>) -> Result<C> + Send + Sync + 'static,
        AB: Fn(Arc<dyn PoolLogger>) -> Result<Arc<dyn AdapterFactory>> + Send + Sync + 'static,
    {
        PoolManagerBuilder::from_builders(Arc::new(client_builder), Arc::new(adapter_builder))
    }

    fn from_parts(
        client_builder: Arc<dyn ClientBuilder<C>>,
        adapter_builder: Arc<dyn AdapterBuilder>,
        config: PoolConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(PoolInner {
                client_builder,
                adapter_builder,
                config,
                sleeper,
                events,
                state: Mutex::new(PoolState::new()),
            }),
        }
    }

    /// Get the validated client, initializing it on first use.
    ///
    /// Callers that arrive while an initialization is running wait on that
    /// same initialization and receive the same `Arc`. A failed
    /// initialization is forgotten before its waiters are woken, so the next
    /// call starts a fresh retry cycle.
    #[tracing::instrument(skip_all, fields(pool = %self.inner.config.name()))]
    pub async fn get_pool(&self, logger: Option<Arc<dyn PoolLogger>>) -> Result<Arc<C>> {
        let logger = logger_or_noop(logger);
        let (initialization, reused) = self.initialization(&logger);

        let client = initialization.await?;

        if reused {
            tracing::debug!("returning existing pool");
            logger.debug("Returning existing pool");
        }

        Ok(client)
    }

    fn initialization(&self, logger: &Arc<dyn PoolLogger>) -> (Initialization<C>, bool) {
        let mut state = self.inner.state.lock();

        if let Some(pending) = &state.pending {
            return (pending.clone(), true);
        }

        let initialization = PoolInner::start(&self.inner, state.generation, Arc::clone(logger));
        state.pending = Some(initialization.clone());
        (initialization, false)
    }

    /// Tear down the cached client.
    ///
    /// Disconnect failures are logged, never returned. Safe to call any
    /// number of times. An initialization still in flight is not cancelled,
    /// but it will not be cached: its waiters receive `PoolError::Disposed`.
    /// A `get_pool` issued before that initialization finishes starts a new
    /// one, so two connection sequences can briefly run side by side.
    #[tracing::instrument(skip_all, fields(pool = %self.inner.config.name()))]
    pub async fn dispose(&self, logger: Option<Arc<dyn PoolLogger>>) {
        let logger = logger_or_noop(logger);

        let client = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            state.pending = None;
            state.adapter_factory = None;
            state.client.take()
        };

        if let Some(client) = client {
            tracing::debug!("disconnecting client");
            if let Err(e) = client.disconnect().await {
                tracing::warn!(error = %e, "failed to disconnect client");
                logger.error(&format!("Failed to disconnect client: {e}"));
            }
        }

        self.inner.emit(PoolEvent::Disposed);
    }

    /// Whether a validated client is cached
    pub fn is_ready(&self) -> bool {
        self.inner.state.lock().client.is_some()
    }

    /// The cached client, without triggering initialization
    pub fn current_client(&self) -> Option<Arc<C>> {
        self.inner.state.lock().client.clone()
    }

    /// The adapter factory behind the cached client
    pub fn current_adapter_factory(&self) -> Option<Arc<dyn AdapterFactory>> {
        self.inner.state.lock().adapter_factory.clone()
    }

    /// Get the pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.inner.events.subscribe()
    }
}

/// Builder for a [`PoolManager`] with non-default configuration
pub struct PoolManagerBuilder<C: PoolClient> {
    client_builder: Arc<dyn ClientBuilder<C>>,
    adapter_builder: Arc<dyn AdapterBuilder>,
    config: PoolConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl<C: PoolClient> PoolManagerBuilder<C> {
    /// Start from trait-object builders
    pub fn from_builders(
        client_builder: Arc<dyn ClientBuilder<C>>,
        adapter_builder: Arc<dyn AdapterBuilder>,
    ) -> Self {
        Self {
            client_builder,
            adapter_builder,
            config: PoolConfig::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Set the pool configuration
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the sleeper used between attempts
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Validate the configuration and create the manager
    pub fn build(self) -> Result<PoolManager<C>> {
        self.config.validate()?;
        Ok(PoolManager::from_parts(
            self.client_builder,
            self.adapter_builder,
            self.config,
            self.sleeper,
        ))
    }
}

impl<C: PoolClient> PoolInner<C> {
    /// Spawn the retry protocol and wrap its handle in a shareable future.
    ///
    /// The protocol runs as its own task, so it completes even if every
    /// caller stops waiting.
    fn start(
        inner: &Arc<Self>,
        generation: u64,
        logger: Arc<dyn PoolLogger>,
    ) -> Initialization<C> {
        let task = tokio::spawn(Arc::clone(inner).initialize(generation, logger));
        let inner = Arc::clone(inner);

        async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => {
                    tracing::error!(error = %join_error, "initialization task failed");
                    inner.abandon(generation);
                    Err(PoolError::Task(join_error.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }
}
