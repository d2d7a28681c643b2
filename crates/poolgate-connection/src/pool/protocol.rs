//! Connection protocol: build, probe, retry

use std::sync::Arc;

use poolgate_core::{AdapterFactory, DriverAdapter, PoolClient, PoolError, PoolLogger, Result};

use super::manager::PoolInner;
use crate::events::PoolEvent;
use crate::probe::{probe_adapter, probe_client};

/// Resources an attempt holds that must be released if it fails
struct AttemptResources<C> {
    probe: Option<Box<dyn DriverAdapter>>,
    client: Option<Arc<C>>,
}

impl<C> AttemptResources<C> {
    fn new() -> Self {
        Self {
            probe: None,
            client: None,
        }
    }
}

impl<C: PoolClient> PoolInner<C> {
    /// Run the retry protocol and publish the outcome into `generation`.
    ///
    /// A client that comes back after the pool was disposed is disconnected
    /// and never cached.
    pub(super) async fn initialize(
        self: Arc<Self>,
        generation: u64,
        logger: Arc<dyn PoolLogger>,
    ) -> Result<Arc<C>> {
        match self.connect_with_retry(&logger).await {
            Ok((adapter_factory, client)) => {
                if self.commit(generation, adapter_factory, &client) {
                    return Ok(client);
                }

                tracing::warn!(generation, "pool disposed during initialization, discarding client");
                logger.warn("Pool disposed during initialization, discarding client");
                if let Err(e) = client.disconnect().await {
                    tracing::warn!(error = %e, "failed to disconnect discarded client");
                    logger.error(&format!("Failed to disconnect client: {e}"));
                }
                Err(PoolError::Disposed)
            }
            Err(error) => {
                self.abandon(generation);
                Err(error)
            }
        }
    }

    fn commit(
        &self,
        generation: u64,
        adapter_factory: Arc<dyn AdapterFactory>,
        client: &Arc<C>,
    ) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }

        state.adapter_factory = Some(adapter_factory);
        state.client = Some(Arc::clone(client));
        true
    }

    /// Forget a failed initialization so the next caller starts over
    pub(super) fn abandon(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation == generation {
            state.pending = None;
            state.client = None;
        }
    }

    async fn connect_with_retry(
        &self,
        logger: &Arc<dyn PoolLogger>,
    ) -> Result<(Arc<dyn AdapterFactory>, Arc<C>)> {
        let max_attempts = self.config.max_attempts();
        let mut attempts = 0;

        while attempts < max_attempts {
            self.emit(PoolEvent::Attempting {
                attempt: attempts + 1,
                max_attempts,
            });

            let mut resources = AttemptResources::new();
            match self.attempt(&mut resources, logger).await {
                Ok(ready) => {
                    tracing::info!(attempts = attempts + 1, "pool ready");
                    self.emit(PoolEvent::Ready {
                        attempts_taken: attempts + 1,
                    });
                    return Ok(ready);
                }
                Err(error) => {
                    self.recover(&mut resources, logger).await;

                    attempts += 1;
                    let delay = self.config.backoff().delay(attempts);

                    tracing::error!(
                        attempt = attempts,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "failed to connect, retrying"
                    );
                    logger.error(&format!(
                        "Failed to connect (attempt {attempts}), retrying...: {error}"
                    ));
                    self.emit(PoolEvent::Failed {
                        attempt: attempts,
                        error: error.to_string(),
                        delay,
                    });

                    self.sleeper.sleep(delay).await;
                }
            }
        }

        tracing::error!(attempts, "connection attempts exhausted");
        self.emit(PoolEvent::Exhausted {
            total_attempts: attempts,
        });

        Err(PoolError::Exhausted {
            pool: self.config.name().to_string(),
            attempts,
        })
    }

    /// One pass through the protocol. Anything acquired is parked in
    /// `resources` until the step that owns it finishes.
    async fn attempt(
        &self,
        resources: &mut AttemptResources<C>,
        logger: &Arc<dyn PoolLogger>,
    ) -> Result<(Arc<dyn AdapterFactory>, Arc<C>)> {
        tracing::debug!("creating adapter");
        logger.debug("Creating adapter");
        let adapter_factory = self.adapter_builder.build(Arc::clone(logger))?;

        let probe = resources.probe.insert(adapter_factory.connect().await?);

        tracing::debug!(provider = adapter_factory.provider(), "executing test query");
        logger.debug("Executing test query");
        let latency = probe_adapter(&**probe).await?;
        tracing::debug!(latency_ms = latency.as_millis() as u64, "adapter probe succeeded");

        if let Some(probe) = resources.probe.take() {
            self.dispose_probe(probe, logger).await;
        }

        tracing::debug!("creating client with adapter");
        logger.debug("Creating client with adapter");
        let client = Arc::new(
            self.client_builder
                .build(Arc::clone(&adapter_factory), Arc::clone(logger))?,
        );
        resources.client = Some(Arc::clone(&client));

        tracing::debug!("executing test query on client");
        logger.debug("Executing test query on client");
        let latency = probe_client(&*client).await?;
        tracing::debug!(latency_ms = latency.as_millis() as u64, "client probe succeeded");
        logger.debug("Test query executed successfully");

        resources.client = None;
        Ok((adapter_factory, client))
    }

    /// Release what a failed attempt still holds. Each release is attempted
    /// on its own and failures are only logged.
    async fn recover(&self, resources: &mut AttemptResources<C>, logger: &Arc<dyn PoolLogger>) {
        if let Some(probe) = resources.probe.take() {
            self.dispose_probe(probe, logger).await;
        }

        if let Some(client) = resources.client.take()
            && let Err(e) = client.disconnect().await
        {
            tracing::warn!(error = %e, "failed to disconnect client");
            logger.error(&format!("Failed to disconnect client: {e}"));
        }
    }

    async fn dispose_probe(&self, probe: Box<dyn DriverAdapter>, logger: &Arc<dyn PoolLogger>) {
        if let Err(e) = probe.dispose().await {
            tracing::warn!(error = %e, "failed to dispose probe connection");
            logger.error(&format!("Failed to dispose probe connection: {e}"));
        }
    }
}
