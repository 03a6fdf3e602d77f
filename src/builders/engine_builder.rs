//! Assemble a [`DialerEngine`] from a store, a configuration and a clock.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::core::{DialerEngine, DialerError, DialerStore};
use crate::util::clock::{Clock, SystemClock};

/// Builder for [`DialerEngine`]. Defaults to [`EngineConfig::default`] and
/// the system clock.
pub struct EngineBuilder<S> {
    store: Arc<S>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl<S> EngineBuilder<S>
where
    S: DialerStore,
{
    /// Start a builder over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Configuration the engine will be built with.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<DialerEngine<S>, DialerError> {
        self.config.validate().map_err(DialerError::InvalidConfig)?;
        tracing::debug!(
            page_size = self.config.page_size,
            chunk_size = self.config.chunk_size,
            "dialer engine built"
        );
        Ok(DialerEngine::new(self.store, self.config, self.clock))
    }
}
