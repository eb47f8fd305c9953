use std::sync::Arc;

use crate::{
    config::Config,
    error::RuntimeError,
    subscribers::Subscribe,
};
use super::simulation::Simulation;

/// Builder for constructing a [`Simulation`] with optional subscribers.
pub struct SimulationBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SimulationBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers, replacing any added so far.
    ///
    /// Subscribers receive every bank, teller and customer event
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Validates the configuration and returns the simulation.
    pub fn build(self) -> Result<Simulation, RuntimeError> {
        self.cfg.validate()?;
        Ok(Simulation::new_internal(self.cfg, self.subscribers))
    }
}
