//! Sample resource cache.
//!
//! Example values in generated schemas come from real records. The
//! container asks the server for each model's records once, keeps the first
//! [`SAMPLE_SIZE`] and serves them for the rest of the run.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::source::{JsonApiServer, SampleResource};

/// Records kept per model.
pub const SAMPLE_SIZE: usize = 3;

pub struct ResourceContainer<'a> {
    server: &'a dyn JsonApiServer,
    samples: HashMap<String, Arc<[SampleResource]>>,
}

impl<'a> ResourceContainer<'a> {
    pub fn new(server: &'a dyn JsonApiServer) -> Self {
        ResourceContainer {
            server,
            samples: HashMap::new(),
        }
    }

    /// Up to [`SAMPLE_SIZE`] samples of `model`, loaded on first access.
    pub fn resources(&mut self, model: &str) -> Arc<[SampleResource]> {
        if let Some(cached) = self.samples.get(model) {
            return Arc::clone(cached);
        }
        let loaded: Arc<[SampleResource]> = self
            .server
            .records(model)
            .into_iter()
            .take(SAMPLE_SIZE)
            .collect();
        debug!(model, count = loaded.len(), "Loaded sample resources");
        self.samples.insert(model.to_string(), Arc::clone(&loaded));
        loaded
    }

    /// First sample of `model`, if any.
    pub fn resource(&mut self, model: &str) -> Option<SampleResource> {
        self.resources(model).first().cloned()
    }

    /// Id of the first sample of `model`.
    pub fn sample_id(&mut self, model: &str) -> Option<String> {
        self.resources(model).first().map(|r| r.id.clone())
    }

    /// Ids of every cached sample of `model`.
    pub fn sample_ids(&mut self, model: &str) -> Vec<String> {
        self.resources(model).iter().map(|r| r.id.clone()).collect()
    }

    /// Distinct non-null values of `attribute` across the samples, in sample order.
    pub fn distinct_values(&mut self, model: &str, attribute: &str) -> Vec<Value> {
        let mut values: Vec<Value> = Vec::new();
        for sample in self.resources(model).iter() {
            if let Some(value) = sample.attribute(attribute) {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        values
    }
}
