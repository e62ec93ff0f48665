//! Ordered provider chains.

use std::sync::Arc;

use npucost_core::cycles::{error_text, is_error_code, NO_VALID_COST_PROVIDER};
use npucost_core::CyclesInterfaceType;

use crate::converting::ConvertingProvider;
use crate::provider::CostProvider;

/// Source reported when no provider of a chain produced a cost.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Tries its providers in order and returns the first valid cost.
#[derive(Debug, Clone)]
pub struct PriorityCostProvider<W> {
    providers: Vec<Arc<ConvertingProvider<W>>>,
}

impl<W: 'static> PriorityCostProvider<W> {
    pub fn new(providers: Vec<Arc<ConvertingProvider<W>>>) -> Self {
        Self { providers }
    }

    /// Append a provider with the lowest priority so far.
    pub fn push(&mut self, provider: ConvertingProvider<W>) {
        self.providers.push(Arc::new(provider));
    }

    pub fn with(mut self, provider: ConvertingProvider<W>) -> Self {
        self.push(provider);
        self
    }

    pub fn providers(&self) -> &[Arc<ConvertingProvider<W>>] {
        &self.providers
    }

    /// Whether any provider is backed by a loaded NN model.
    pub fn has_nn_initialized(&self) -> bool {
        self.providers.iter().any(|p| p.is_initialized())
    }
}

impl<W: 'static> Default for PriorityCostProvider<W> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<W: 'static> CostProvider<W> for PriorityCostProvider<W> {
    fn name(&self) -> &str {
        "priority"
    }

    fn is_initialized(&self) -> bool {
        self.has_nn_initialized()
    }

    fn get_cost(&self, workload: &W, mut source: Option<&mut String>) -> CyclesInterfaceType {
        for provider in &self.providers {
            let cycles = provider.get_cost(workload, source.as_deref_mut());
            if !is_error_code(cycles) {
                return cycles;
            }
            tracing::debug!(provider = provider.name(), error = error_text(cycles), "provider failed, trying next");
        }
        tracing::warn!(providers = self.providers.len(), "no provider produced a cost");
        if let Some(source) = source {
            source.clear();
            source.push_str(UNKNOWN_SOURCE);
        }
        NO_VALID_COST_PROVIDER
    }
}
