//! Cost provider errors.
//!
//! These never leave [`CostProvider::get_cost`](crate::CostProvider::get_cost): a provider
//! turns them into cycle error codes so a priority chain can fall through. They surface
//! directly only from constructors and from [`Inference`](crate::Inference) implementations.

use npucost_core::cycles::{ERROR_INVALID_INPUT_CONFIGURATION, ERROR_INVALID_OUTPUT_RANGE};
use npucost_core::{CoreError, CyclesInterfaceType};
use npucost_descriptors::EncodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The workload could not be encoded for the model.
    #[error("descriptor error: {0}")]
    Encode(#[from] EncodeError),

    /// The workload cannot be expressed in the workload type a provider consumes.
    #[error("workload conversion failed: {0}")]
    Conversion(#[from] CoreError),

    /// The inference engine could not evaluate a descriptor.
    #[error("inference failed in '{model}': {reason}")]
    Inference { model: String, reason: String },
}

impl ProviderError {
    /// Cycle code reported in place of a cost when this error occurs.
    pub fn cycles_code(&self) -> CyclesInterfaceType {
        match self {
            Self::Encode(_) | Self::Conversion(_) => ERROR_INVALID_INPUT_CONFIGURATION,
            Self::Inference { .. } => ERROR_INVALID_OUTPUT_RANGE,
        }
    }
}

/// Result type for cost provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_by_kind() {
        let conversion = ProviderError::Conversion(CoreError::Unrepresentable {
            target: "DMANNWorkload_NPU27",
            reason: "layout change".to_string(),
        });
        assert_eq!(conversion.cycles_code(), ERROR_INVALID_INPUT_CONFIGURATION);
        let inference = ProviderError::Inference {
            model: "dpu".to_string(),
            reason: "engine not loaded".to_string(),
        };
        assert_eq!(inference.cycles_code(), ERROR_INVALID_OUTPUT_RANGE);
        assert!(inference.to_string().contains("engine not loaded"));
    }
}
