//! Cycle cost providers for NPU workloads.
//!
//! - **Theoretical:** closed form DPU and DMA estimates from device characteristics only
//! - **NN:** descriptor encoder plus a trained model behind the [`Inference`] boundary
//! - **Converting:** providers of a narrower workload type joined to a generic chain
//! - **Priority:** ordered chains returning the first valid cost
//!
//! Every provider answers with a [`CyclesInterfaceType`](npucost_core::CyclesInterfaceType);
//! failures are error codes from [`npucost_core::cycles`], never panics.

pub mod converting;
pub mod dma_theoretical;
pub mod dpu_theoretical;
pub mod error;
pub mod nn;
pub mod priority;
pub mod provider;

pub use converting::ConvertingProvider;
pub use dma_theoretical::DmaTheoreticalProvider;
pub use dpu_theoretical::DpuTheoreticalProvider;
pub use error::{ProviderError, Result};
pub use nn::NnCostProvider;
pub use priority::{PriorityCostProvider, UNKNOWN_SOURCE};
pub use provider::{CostProvider, Inference};
