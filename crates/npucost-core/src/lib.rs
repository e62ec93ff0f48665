//! Data model for the NPU cost model.
//!
//! Everything the descriptor encoders and the cost providers consume lives here:
//! - **Enumerations:** present-day device, datatype, operation and memory concepts
//! - **Tensors and halo:** 4D tensor descriptions and per-edge halo regions
//! - **Workloads:** DPU compute workloads and DMA transfer workloads
//! - **Cycles:** the cycle/error-code convention shared by every cost provider

pub mod cycles;
pub mod dma;
pub mod enums;
pub mod error;
pub mod halo;
pub mod tensor;
pub mod types;
pub mod workload;

pub use cycles::CyclesInterfaceType;
pub use dma::{DmaNnWorkloadNpu27, DmaNnWorkloadNpu40, DmaWorkload, SizeStride};
pub use enums::TextEnum;
pub use error::{CoreError, Result};
pub use halo::{HaloInfoHw, HaloInfoHwc, HaloWorkload};
pub use tensor::Tensor;
pub use types::{
    ActivationFunction, DataType, Device, DmaEngines, ExecutionMode, IsiStrategy, Layout, MemoryDirection,
    MemoryLocation, Operation, Swizzling,
};
pub use workload::DpuWorkload;

/// Line that closes every text dump, followed by the dumped type's name.
pub const DUMP_TERMINATOR: &str = "------------------------------------------------------------------ ";
