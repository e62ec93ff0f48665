//! Versioned descriptor encoders for the NPU cost model.
//!
//! A trained cost model consumes a fixed-length float vector whose layout was frozen when
//! the model was trained. This crate turns present-day workloads into those vectors:
//! - **Compatibility:** per-version enumerations and the text based translation into them
//! - **Adapters:** per-model policies that move workloads back into the trained space
//! - **Recipes:** the field order of every DPU and DMA interface version
//! - **Registry:** version id to encoder construction

pub mod adapters;
pub mod compat;
pub mod dma;
pub mod encoder;
pub mod error;
pub mod input1;
pub mod inserter;
pub mod intf;
pub mod registry;
pub mod versions;

pub use adapters::{
    Nn27Adapter, Nn27Compat159Adapter, Nn40Adapter, Nn41Adapter, Nn5xAdapter, PassThroughAdapter, WorkloadAdapter,
};
pub use compat::{convert, CompatibleEnum};
pub use dma::{DmaNpu27Recipe, DmaNpu40Recipe, DmaNpu5xRecipe};
pub use encoder::{DescriptorEncoder, DescriptorRecipe, Preprocessing};
pub use error::{EncodeError, Result};
pub use input1::{DefaultInput1Builder, Input1Builder};
pub use inserter::Inserter;
pub use registry::{dma_npu27_registry, dma_npu40_registry, dpu_registry, EncoderRegistry};
