//! Encoder registry: builds the encoder a trained model was trained with from the
//! interface version id stored next to it.

use std::collections::BTreeMap;
use std::fmt;

use npucost_core::{DmaNnWorkloadNpu27, DmaNnWorkloadNpu40, DpuWorkload};

use crate::adapters::{Nn27Adapter, Nn27Compat159Adapter, Nn40Adapter, Nn41Adapter, Nn5xAdapter};
use crate::dma::{DmaNpu27Recipe, DmaNpu40Recipe, DmaNpu5xRecipe};
use crate::encoder::{DescriptorEncoder, DescriptorRecipe, Preprocessing};
use crate::error::{EncodeError, Result};
use crate::versions::{CompactRecipe, LegacyRecipe, V11Recipe, V12, V13, V14, V16};

type Factory<W> = Box<dyn Fn() -> Result<Box<dyn DescriptorEncoder<W>>> + Send + Sync>;

/// Maps interface version ids to encoder factories for workload type `W`.
pub struct EncoderRegistry<W> {
    factories: BTreeMap<u32, Factory<W>>,
}

impl<W: 'static> EncoderRegistry<W> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a recipe under its own interface version. A later registration with the
    /// same id replaces the earlier one.
    pub fn register<R, F>(&mut self, recipe: F)
    where
        R: DescriptorRecipe<Workload = W> + 'static,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let version = recipe().interface_version();
        self.factories.insert(
            version,
            Box::new(move || Ok(Box::new(Preprocessing::new(recipe())?) as Box<dyn DescriptorEncoder<W>>)),
        );
    }

    /// Build the encoder for `version`.
    pub fn make(&self, version: u32) -> Result<Box<dyn DescriptorEncoder<W>>> {
        let factory = self.factories.get(&version).ok_or_else(|| EncodeError::UnknownVersion {
            version,
            known: self.versions(),
        })?;
        factory()
    }

    pub fn contains(&self, version: u32) -> bool {
        self.factories.contains_key(&version)
    }

    /// Registered version ids, ascending.
    pub fn versions(&self) -> Vec<u32> {
        self.factories.keys().copied().collect()
    }
}

impl<W: 'static> Default for EncoderRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for EncoderRegistry<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderRegistry")
            .field("versions", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Every DPU interface version.
pub fn dpu_registry() -> EncoderRegistry<DpuWorkload> {
    let mut registry = EncoderRegistry::new();
    registry.register(LegacyRecipe::v01);
    registry.register(LegacyRecipe::v10);
    registry.register(|| V11Recipe::new(11, Nn27Adapter));
    registry.register(|| V11Recipe::new(89, Nn27Compat159Adapter));
    registry.register(|| V11Recipe::new(4011, Nn40Adapter));
    registry.register(|| V11Recipe::new(4111, Nn41Adapter));
    registry.register(|| CompactRecipe::<V12, _>::new(Nn40Adapter));
    registry.register(|| CompactRecipe::<V13, _>::new(Nn5xAdapter));
    registry.register(|| CompactRecipe::<V14, _>::new(Nn5xAdapter));
    registry.register(|| CompactRecipe::<V16, _>::new(Nn5xAdapter));
    registry
}

/// DMA interfaces over the NPU 2.7 workload.
pub fn dma_npu27_registry() -> EncoderRegistry<DmaNnWorkloadNpu27> {
    let mut registry = EncoderRegistry::new();
    registry.register(|| DmaNpu27Recipe);
    registry
}

/// DMA interfaces over the NPU 4.0 workload.
pub fn dma_npu40_registry() -> EncoderRegistry<DmaNnWorkloadNpu40> {
    let mut registry = EncoderRegistry::new();
    registry.register(|| DmaNpu40Recipe);
    registry.register(|| DmaNpu5xRecipe);
    registry
}
