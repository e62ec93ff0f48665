//! The compact, device independent layout used from interface 12 on.
//!
//! Field order:
//! operation, input 0 shape + datatype, weights datatype, output 0 shape + datatype,
//! geometry, execution mode, sparsity, three swizzling-enabled flags, output write tiles,
//! output layout, then the trailing flags the interface version adds.

use std::marker::PhantomData;

use npucost_core::{DataType, DpuWorkload, Swizzling};

use crate::adapters::WorkloadAdapter;
use crate::compat::{convert, CompatibleEnum};
use crate::encoder::DescriptorRecipe;
use crate::error::Result;
use crate::inserter::{InsertMode, Inserter};
use crate::intf::intf12;

use super::{autopadded, insert_geometry, insert_sparsity};

/// What an interface version changes in the compact layout.
pub trait CompactInterface: std::fmt::Debug + Send + Sync + 'static {
    const VERSION: u32;
    const SIZE: usize;

    type DataType: CompatibleEnum;
    type Operation: CompatibleEnum;
    type ExecutionMode: CompatibleEnum;

    /// Sparsity goes through the six-decimal round trip.
    const REQUANTIZED_SPARSITY: bool = true;
    /// Input channels below 16 are described as 16 when the workload asks for autopad.
    const INPUT_AUTOPAD: bool = false;
    const OUTPUT_AUTOPAD: bool = false;
    /// Trailing in-place, weightless and superdense flags.
    const MEMORY_FLAGS: bool = false;
    /// Trailing reduce min/max flag.
    const REDUCE_MINMAX_FLAG: bool = false;
}

/// Compact recipe for interface `I` with adapter `A`.
#[derive(Debug, Clone)]
pub struct CompactRecipe<I, A> {
    adapter: A,
    _interface: PhantomData<I>,
}

impl<I: CompactInterface, A: WorkloadAdapter> CompactRecipe<I, A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            _interface: PhantomData,
        }
    }

    fn dtype(&self, dtype: DataType) -> Result<I::DataType> {
        convert(self.adapter.mock_replace_datatypes(dtype))
    }
}

impl<I: CompactInterface, A: WorkloadAdapter> DescriptorRecipe for CompactRecipe<I, A> {
    type Workload = DpuWorkload;

    fn interface_version(&self) -> u32 {
        I::VERSION
    }

    fn declared_size(&self) -> usize {
        I::SIZE
    }

    fn sample_workload(&self) -> DpuWorkload {
        DpuWorkload::sample()
    }

    fn write<M: InsertMode>(&self, wl: &DpuWorkload, ins: &mut Inserter<'_, M>) -> Result<usize> {
        let adapter = &self.adapter;
        let op = adapter.mock_replace_operations(wl.op);
        let input_shape = if I::INPUT_AUTOPAD {
            autopadded(wl.input_0.shape, wl.input_autopad)
        } else {
            wl.input_0.shape
        };
        let output_shape = if I::OUTPUT_AUTOPAD {
            autopadded(wl.output_0.shape, wl.output_autopad)
        } else {
            wl.output_0.shape
        };

        let mut offset = ins.one_hot(convert::<I::Operation, _>(op)?, 0)?;
        offset = ins.tensor(&input_shape, self.dtype(wl.input_0.dtype)?, offset)?;
        offset = ins.one_hot(self.dtype(wl.weight_type.unwrap_or(wl.input_0.dtype))?, offset)?;
        offset = ins.tensor(&output_shape, self.dtype(wl.output_0.dtype)?, offset)?;
        offset = insert_geometry(ins, wl, offset)?;
        offset = ins.one_hot(convert::<I::ExecutionMode, _>(wl.execution_order)?, offset)?;
        offset = insert_sparsity(ins, wl, I::REQUANTIZED_SPARSITY, offset)?;

        let (s0, s1, s2) =
            adapter.establish_unique_swizzling(wl.input_0_swizzling, wl.input_1_swizzling, wl.output_0_swizzling, op);
        for key in [s0, s1, s2] {
            offset = ins.flag(key != Swizzling::Key0, offset)?;
        }
        offset = ins.uint(adapter.avoid_untrained_space(wl).owt, offset)?;
        offset = ins.one_hot(convert::<intf12::Layout, _>(wl.output_0.layout)?, offset)?;

        if I::MEMORY_FLAGS {
            offset = ins.flag(wl.is_inplace_output_memory(), offset)?;
            offset = ins.flag(wl.is_weightless_operation(), offset)?;
            offset = ins.flag(wl.is_superdense(), offset)?;
        }
        if I::REDUCE_MINMAX_FLAG {
            offset = ins.flag(wl.is_reduce_minmax_op(), offset)?;
        }
        Ok(offset)
    }
}
