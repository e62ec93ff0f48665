//! Interface 11: the VPU 2.7 / NPU 4.0 layout shared by several trained models.
//!
//! The field order is fixed; the adapter decides what values go into it. Version ids 11,
//! 89, 4011 and 4111 all encode with this recipe and differ only in their adapter.

use npucost_core::{DpuWorkload, Tensor};

use crate::adapters::WorkloadAdapter;
use crate::compat::convert;
use crate::encoder::DescriptorRecipe;
use crate::error::Result;
use crate::input1::{DefaultInput1Builder, Input1Builder};
use crate::inserter::{InsertMode, Inserter};
use crate::intf::intf11;

use super::{insert_geometry, insert_sparsity};

const SIZE: usize = 93;

#[derive(Debug, Clone)]
pub struct V11Recipe<A> {
    version: u32,
    adapter: A,
    input_1: DefaultInput1Builder,
}

impl<A: WorkloadAdapter> V11Recipe<A> {
    pub fn new(version: u32, adapter: A) -> Self {
        Self {
            version,
            adapter,
            input_1: DefaultInput1Builder,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn insert_tensor<M: InsertMode>(&self, ins: &mut Inserter<'_, M>, t: &Tensor, offset: usize) -> Result<usize> {
        let dtype: intf11::DataType = convert(self.adapter.mock_replace_datatypes(t.dtype))?;
        let layout: intf11::Layout = convert(t.layout)?;
        ins.tensor_with_layout(&t.shape, dtype, layout, t.sparsity_enabled, offset)
    }
}

impl<A: WorkloadAdapter> DescriptorRecipe for V11Recipe<A> {
    type Workload = DpuWorkload;

    fn interface_version(&self) -> u32 {
        self.version
    }

    fn declared_size(&self) -> usize {
        SIZE
    }

    fn sample_workload(&self) -> DpuWorkload {
        DpuWorkload::sample()
    }

    fn write<M: InsertMode>(&self, wl: &DpuWorkload, ins: &mut Inserter<'_, M>) -> Result<usize> {
        let adapter = &self.adapter;
        let op = adapter.mock_replace_operations(wl.op);
        let device: intf11::Device = convert(adapter.mock_replace_devices(wl.device))?;
        let input_0 = adapter.alternative_input0_spatial_memory(wl);
        let weights = self.input_1.construct_input_1(wl);

        let mut offset = ins.one_hot(device, 0)?;
        offset = ins.one_hot(convert::<intf11::Operation, _>(op)?, offset)?;
        for t in [&input_0, &weights, &wl.output_0] {
            offset = self.insert_tensor(ins, t, offset)?;
        }
        offset = insert_geometry(ins, wl, offset)?;
        offset = ins.one_hot(convert::<intf11::ExecutionMode, _>(wl.execution_order)?, offset)?;
        offset = insert_sparsity(ins, wl, true, offset)?;

        let (s0, s1, s2) =
            adapter.establish_unique_swizzling(wl.input_0_swizzling, wl.input_1_swizzling, wl.output_0_swizzling, op);
        for key in [s0, s1, s2] {
            offset = ins.one_hot(convert::<intf11::Swizzling, _>(key)?, offset)?;
        }

        let filtered = adapter.avoid_untrained_space(wl);
        offset = ins.uint(filtered.owt, offset)?;
        ins.one_hot(convert::<intf11::IsiStrategy, _>(filtered.isi)?, offset)
    }
}
