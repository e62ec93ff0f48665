//! Interfaces 01 and 10: the first VPU 2.x layouts.
//!
//! Full tensor descriptions for input, weights and output, raw geometry, one-hot execution
//! mode and activation, raw sparsity, one-hot swizzling keys and the output write tiles.
//! Interface 01 appends four reserved slots that are always zero.

use npucost_core::{DpuWorkload, Tensor};

use crate::compat::convert;
use crate::encoder::DescriptorRecipe;
use crate::error::Result;
use crate::input1::{DefaultInput1Builder, Input1Builder};
use crate::inserter::{InsertMode, Inserter};
use crate::intf::intf01;

use super::{insert_geometry, insert_sparsity};

const BASE_SIZE: usize = 84;

/// Recipe for interface 01 or 10.
#[derive(Debug, Clone)]
pub struct LegacyRecipe {
    version: u32,
    reserved: usize,
    input_1: DefaultInput1Builder,
}

impl LegacyRecipe {
    pub fn v01() -> Self {
        Self {
            version: 1,
            reserved: 4,
            input_1: DefaultInput1Builder,
        }
    }

    pub fn v10() -> Self {
        Self {
            version: 10,
            reserved: 0,
            input_1: DefaultInput1Builder,
        }
    }

    fn insert_tensor<M: InsertMode>(ins: &mut Inserter<'_, M>, t: &Tensor, offset: usize) -> Result<usize> {
        let dtype: intf01::DataType = convert(t.dtype)?;
        let layout: intf01::Layout = convert(t.layout)?;
        ins.tensor_with_layout(&t.shape, dtype, layout, t.sparsity_enabled, offset)
    }
}

impl DescriptorRecipe for LegacyRecipe {
    type Workload = DpuWorkload;

    fn interface_version(&self) -> u32 {
        self.version
    }

    fn declared_size(&self) -> usize {
        BASE_SIZE + self.reserved
    }

    fn sample_workload(&self) -> DpuWorkload {
        DpuWorkload::sample()
    }

    fn write<M: InsertMode>(&self, wl: &DpuWorkload, ins: &mut Inserter<'_, M>) -> Result<usize> {
        let device: intf01::Device = convert(wl.device)?;
        let op: intf01::Operation = convert(wl.op)?;
        let weights = self.input_1.construct_input_1(wl);

        let mut offset = ins.one_hot(device, 0)?;
        offset = ins.one_hot(op, offset)?;
        for t in [&wl.input_0, &weights, &wl.output_0] {
            offset = Self::insert_tensor(ins, t, offset)?;
        }
        offset = insert_geometry(ins, wl, offset)?;
        offset = ins.one_hot(convert::<intf01::ExecutionMode, _>(wl.execution_order)?, offset)?;
        offset = ins.one_hot(convert::<intf01::ActivationFunction, _>(wl.activation_function)?, offset)?;
        offset = insert_sparsity(ins, wl, false, offset)?;
        for key in [wl.input_0_swizzling, wl.input_1_swizzling, wl.output_0_swizzling] {
            offset = ins.one_hot(convert::<intf01::Swizzling, _>(key)?, offset)?;
        }
        offset = ins.uint(wl.output_write_tiles, offset)?;
        for _ in 0..self.reserved {
            offset = ins.value(0.0, offset)?;
        }
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{DescriptorEncoder, Preprocessing};
    use crate::error::EncodeError;
    use crate::versions::test_support::{assert_one_hot, encode};
    use npucost_core::{ActivationFunction, DataType, Device, ExecutionMode, Layout, Operation, Swizzling};

    fn conv() -> DpuWorkload {
        let input = Tensor::new([14, 14, 32, 1], DataType::Float16);
        let output = Tensor::new([14, 14, 64, 1], DataType::Float16);
        DpuWorkload::new(Device::Vpu2_0, Operation::Convolution, input, output, ExecutionMode::Matrix)
            .with_kernels([3, 3])
            .with_padding([1, 1, 1, 1])
    }

    #[test]
    fn sizes() {
        assert_eq!(encode(LegacyRecipe::v10(), &conv()).len(), 84);
        assert_eq!(encode(LegacyRecipe::v01(), &conv()).len(), 88);
    }

    #[test]
    fn field_positions() {
        let mut wl = conv();
        wl.activation_function = ActivationFunction::Relu;
        wl.output_0_swizzling = Swizzling::Key2;
        wl.output_write_tiles = 2;
        wl.act_sparsity = 0.25;
        let d = encode(LegacyRecipe::v10(), &wl);
        assert_one_hot(&d[0..4], 0);
        assert_one_hot(&d[4..10], 0);
        // input
        assert_eq!(&d[10..14], &[14.0, 14.0, 32.0, 1.0]);
        assert_one_hot(&d[14..18], 2);
        assert_one_hot(&d[18..20], 0);
        assert_eq!(d[20], 0.0);
        // weights
        assert_eq!(&d[21..25], &[1.0, 1.0, 288.0, 64.0]);
        // output
        assert_eq!(&d[32..36], &[14.0, 14.0, 64.0, 1.0]);
        assert_eq!(&d[43..51], &[3.0, 3.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_one_hot(&d[51..57], 1);
        assert_one_hot(&d[57..63], 1);
        assert_eq!(&d[63..65], &[0.25, 0.0]);
        assert_one_hot(&d[65..71], 0);
        assert_one_hot(&d[77..83], 2);
        assert_eq!(d[83], 2.0);
    }

    #[test]
    fn reserved_slots_are_zero() {
        let d = encode(LegacyRecipe::v01(), &conv());
        assert_eq!(&d[..84], &encode(LegacyRecipe::v10(), &conv())[..]);
        assert!(d[84..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn cmajor_and_xyz_share_a_position() {
        let mut wl = conv();
        wl.input_0 = wl.input_0.with_layout(Layout::Xyz);
        let xyz = encode(LegacyRecipe::v10(), &wl);
        wl.input_0 = wl.input_0.with_layout(Layout::Cmajor);
        assert_eq!(xyz, encode(LegacyRecipe::v10(), &wl));
        assert_one_hot(&xyz[18..20], 1);
    }

    #[test]
    fn newer_devices_and_types_are_rejected() {
        let enc = Preprocessing::new(LegacyRecipe::v10()).unwrap();
        let mut wl = conv();
        wl.device = Device::Vpu4_0;
        assert!(matches!(enc.encode(&wl), Err(EncodeError::EnumTranslation { .. })));
        let mut wl = conv();
        wl.input_0.dtype = DataType::Hf8;
        assert!(enc.encode(&wl).is_err());
        let mut wl = conv();
        wl.op = Operation::LayerNorm;
        assert!(enc.encode(&wl).is_err());
    }
}
