//! Interface 13: FLOAT32 category and the memory flags, trained on NPU 5.x.

use crate::intf::{intf12, intf13};

use super::CompactInterface;

#[derive(Debug, Clone, Copy)]
pub struct V13;

impl CompactInterface for V13 {
    const VERSION: u32 = 13;
    const SIZE: usize = 53;

    type DataType = intf13::DataType;
    type Operation = intf12::Operation;
    type ExecutionMode = intf12::ExecutionMode;

    const MEMORY_FLAGS: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Nn5xAdapter;
    use crate::versions::test_support::{assert_one_hot, encode};
    use crate::versions::CompactRecipe;
    use npucost_core::{DataType, Device, DpuWorkload, ExecutionMode, Layout, Operation, Tensor};

    fn recipe() -> CompactRecipe<V13, Nn5xAdapter> {
        CompactRecipe::new(Nn5xAdapter)
    }

    fn eltwise(output: DataType) -> DpuWorkload {
        let t = Tensor::new([32, 8, 128, 1], DataType::Float16);
        DpuWorkload::new(Device::Npu5_0, Operation::Eltwise, t, t.with_dtype(output), ExecutionMode::Cuboid16x16)
    }

    #[test]
    fn float32_has_its_own_category() {
        let d = encode(recipe(), &eltwise(DataType::Float32));
        assert_eq!(d.len(), 53);
        assert_one_hot(&d[11..15], 1);
        assert_one_hot(&d[23..27], 3);
    }

    #[test]
    fn memory_flags_trail_the_descriptor() {
        // same footprint and layout: in place, has weights
        let d = encode(recipe(), &eltwise(DataType::Bfloat16));
        assert_eq!(&d[50..53], &[1.0, 0.0, 0.0]);

        let mut wl = eltwise(DataType::Float16);
        wl.output_0.layout = Layout::Cmajor;
        wl.set_superdense(true);
        let d = encode(recipe(), &wl);
        assert_eq!(&d[50..53], &[0.0, 1.0, 1.0]);
        assert_one_hot(&d[44..50], 0);
    }

    #[test]
    fn convolution_never_in_place() {
        let mut wl = eltwise(DataType::Float16).with_kernels([3, 3]);
        wl.op = Operation::Convolution;
        let d = encode(recipe(), &wl);
        assert_eq!(&d[50..52], &[0.0, 0.0]);
    }
}
