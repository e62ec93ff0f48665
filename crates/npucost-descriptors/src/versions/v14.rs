//! Interface 14: UINT4 category and channel autopad.

use crate::intf::{intf12, intf14};

use super::CompactInterface;

#[derive(Debug, Clone, Copy)]
pub struct V14;

impl CompactInterface for V14 {
    const VERSION: u32 = 14;
    const SIZE: usize = 56;

    type DataType = intf14::DataType;
    type Operation = intf12::Operation;
    type ExecutionMode = intf12::ExecutionMode;

    const INPUT_AUTOPAD: bool = true;
    const OUTPUT_AUTOPAD: bool = true;
    const MEMORY_FLAGS: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Nn5xAdapter;
    use crate::versions::test_support::{assert_one_hot, encode};
    use crate::versions::CompactRecipe;
    use npucost_core::{DataType, Device, DpuWorkload, ExecutionMode, Operation, Tensor};

    fn recipe() -> CompactRecipe<V14, Nn5xAdapter> {
        CompactRecipe::new(Nn5xAdapter)
    }

    fn small_channels() -> DpuWorkload {
        let input = Tensor::new([56, 56, 3, 1], DataType::Uint8);
        let output = Tensor::new([56, 56, 8, 1], DataType::Uint8);
        DpuWorkload::new(Device::Npu5_0, Operation::Convolution, input, output, ExecutionMode::Cuboid16x16)
            .with_kernels([3, 3])
    }

    #[test]
    fn autopad_raises_channels_to_sixteen() {
        let wl = small_channels();
        let d = encode(recipe(), &wl);
        assert_eq!(d.len(), 56);
        assert_eq!((d[9], d[23]), (3.0, 8.0));

        let mut wl = small_channels();
        wl.input_autopad = Some(true);
        wl.output_autopad = Some(true);
        let d = encode(recipe(), &wl);
        assert_eq!((d[9], d[23]), (16.0, 16.0));
    }

    #[test]
    fn autopad_flag_pads_even_when_false() {
        let mut wl = small_channels();
        wl.input_autopad = Some(false);
        wl.output_autopad = Some(false);
        let d = encode(recipe(), &wl);
        assert_eq!((d[9], d[23]), (16.0, 16.0));
    }

    #[test]
    fn sub_byte_weights() {
        let mut wl = small_channels();
        wl.weight_type = Some(DataType::Int4);
        let d = encode(recipe(), &wl);
        assert_one_hot(&d[11..16], 0);
        assert_one_hot(&d[16..21], 4);
    }

    #[test]
    fn sparsity_still_requantized() {
        let wl = small_channels().with_sparsity(0.333_333_33, 0.0, false);
        let d = encode(recipe(), &wl);
        assert_eq!(d[41], "0.333333".parse::<f32>().unwrap());
    }
}
