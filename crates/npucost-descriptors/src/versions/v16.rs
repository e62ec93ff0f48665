//! Interface 16: UINT16, dCIM execution and the reduce min/max flag.
//!
//! Sparsity is encoded raw. Tensor channels are described unpadded: the hardware pads them,
//! whatever the autopad flags say.

use crate::intf::intf16;

use super::CompactInterface;

#[derive(Debug, Clone, Copy)]
pub struct V16;

impl CompactInterface for V16 {
    const VERSION: u32 = 16;
    const SIZE: usize = 61;

    type DataType = intf16::DataType;
    type Operation = intf16::Operation;
    type ExecutionMode = intf16::ExecutionMode;

    const REQUANTIZED_SPARSITY: bool = false;
    const MEMORY_FLAGS: bool = true;
    const REDUCE_MINMAX_FLAG: bool = true;
}
