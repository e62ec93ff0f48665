//! Interface 12: the first device independent layout, trained on NPU 4.0.

use crate::intf::intf12;

use super::CompactInterface;

#[derive(Debug, Clone, Copy)]
pub struct V12;

impl CompactInterface for V12 {
    const VERSION: u32 = 12;
    const SIZE: usize = 47;

    type DataType = intf12::DataType;
    type Operation = intf12::Operation;
    type ExecutionMode = intf12::ExecutionMode;
}
