//! Present-day enumerations.
//!
//! These are the values a workload is described with today. Older descriptor
//! interfaces translate them through their canonical text keys.

use crate::text_enum;

text_enum! {
    /// NPU hardware generation.
    pub enum Device {
        Vpu2_0 => "VPU_2_0",
        Vpu2_1 => "VPU_2_1",
        Vpu2_7 => "VPU_2_7",
        Vpu4_0 => "VPU_4_0",
        Npu5_0 => "NPU_5_0",
        /// Announced generation without published characteristics.
        Npu6_0 => "NPU_6_0",
    }
}

impl Device {
    /// Memory locations a DMA can reach on this generation.
    pub fn memory_locations(self) -> &'static [MemoryLocation] {
        match self {
            Device::Vpu2_0 => &[MemoryLocation::Dram, MemoryLocation::Cmx, MemoryLocation::Upa],
            Device::Vpu2_1 => &[
                MemoryLocation::Dram,
                MemoryLocation::Cmx,
                MemoryLocation::Upa,
                MemoryLocation::Csram,
            ],
            _ => &[MemoryLocation::Dram, MemoryLocation::Cmx],
        }
    }
}

text_enum! {
    /// Element datatype of a tensor.
    pub enum DataType {
        Uint8 => "UINT8",
        Int8 => "INT8",
        Float16 => "FLOAT16",
        Bfloat16 => "BFLOAT16",
        Bf8 => "BF8",
        Hf8 => "HF8",
        Uint4 => "UINT4",
        Int4 => "INT4",
        Uint2 => "UINT2",
        Int2 => "INT2",
        Uint1 => "UINT1",
        Int1 => "INT1",
        Int32 => "INT32",
        Float32 => "FLOAT32",
        Uint16 => "UINT16",
        Int16 => "INT16",
        Float4 => "FLOAT4",
    }
}

impl DataType {
    /// Storage bytes per element; sub-byte types report 1.
    pub fn bytes(self) -> u32 {
        match self {
            DataType::Float16 | DataType::Bfloat16 | DataType::Uint16 | DataType::Int16 => 2,
            DataType::Int32 | DataType::Float32 => 4,
            _ => 1,
        }
    }

    /// How many elements share one byte.
    pub fn elements_per_byte(self) -> u32 {
        match self {
            DataType::Uint4 | DataType::Int4 | DataType::Float4 => 2,
            DataType::Uint2 | DataType::Int2 => 4,
            DataType::Uint1 | DataType::Int1 => 8,
            _ => 1,
        }
    }

    /// Whether this is a floating point type.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            DataType::Float16
                | DataType::Bfloat16
                | DataType::Bf8
                | DataType::Hf8
                | DataType::Float32
                | DataType::Float4
        )
    }

    /// Whether two datatypes occupy the same memory per element.
    pub fn same_footprint(self, other: DataType) -> bool {
        self.bytes() == other.bytes() && self.elements_per_byte() == other.elements_per_byte()
    }
}

/// Bytes needed to store `elements` values of `dtype`. Sub-byte types are packed and a
/// partial trailing byte counts as a full one.
pub fn compute_size_in_bytes(elements: u64, dtype: DataType) -> u64 {
    if elements == 0 {
        return 0;
    }
    let per_byte = u64::from(dtype.elements_per_byte());
    if per_byte > 1 {
        elements.div_ceil(per_byte)
    } else {
        elements * u64::from(dtype.bytes())
    }
}

text_enum! {
    /// DPU operation kind.
    pub enum Operation {
        Convolution => "CONVOLUTION",
        DwConvolution => "DW_CONVOLUTION",
        Eltwise => "ELTWISE",
        Maxpool => "MAXPOOL",
        Avepool => "AVEPOOL",
        CmConvolution => "CM_CONVOLUTION",
        LayerNorm => "LAYER_NORM",
        EltwiseMul => "ELTWISE_MUL",
        /// Reduce mean or reduce sum.
        ReduceMs => "REDUCE_MS",
        ReduceSumSquares => "REDUCE_SUMSQUARES",
        ReduceMinMax => "REDUCE_MINMAX",
    }
}

text_enum! {
    /// Post-processing activation.
    pub enum ActivationFunction {
        None => "NONE",
        Relu => "RELU",
        Lrelu => "LRELU",
        Add => "ADD",
        Sub => "SUB",
        Mult => "MULT",
    }
}

text_enum! {
    /// Memory swizzling key. `Key0` means disabled.
    pub enum Swizzling {
        Key0 => "KEY_0",
        Key1 => "KEY_1",
        Key2 => "KEY_2",
        Key3 => "KEY_3",
        Key4 => "KEY_4",
        Key5 => "KEY_5",
    }
}

text_enum! {
    /// MPE execution mode.
    pub enum ExecutionMode {
        Vector => "VECTOR",
        Matrix => "MATRIX",
        VectorFp16 => "VECTOR_FP16",
        Cuboid16x16 => "CUBOID_16x16",
        Cuboid8x16 => "CUBOID_8x16",
        Cuboid4x16 => "CUBOID_4x16",
        Dcim32x128 => "dCIM_32x128",
    }
}

impl ExecutionMode {
    /// MPE grid as `[X, Y, Z, B]`.
    pub fn mpe_grid(self) -> [u32; 4] {
        match self {
            ExecutionMode::Vector => [16, 1, 16, 1],
            ExecutionMode::VectorFp16 => [4, 1, 16, 1],
            _ => [4, 4, 16, 1],
        }
    }

    /// NTHW/NTK grid as `[X, Y, Z, B]`.
    pub fn nthw_ntk_grid(self) -> [u32; 4] {
        match self {
            ExecutionMode::Cuboid4x16 => [8, 8, 256, 1],
            ExecutionMode::Cuboid8x16 => [16, 8, 128, 1],
            ExecutionMode::Cuboid16x16 => [16, 16, 64, 1],
            _ => [1, 1, 1, 1],
        }
    }
}

text_enum! {
    /// Tensor memory layout.
    pub enum Layout {
        Zmajor => "ZMAJOR",
        Cmajor => "CMAJOR",
        Xyz => "XYZ",
        Xzy => "XZY",
        Yxz => "YXZ",
        Yzx => "YZX",
        Zxy => "ZXY",
        Zyx => "ZYX",
        Invalid => "INVALID",
    }
}

impl Layout {
    /// Dimension indices (0=W, 1=H, 2=C, 3=B) from innermost to outermost.
    ///
    /// Lettered layouts list dimensions from innermost to outermost: `XYZ` is NCHW. ZMAJOR
    /// is `ZXY` and CMAJOR is `XYZ`.
    pub fn order(self) -> [usize; 4] {
        match self {
            Layout::Cmajor | Layout::Xyz => [0, 1, 2, 3],
            Layout::Xzy => [0, 2, 1, 3],
            Layout::Yxz => [1, 0, 2, 3],
            Layout::Yzx => [1, 2, 0, 3],
            Layout::Zyx => [2, 1, 0, 3],
            Layout::Zmajor | Layout::Zxy | Layout::Invalid => [2, 0, 1, 3],
        }
    }
}

text_enum! {
    /// Inter-slice-interconnect strategy.
    pub enum IsiStrategy {
        Clustering => "Clustering",
        SplitOverH => "SplitOverH",
        SplitOverK => "SplitOverK",
    }
}

text_enum! {
    /// Where a DMA reads or writes.
    pub enum MemoryLocation {
        Dram => "DRAM",
        Cmx => "CMX",
        Csram => "CSRAM",
        Upa => "UPA",
    }
}

text_enum! {
    /// DMA transfer direction.
    pub enum MemoryDirection {
        Ddr2Cmx => "DDR2CMX",
        Cmx2Cmx => "CMX2CMX",
        Cmx2Ddr => "CMX2DDR",
        Ddr2Ddr => "DDR2DDR",
    }
}

text_enum! {
    /// Number of DMA engines used by a transfer.
    pub enum DmaEngines {
        One => "Num_Engine_1",
        Two => "Num_Engine_2",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextEnum;

    #[test]
    fn cardinalities() {
        assert_eq!(Device::COUNT, 6);
        assert_eq!(DataType::COUNT, 17);
        assert_eq!(Operation::COUNT, 11);
        assert_eq!(Swizzling::COUNT, 6);
        assert_eq!(ExecutionMode::COUNT, 7);
        assert_eq!(Layout::COUNT, 9);
        assert_eq!(IsiStrategy::COUNT, 3);
        assert_eq!(MemoryDirection::COUNT, 4);
    }

    #[test]
    fn layout_orders() {
        assert_eq!(Layout::Zmajor.order(), [2, 0, 1, 3]);
        assert_eq!(Layout::Cmajor.order(), [0, 1, 2, 3]);
        assert_eq!(Layout::Zxy.order(), Layout::Zmajor.order());
        assert_eq!(Layout::Xyz.order(), Layout::Cmajor.order());
        assert_eq!(Layout::Yzx.order(), [1, 2, 0, 3]);
    }

    #[test]
    fn memory_locations_per_device() {
        assert!(Device::Vpu2_1.memory_locations().contains(&MemoryLocation::Csram));
        assert!(!Device::Vpu2_7.memory_locations().contains(&MemoryLocation::Upa));
    }

    #[test]
    fn isi_text_keys() {
        assert_eq!(IsiStrategy::SplitOverH.as_text(), "SplitOverH");
        assert_eq!(IsiStrategy::from_text("Clustering"), Some(IsiStrategy::Clustering));
    }

    #[test]
    fn datatype_footprints() {
        assert_eq!(DataType::Float16.bytes(), 2);
        assert_eq!(DataType::Float32.bytes(), 4);
        assert_eq!(DataType::Int4.elements_per_byte(), 2);
        assert!(DataType::Uint8.same_footprint(DataType::Int8));
        assert!(!DataType::Uint8.same_footprint(DataType::Float16));
        assert!(!DataType::Uint8.same_footprint(DataType::Uint4));
    }

    #[test]
    fn packed_sizes_round_up() {
        assert_eq!(compute_size_in_bytes(0, DataType::Float16), 0);
        assert_eq!(compute_size_in_bytes(5, DataType::Uint4), 3);
        assert_eq!(compute_size_in_bytes(9, DataType::Int1), 2);
        assert_eq!(compute_size_in_bytes(10, DataType::Float16), 20);
    }

    #[test]
    fn serde_uses_text_keys() {
        let json = serde_json::to_string(&ExecutionMode::Cuboid16x16).unwrap();
        assert_eq!(json, "\"CUBOID_16x16\"");
        let back: Device = serde_json::from_str("\"VPU_4_0\"").unwrap();
        assert_eq!(back, Device::Vpu4_0);
    }
}
