//! Interface 01, shared by descriptor versions 01 and 10 (VPU 2.0 / 2.1 generation).

use npucost_core::text_enum;

use crate::compat::CompatibleEnum;

text_enum! {
    pub enum Device {
        Vpu2_0 => "VPU_2_0",
        Vpu2_1 => "VPU_2_1",
        Vpu2_7 => "VPU_2_7",
        /// Placeholder slot; no present-day device converts to it.
        VpuReserved => "VPU_RESERVED",
    }
}

text_enum! {
    pub enum DataType {
        Uint8 => "UINT8",
        Int8 => "INT8",
        Float16 => "FLOAT16",
        Bfloat16 => "BFLOAT16",
    }
}

text_enum! {
    pub enum Operation {
        Convolution => "CONVOLUTION",
        DwConvolution => "DW_CONVOLUTION",
        Eltwise => "ELTWISE",
        Maxpool => "MAXPOOL",
        Avepool => "AVEPOOL",
        CmConvolution => "CM_CONVOLUTION",
    }
}

text_enum! {
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
    pub enum ExecutionMode {
        Vector => "VECTOR",
        Matrix => "MATRIX",
        VectorFp16 => "VECTOR_FP16",
        Cuboid16x16 => "CUBOID_16x16",
        Cuboid8x16 => "CUBOID_8x16",
        Cuboid4x16 => "CUBOID_4x16",
    }
}

text_enum! {
    /// Legacy layouts only.
    pub enum Layout {
        Zmajor => "ZMAJOR",
        Cmajor => "CMAJOR",
    }
}

impl CompatibleEnum for Device {}
impl CompatibleEnum for DataType {}
impl CompatibleEnum for Operation {}
impl CompatibleEnum for ActivationFunction {}
impl CompatibleEnum for Swizzling {}
impl CompatibleEnum for ExecutionMode {}

impl CompatibleEnum for Layout {
    // ZXY is the same memory order as ZMAJOR, XYZ the same as CMAJOR.
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] =
        &[("ZXY", Some("ZMAJOR")), ("XYZ", Some("CMAJOR"))];
}
