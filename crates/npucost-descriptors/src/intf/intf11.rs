//! Interface 11 (VPU 2.7 beta and the models derived from it).

use npucost_core::text_enum;

use crate::compat::CompatibleEnum;

text_enum! {
    pub enum Device {
        Vpu2_0 => "VPU_2_0",
        Vpu2_1 => "VPU_2_1",
        Vpu2_7 => "VPU_2_7",
        Vpu4_0 => "VPU_4_0",
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
        Cuboid16x16 => "CUBOID_16x16",
        Cuboid8x16 => "CUBOID_8x16",
        Cuboid4x16 => "CUBOID_4x16",
    }
}

text_enum! {
    /// Permutation layouts, innermost dimension first.
    pub enum Layout {
        Xyz => "XYZ",
        Xzy => "XZY",
        Yxz => "YXZ",
        Yzx => "YZX",
        Zxy => "ZXY",
        Zyx => "ZYX",
        Invalid => "INVALID",
    }
}

text_enum! {
    pub enum IsiStrategy {
        Clustering => "Clustering",
        SplitOverH => "SplitOverH",
        SplitOverK => "SplitOverK",
    }
}

impl CompatibleEnum for Device {}
impl CompatibleEnum for DataType {}
impl CompatibleEnum for Operation {}
impl CompatibleEnum for Swizzling {}
impl CompatibleEnum for ExecutionMode {}
impl CompatibleEnum for IsiStrategy {}

impl CompatibleEnum for Layout {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] =
        &[("ZMAJOR", Some("ZXY")), ("CMAJOR", Some("XYZ"))];
}
