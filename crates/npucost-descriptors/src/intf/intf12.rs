//! Interface 12: device independent descriptors for NPU 4.0.
//!
//! Datatypes collapse onto three performance categories. Operations, execution modes and
//! output layouts defined here are reused by versions 13 and 14.

use npucost_core::text_enum;

use crate::compat::CompatibleEnum;

text_enum! {
    pub enum DataType {
        Uint8 => "UINT8",
        Float16 => "FLOAT16",
        Hf8 => "HF8",
    }
}

impl CompatibleEnum for DataType {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[
        ("INT8", Some("UINT8")),
        ("BFLOAT16", Some("FLOAT16")),
        ("BF8", Some("HF8")),
        // no profiling for sub byte types, same runtime as 8 bit
        ("UINT4", Some("UINT8")),
        ("INT4", Some("UINT8")),
        ("UINT2", Some("UINT8")),
        ("INT2", Some("UINT8")),
        ("UINT1", Some("UINT8")),
        ("INT1", Some("UINT8")),
        ("INT32", Some("FLOAT16")),
        ("FLOAT32", Some("FLOAT16")),
        ("UINT16", Some("FLOAT16")),
        ("INT16", Some("FLOAT16")),
        ("FLOAT4", None),
    ];
}

text_enum! {
    pub enum Operation {
        Convolution => "CONVOLUTION",
        DwConvolution => "DW_CONVOLUTION",
        /// ADD and SUB.
        Eltwise => "ELTWISE",
        Maxpool => "MAXPOOL",
        CmConvolution => "CM_CONVOLUTION",
        ReduceMs => "REDUCE_MS",
        ReduceSumSquares => "REDUCE_SUMSQUARES",
    }
}

impl CompatibleEnum for Operation {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[
        ("AVEPOOL", Some("DW_CONVOLUTION")),
        // never profiled, runs as a convolution
        ("LAYER_NORM", Some("CONVOLUTION")),
        ("ELTWISE_MUL", Some("ELTWISE")),
        ("REDUCE_MINMAX", None),
    ];
}

text_enum! {
    pub enum ExecutionMode {
        Cuboid16x16 => "CUBOID_16x16",
        Cuboid8x16 => "CUBOID_8x16",
        Cuboid4x16 => "CUBOID_4x16",
    }
}

impl CompatibleEnum for ExecutionMode {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[
        ("VECTOR", None),
        ("MATRIX", None),
        ("VECTOR_FP16", None),
        ("dCIM_32x128", None),
    ];
}

text_enum! {
    /// Output data unit permutation, innermost dimension first.
    pub enum Layout {
        Xyz => "XYZ",
        Xzy => "XZY",
        Yxz => "YXZ",
        Yzx => "YZX",
        Zxy => "ZXY",
        Zyx => "ZYX",
    }
}

impl CompatibleEnum for Layout {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[
        ("ZMAJOR", Some("ZXY")),
        ("CMAJOR", Some("XYZ")),
    ];
}
