//! Interface 16: 16 bit integers, dCIM execution and min/max reductions.

use npucost_core::text_enum;

use crate::compat::CompatibleEnum;

text_enum! {
    pub enum DataType {
        Uint8 => "UINT8",
        Float16 => "FLOAT16",
        Hf8 => "HF8",
        Float32 => "FLOAT32",
        Uint4 => "UINT4",
        Uint16 => "UINT16",
    }
}

impl CompatibleEnum for DataType {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[
        ("INT8", Some("UINT8")),
        ("BFLOAT16", Some("FLOAT16")),
        ("BF8", Some("HF8")),
        ("INT4", Some("UINT4")),
        ("UINT2", Some("UINT4")),
        ("INT2", Some("UINT4")),
        // not supported, closest category
        ("UINT1", Some("UINT8")),
        ("INT1", Some("UINT8")),
        ("INT32", Some("FLOAT16")),
        ("INT16", Some("UINT16")),
        ("FLOAT4", Some("HF8")),
    ];
}

text_enum! {
    pub enum Operation {
        Convolution => "CONVOLUTION",
        DwConvolution => "DW_CONVOLUTION",
        Eltwise => "ELTWISE",
        Maxpool => "MAXPOOL",
        CmConvolution => "CM_CONVOLUTION",
        /// Reduce mean, reduce sum and, flagged separately, reduce min/max.
        ReduceMs => "REDUCE_MS",
        ReduceSumSquares => "REDUCE_SUMSQUARES",
    }
}

impl CompatibleEnum for Operation {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[
        ("AVEPOOL", Some("DW_CONVOLUTION")),
        ("LAYER_NORM", Some("CONVOLUTION")),
        ("ELTWISE_MUL", Some("ELTWISE")),
        ("REDUCE_MINMAX", Some("REDUCE_MS")),
    ];
}

text_enum! {
    pub enum ExecutionMode {
        Cuboid16x16 => "CUBOID_16x16",
        Cuboid8x16 => "CUBOID_8x16",
        Cuboid4x16 => "CUBOID_4x16",
        Dcim32x128 => "dCIM_32x128",
    }
}

impl CompatibleEnum for ExecutionMode {
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] =
        &[("VECTOR", None), ("MATRIX", None), ("VECTOR_FP16", None)];
}
