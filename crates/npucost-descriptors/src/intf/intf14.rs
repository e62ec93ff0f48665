//! Interface 14: adds UINT4 for palletized weights.

use npucost_core::text_enum;

use crate::compat::CompatibleEnum;

text_enum! {
    pub enum DataType {
        Uint8 => "UINT8",
        Float16 => "FLOAT16",
        Hf8 => "HF8",
        Float32 => "FLOAT32",
        /// Sub byte types, used for palletization.
        Uint4 => "UINT4",
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
        ("UINT1", Some("UINT8")),
        ("INT1", Some("UINT8")),
        ("INT32", Some("FLOAT16")),
        ("UINT16", Some("FLOAT16")),
        ("INT16", Some("FLOAT16")),
        ("FLOAT4", None),
    ];
}
