//! Translation of present-day enumeration values into the enumerations an interface
//! version was trained with.
//!
//! The bridge is the canonical text key. A present-day value is turned into its text, the
//! text optionally goes through the target's logical remap table (several present-day
//! values collapsing onto one the interface knows), and the result is looked up in the
//! target's inverse map. Every step either succeeds or fails loudly; there is no fallback
//! to index zero.

use npucost_core::TextEnum;

use crate::error::{EncodeError, Result};

/// An enumeration of a descriptor interface version.
pub trait CompatibleEnum: TextEnum {
    /// Present-day text to interface text. `None` marks a value the interface explicitly
    /// does not support. Texts missing from the table are looked up unchanged.
    const LOGICAL_REMAP: &'static [(&'static str, Option<&'static str>)] = &[];

    /// Apply the logical remap table to a present-day text.
    fn logical_text(text: &'static str) -> Result<&'static str> {
        match Self::LOGICAL_REMAP.iter().find(|(from, _)| *from == text) {
            None => Ok(text),
            Some((_, Some(to))) => Ok(to),
            Some((_, None)) => Err(EncodeError::LogicalRemap {
                value: text.to_string(),
                target: Self::NAME,
            }),
        }
    }
}

/// Convert a present-day value into the interface enumeration `T`.
pub fn convert<T: CompatibleEnum, P: TextEnum>(present: P) -> Result<T> {
    let text = present.as_text();
    let logical = T::logical_text(text).inspect_err(|_| {
        tracing::warn!(value = text, target = T::NAME, "value not supported by interface");
    })?;
    T::from_text(logical).ok_or_else(|| {
        tracing::warn!(value = text, logical, target = T::NAME, "value unmapped in interface");
        EncodeError::EnumTranslation {
            value: text.to_string(),
            target: T::NAME,
            candidates: T::describe_map(),
        }
    })
}

/// Convert an interface value back to the present-day enumeration with the same text.
pub fn to_present<P: TextEnum, T: CompatibleEnum>(value: T) -> Result<P> {
    P::from_text(value.as_text()).ok_or_else(|| EncodeError::EnumTranslation {
        value: value.as_text().to_string(),
        target: P::NAME,
        candidates: P::describe_map(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intf::{intf01, intf11, intf12, intf16};
    use npucost_core::{DataType, Device, ExecutionMode, Layout, Operation};

    #[test]
    fn direct_mapping_keeps_text() {
        let d: intf11::Device = convert(Device::Vpu2_7).unwrap();
        assert_eq!(d, intf11::Device::Vpu2_7);
        let back: Device = to_present(d).unwrap();
        assert_eq!(back, Device::Vpu2_7);
    }

    #[test]
    fn round_trip_for_every_shared_value() {
        for dtype in DataType::variants() {
            if let Some(t) = intf11::DataType::from_text(dtype.as_text()) {
                let converted: intf11::DataType = convert(*dtype).unwrap();
                assert_eq!(converted, t);
                assert_eq!(to_present::<DataType, _>(converted).unwrap(), *dtype);
            }
        }
        for op in Operation::variants() {
            if let Ok(converted) = convert::<intf16::Operation, _>(*op) {
                if converted.as_text() == op.as_text() {
                    assert_eq!(to_present::<Operation, _>(converted).unwrap(), *op);
                }
            }
        }
    }

    #[test]
    fn logical_remap_collapses_values() {
        let t: intf16::DataType = convert(DataType::Int8).unwrap();
        assert_eq!(t, intf16::DataType::Uint8);
        let t: intf16::DataType = convert(DataType::Bf8).unwrap();
        assert_eq!(t, intf16::DataType::Hf8);
        let l: intf11::Layout = convert(Layout::Zmajor).unwrap();
        assert_eq!(l, intf11::Layout::Zxy);
    }

    #[test]
    fn unsupported_value_is_an_error_not_zero() {
        let err = convert::<intf11::DataType, _>(DataType::Uint4).unwrap_err();
        match err {
            EncodeError::EnumTranslation {
                value,
                target,
                candidates,
            } => {
                assert_eq!(value, "UINT4");
                assert_eq!(target, "DataType");
                assert!(candidates.contains("(0:UINT8)"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(convert::<intf01::Device, _>(Device::Vpu4_0).is_err());
    }

    #[test]
    fn explicitly_unsupported_value() {
        let err = convert::<intf12::ExecutionMode, _>(ExecutionMode::Vector).unwrap_err();
        assert!(matches!(err, EncodeError::LogicalRemap { .. }));
        assert!(err.to_string().contains("VECTOR"));
    }
}
