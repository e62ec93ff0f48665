//! Enumerations of every descriptor interface version.
//!
//! Each namespace holds the enumerations exactly as the matching trained models expect
//! them: value order defines the one-hot position, so these tables never change once a
//! model has been trained against them.

pub mod intf01;
pub mod intf11;
pub mod intf12;
pub mod intf13;
pub mod intf14;
pub mod intf16;
pub mod intf_dma;
