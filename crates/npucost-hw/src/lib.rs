//! Device characteristics repository for the NPU cost model.
//!
//! - **Characteristics:** the per-device constant record and its read-only trait
//! - **Devices:** constant records for every generation and evolution
//! - **Sets:** main and legacy sets, indexed by device with a default fallback
//! - **Config:** TOML configuration selecting a set, overrides and DMA model switches

pub mod characteristics;
pub mod config;
pub mod devices;
pub mod error;
pub mod sets;

pub use characteristics::{DeviceCharacteristics, DmaLatencyParams, HwCharacteristics};
pub use config::{
    config_to_toml, load_config_toml, parse_config_toml, validate_config, CostModelConfig, DeviceOverride,
    ValidationIssue,
};
pub use error::{HwError, Result};
pub use sets::{CharacteristicsSet, SetKind};
