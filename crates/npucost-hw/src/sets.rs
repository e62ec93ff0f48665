//! Characteristics sets: one record per device, chosen when a cost model is built.
//!
//! Several sets coexist so historical (legacy) estimates can be reproduced next to the
//! current ones. A set is a plain value; nothing here is global.

use serde::{Deserialize, Serialize};

use npucost_core::{Device, TextEnum};

use crate::characteristics::{DeviceCharacteristics, HwCharacteristics};
use crate::config::CostModelConfig;
use crate::devices;

/// Which evolution of the characteristics a set holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetKind {
    /// Measured DMA latencies, ideal mixed memory transfers.
    #[default]
    MainEvo0,
    /// Adds post latency and mixed memory inefficiency.
    MainEvo1,
    /// Values used before DMA latencies were measured.
    Legacy,
}

impl SetKind {
    /// Parse a set name ("main-evo0", "main-evo1", "legacy").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "main-evo0" => Some(Self::MainEvo0),
            "main-evo1" => Some(Self::MainEvo1),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MainEvo0 => "main-evo0",
            Self::MainEvo1 => "main-evo1",
            Self::Legacy => "legacy",
        }
    }
}

/// Number of devices with a characteristics record. Devices past these resolve to the
/// default record.
const KNOWN_DEVICES: usize = 5;

/// Characteristics of every known device plus the default record.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicsSet {
    kind: SetKind,
    records: [HwCharacteristics; KNOWN_DEVICES],
    default: HwCharacteristics,
}

impl CharacteristicsSet {
    pub const fn main_evo0() -> Self {
        Self {
            kind: SetKind::MainEvo0,
            records: [
                devices::VPU2_0,
                devices::VPU2_1,
                devices::VPU2_7,
                devices::VPU4_0_EVO0,
                devices::NPU5_0_EVO0,
            ],
            default: devices::DEFAULT,
        }
    }

    pub const fn main_evo1() -> Self {
        Self {
            kind: SetKind::MainEvo1,
            records: [
                devices::VPU2_0,
                devices::VPU2_1,
                devices::VPU2_7,
                devices::VPU4_0_EVO1,
                devices::NPU5_0_EVO1,
            ],
            default: devices::DEFAULT,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            kind: SetKind::Legacy,
            records: [
                devices::VPU2_0,
                devices::VPU2_1,
                devices::VPU2_7,
                devices::VPU4_0_LEGACY,
                devices::NPU5_0_LEGACY,
            ],
            default: devices::DEFAULT,
        }
    }

    /// The set named by `kind`.
    pub const fn of_kind(kind: SetKind) -> Self {
        match kind {
            SetKind::MainEvo0 => Self::main_evo0(),
            SetKind::MainEvo1 => Self::main_evo1(),
            SetKind::Legacy => Self::legacy(),
        }
    }

    /// The configured set with its per-device overrides applied.
    pub fn from_config(config: &CostModelConfig) -> Self {
        let mut set = Self::of_kind(config.characteristics);
        for o in &config.overrides {
            match set.records.get_mut(o.device.index()) {
                Some(slot) => *slot = o.characteristics,
                None => tracing::warn!(
                    device = %o.device,
                    "ignoring characteristics override for a device without a record"
                ),
            }
        }
        set
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    /// Record for `device`; devices without one get the default record.
    pub fn record(&self, device: Device) -> &HwCharacteristics {
        match self.records.get(device.index()) {
            Some(r) => r,
            None => {
                tracing::debug!(device = %device, set = self.kind.name(), "using default characteristics");
                &self.default
            }
        }
    }

    /// Characteristics for `device`. Never fails.
    pub fn device(&self, device: Device) -> &dyn DeviceCharacteristics {
        self.record(device)
    }
}

impl Default for CharacteristicsSet {
    fn default() -> Self {
        Self::main_evo0()
    }
}
