//! TOML configuration of a cost model: which characteristics set to use, per-device
//! overrides and DMA model switches.
//!
//! ```toml
//! characteristics = "main-evo1"
//! dma-force-legacy-npu40 = false
//! dma-force-legacy-npu5x = true
//!
//! [[overrides]]
//! device = "VPU_2_7"
//! [overrides.characteristics]
//! dpu-fclk = 1300
//! ...
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use npucost_core::Device;

use crate::characteristics::HwCharacteristics;
use crate::error::{HwError, Result};
use crate::sets::SetKind;

/// A validation issue found in a configuration.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Replaces the characteristics of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeviceOverride {
    /// Device whose record is replaced.
    pub device: Device,
    /// Record used instead of the one from the selected set.
    pub characteristics: HwCharacteristics,
}

/// Cost model configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CostModelConfig {
    /// Characteristics set the cost model is built with.
    #[serde(default)]
    pub characteristics: SetKind,
    /// Use the legacy theoretical DMA formula on NPU 4.0.
    #[serde(default)]
    pub dma_force_legacy_npu40: bool,
    /// Use the legacy theoretical DMA formula on NPU 5.0 and later.
    #[serde(default)]
    pub dma_force_legacy_npu5x: bool,
    /// Per-device records replacing those of the selected set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<DeviceOverride>,
}

impl CostModelConfig {
    /// Whether the legacy theoretical DMA formula is forced for `device`.
    pub fn dma_force_legacy(&self, device: Device) -> bool {
        match device {
            Device::Vpu4_0 => self.dma_force_legacy_npu40,
            Device::Npu5_0 | Device::Npu6_0 => self.dma_force_legacy_npu5x,
            _ => false,
        }
    }
}

/// Load a configuration from a TOML file.
pub fn load_config_toml(path: &Path) -> Result<CostModelConfig> {
    if !path.exists() {
        return Err(HwError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_config_toml(&content)
}

/// Parse a configuration from a TOML string.
pub fn parse_config_toml(toml_str: &str) -> Result<CostModelConfig> {
    let config: CostModelConfig = toml::from_str(toml_str)?;
    Ok(config)
}

/// Serialize a configuration to pretty TOML.
pub fn config_to_toml(config: &CostModelConfig) -> Result<String> {
    let toml_str = toml::to_string_pretty(config)?;
    Ok(toml_str)
}

/// Validate a configuration.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_config(config: &CostModelConfig) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    for (i, o) in config.overrides.iter().enumerate() {
        let hw = &o.characteristics;
        let at = format!("override {} ({})", i, o.device);

        if hw.dpu_fclk == 0 || hw.cmx_fclk == 0 {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("{at}: clocks must be positive (dpu {}, cmx {})", hw.dpu_fclk, hw.cmx_fclk),
            });
        }
        if hw.nr_macs == 0 {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("{at}: nr-macs is 0"),
            });
        }
        if hw.dram_bandwidth_mbps <= 0.0 {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("{at}: dram bandwidth {} is not positive", hw.dram_bandwidth_mbps),
            });
        }
        let eff = hw.latency.mixed_memory_efficiency;
        if !(eff > 0.0 && eff <= 1.0) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("{at}: mixed memory efficiency {eff} outside (0, 1]"),
            });
        }
        if hw.dma_ddr_interface_bytes <= 0 {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("{at}: DMA DDR interface bytes {} is not positive", hw.dma_ddr_interface_bytes),
            });
        }
        if config.overrides[..i].iter().any(|prev| prev.device == o.device) {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("{at}: device overridden more than once, last one wins"),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
