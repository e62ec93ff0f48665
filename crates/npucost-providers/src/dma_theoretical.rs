//! Closed form DMA cycle estimate.
//!
//! Two formulas coexist. The legacy one (before NPU 4.0, or when the configuration forces
//! it) always runs on the legacy characteristics set and models CMX as a fixed SRAM word per
//! DPU cycle. The updated one runs on the configured set and models the DRAM bytes per
//! cycle bound, CMX to CMX permutation, DRAM to CMX decompression and the transfer
//! efficiency of mixed memory transfers.
//!
//! Both return `max(latency) + max(read cycles, write cycles)`.

use npucost_core::cycles::{cost_adder, to_cycles};
use npucost_core::{CyclesInterfaceType, Device, DmaWorkload, MemoryLocation, Tensor};
use npucost_hw::{CharacteristicsSet, CostModelConfig, DeviceCharacteristics};

use crate::provider::{report_source, CostProvider};

#[derive(Debug, Clone)]
pub struct DmaTheoreticalProvider {
    main: CharacteristicsSet,
    legacy: CharacteristicsSet,
    config: CostModelConfig,
}

impl DmaTheoreticalProvider {
    pub const NAME: &'static str = "dma-theoretical";

    pub fn new() -> Self {
        Self::from_config(&CostModelConfig::default())
    }

    pub fn from_config(config: &CostModelConfig) -> Self {
        Self {
            main: CharacteristicsSet::from_config(config),
            legacy: CharacteristicsSet::legacy(),
            config: config.clone(),
        }
    }

    /// Whether `device` is costed with the legacy formula.
    pub fn uses_legacy(&self, device: Device) -> bool {
        device < Device::Vpu4_0 || self.config.dma_force_legacy(device)
    }

    pub fn theoretical_cycles(&self, wl: &DmaWorkload) -> CyclesInterfaceType {
        if self.uses_legacy(wl.device) {
            self.legacy_cycles(wl)
        } else {
            self.updated_cycles(wl)
        }
    }

    /// Legacy formula over the legacy set.
    pub fn legacy_cycles(&self, wl: &DmaWorkload) -> CyclesInterfaceType {
        let hw = self.legacy.device(wl.device);
        let half_duplex =
            wl.device <= Device::Vpu2_7 && wl.input_location == MemoryLocation::Cmx && wl.output_location == MemoryLocation::Cmx;
        let permuted = wl.input.layout != wl.output.layout;
        let compressed = wl.input.size() != wl.output.size();

        let side = |tensor: &Tensor, location: MemoryLocation| {
            let on_cmx = location == MemoryLocation::Cmx;
            let bw = legacy_cycles_per_byte(hw, tensor, location, compressed && on_cmx, permuted && on_cmx, half_duplex);
            to_cycles(tensor.size() as f64 * f64::from(bw))
        };
        let input_cycles = side(&wl.input, wl.input_location);
        let output_cycles = side(&wl.output, wl.output_location);

        cost_adder(
            hw.dma_latency(wl.input_location).max(hw.dma_latency(wl.output_location)),
            input_cycles.max(output_cycles),
        )
    }

    /// Updated formula over the configured set.
    pub fn updated_cycles(&self, wl: &DmaWorkload) -> CyclesInterfaceType {
        let hw = self.main.device(wl.device);
        let dpu_per_cmx = hw.dpu_fclk() as f32 / hw.cmx_fclk() as f32;

        let cmx2cmx_permutation = wl.input.layout != wl.output.layout
            && wl.input_location == MemoryLocation::Cmx
            && wl.output_location == MemoryLocation::Cmx;
        let decompression = wl.input.size() < wl.output.size()
            && wl.input_location == MemoryLocation::Dram
            && wl.output_location == MemoryLocation::Cmx;
        let decompression_ratio = if decompression {
            wl.output.size() as f32 / wl.input.size() as f32
        } else {
            1.0
        };

        let (input_efficiency, output_efficiency) = hw.dma_transfer_efficiency(wl.input_location, wl.output_location);

        let read_bw = match wl.input_location {
            MemoryLocation::Dram => dram_bytes_per_cycle(hw),
            _ => hw.dma_ddr_interface_bytes(),
        };
        let read = wl.input.size() as f32 / (read_bw as f32 * input_efficiency);
        let input_cycles = to_cycles(f64::from(read * dpu_per_cmx));

        let write_bw = match wl.output_location {
            MemoryLocation::Dram => dram_bytes_per_cycle(hw),
            _ if cmx2cmx_permutation => wl.output.dtype.bytes() as i32,
            _ if decompression => {
                let max_bw = hw.dma_ddr_interface_bytes() as f32 * 2.0;
                max_bw.min(read_bw as f32 * decompression_ratio) as i32
            }
            _ => hw.dma_ddr_interface_bytes(),
        };
        let write = wl.output.size() as f32 / (write_bw as f32 * output_efficiency);
        let output_cycles = to_cycles(f64::from(write * dpu_per_cmx));

        cost_adder(
            hw.dma_latency(wl.input_location).max(hw.dma_latency(wl.output_location)),
            input_cycles.max(output_cycles),
        )
    }
}

impl Default for DmaTheoreticalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CostProvider<DmaWorkload> for DmaTheoreticalProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn get_cost(&self, workload: &DmaWorkload, source: Option<&mut String>) -> CyclesInterfaceType {
        let cycles = self.theoretical_cycles(workload);
        report_source(source, Self::NAME);
        cycles
    }
}

/// DPU cycles per byte of one transfer side in the legacy model.
fn legacy_cycles_per_byte(
    hw: &dyn DeviceCharacteristics,
    tensor: &Tensor,
    location: MemoryLocation,
    compression: bool,
    permute: bool,
    half_duplex: bool,
) -> f32 {
    match location {
        MemoryLocation::Dram => hw.dpu_fclk() as f32 / hw.dram_bandwidth_mbps(),
        _ => {
            let word = legacy_sram_word(tensor, compression, permute, half_duplex);
            hw.dpu_fclk() as f32 / hw.cmx_fclk() as f32 / word as f32
        }
    }
}

/// Bytes the legacy model moves per CMX cycle.
fn legacy_sram_word(tensor: &Tensor, compression: bool, permute: bool, half_duplex: bool) -> u64 {
    if permute {
        return u64::from(tensor.dtype.bytes().max(1));
    }
    let full_duplex = if compression { 64 } else { 32 };
    let word = if half_duplex { full_duplex / 2 } else { full_duplex };
    tensor.size().clamp(1, word)
}

/// DRAM bytes per CMX cycle, bounded by the DMA interface width.
fn dram_bytes_per_cycle(hw: &dyn DeviceCharacteristics) -> i32 {
    let ddr = (hw.dram_bandwidth_mbps() / hw.cmx_fclk() as f32).floor() as i32;
    ddr.min(hw.dma_ddr_interface_bytes())
}
