//! Device characteristics: the per-generation hardware constants every cost formula uses.

use serde::{Deserialize, Serialize};

use npucost_core::{CyclesInterfaceType, MemoryLocation};

/// Profiling clock shared by every generation, in MHz.
pub const PROF_CLK_MHZ: f32 = 38.4;
/// Profiling clock shared by every generation, in Hz.
pub const PROF_CLK_HZ: i32 = 38_400_000;

/// Read-only view of one device's hardware constants.
pub trait DeviceCharacteristics {
    /// DPU clock in MHz.
    fn dpu_fclk(&self) -> u32;
    /// CMX clock in MHz.
    fn cmx_fclk(&self) -> u32;
    fn cmx_word_size_bytes(&self) -> u32;
    /// DMA engine bytes per cycle on the DDR side.
    fn dma_ddr_interface_bytes(&self) -> i32;
    fn dpu_cmx_num_read_ports(&self) -> u32;
    fn dram_bandwidth_mbps(&self) -> f32;
    fn nr_macs(&self) -> u32;
    /// Ratio of integer to FP16 compute throughput.
    fn fp_ratio(&self) -> u32;
    fn nr_ppe(&self) -> u32;
    fn input_channels_mac(&self) -> u32;
    fn ndpu_per_tile(&self) -> u32;
    fn dma_ports(&self) -> i32;
    fn profiling_clk_mhz(&self) -> f32;
    fn profiling_clk_hz(&self) -> i32;
    /// Fixed DMA latency in DPU cycles for a transfer touching `location`.
    fn dma_latency(&self, location: MemoryLocation) -> CyclesInterfaceType;
    /// Read and write efficiency in `[0, 1]` for a transfer from `src` to `dst`.
    fn dma_transfer_efficiency(&self, src: MemoryLocation, dst: MemoryLocation) -> (f32, f32);
}

/// DMA latency parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DmaLatencyParams {
    pub dram_latency_ns: i32,
    /// CMX access latency in CMX clock cycles.
    pub cmx_latency_cycles: i32,
    /// Latency added to every transfer, in CMX clock cycles.
    pub post_latency_cycles: i32,
    /// Efficiency of a transfer crossing DRAM and CMX.
    #[serde(default = "full_efficiency")]
    pub mixed_memory_efficiency: f32,
}

fn full_efficiency() -> f32 {
    1.0
}

impl DmaLatencyParams {
    /// No latency at all.
    pub const NONE: DmaLatencyParams = DmaLatencyParams::new(0, 0, 0, 1.0);

    pub const fn new(
        dram_latency_ns: i32,
        cmx_latency_cycles: i32,
        post_latency_cycles: i32,
        mixed_memory_efficiency: f32,
    ) -> Self {
        Self {
            dram_latency_ns,
            cmx_latency_cycles,
            post_latency_cycles,
            mixed_memory_efficiency,
        }
    }
}

/// Hardware constants of one device generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HwCharacteristics {
    pub dpu_fclk: u32,
    pub cmx_fclk: u32,
    pub cmx_word_size_bytes: u32,
    pub dma_ddr_interface_bytes: i32,
    pub dpu_cmx_num_read_ports: u32,
    pub dram_bandwidth_mbps: f32,
    pub nr_macs: u32,
    pub fp_ratio: u32,
    pub nr_ppe: u32,
    pub input_channels_mac: u32,
    pub ndpu_per_tile: u32,
    pub dma_ports: i32,
    pub profiling_clk_mhz: f32,
    pub profiling_clk_hz: i32,
    pub latency: DmaLatencyParams,
}

impl HwCharacteristics {
    /// Latency in DPU cycles.
    ///
    /// DRAM: `ns * dpu / 1000 + post * dpu / cmx`. CMX: `(cmx + post) * dpu / cmx`.
    /// Every division truncates and multiplications come first.
    pub const fn latency_cycles(&self, location: MemoryLocation) -> CyclesInterfaceType {
        let dpu = self.dpu_fclk as i64;
        let cmx = if self.cmx_fclk == 0 { 1 } else { self.cmx_fclk as i64 };
        let lat = &self.latency;
        let cycles = match location {
            MemoryLocation::Dram => {
                (lat.dram_latency_ns as i64 * dpu) / 1000 + (lat.post_latency_cycles as i64 * dpu) / cmx
            }
            _ => ((lat.cmx_latency_cycles as i64 + lat.post_latency_cycles as i64) * dpu) / cmx,
        };
        if cycles < 0 {
            0
        } else if cycles > CyclesInterfaceType::MAX as i64 {
            CyclesInterfaceType::MAX
        } else {
            cycles as CyclesInterfaceType
        }
    }
}

impl DeviceCharacteristics for HwCharacteristics {
    fn dpu_fclk(&self) -> u32 {
        self.dpu_fclk
    }

    fn cmx_fclk(&self) -> u32 {
        self.cmx_fclk
    }

    fn cmx_word_size_bytes(&self) -> u32 {
        self.cmx_word_size_bytes
    }

    fn dma_ddr_interface_bytes(&self) -> i32 {
        self.dma_ddr_interface_bytes
    }

    fn dpu_cmx_num_read_ports(&self) -> u32 {
        self.dpu_cmx_num_read_ports
    }

    fn dram_bandwidth_mbps(&self) -> f32 {
        self.dram_bandwidth_mbps
    }

    fn nr_macs(&self) -> u32 {
        self.nr_macs
    }

    fn fp_ratio(&self) -> u32 {
        self.fp_ratio
    }

    fn nr_ppe(&self) -> u32 {
        self.nr_ppe
    }

    fn input_channels_mac(&self) -> u32 {
        self.input_channels_mac
    }

    fn ndpu_per_tile(&self) -> u32 {
        self.ndpu_per_tile
    }

    fn dma_ports(&self) -> i32 {
        self.dma_ports
    }

    fn profiling_clk_mhz(&self) -> f32 {
        self.profiling_clk_mhz
    }

    fn profiling_clk_hz(&self) -> i32 {
        self.profiling_clk_hz
    }

    fn dma_latency(&self, location: MemoryLocation) -> CyclesInterfaceType {
        self.latency_cycles(location)
    }

    fn dma_transfer_efficiency(&self, src: MemoryLocation, dst: MemoryLocation) -> (f32, f32) {
        let eff = self.latency.mixed_memory_efficiency;
        match (src, dst) {
            (MemoryLocation::Dram, MemoryLocation::Cmx) => (1.0, eff),
            (MemoryLocation::Cmx, MemoryLocation::Dram) => (eff, 1.0),
            _ => (1.0, 1.0),
        }
    }
}
