//! Constant characteristics records, one per device generation and evolution.

use crate::characteristics::{DmaLatencyParams, HwCharacteristics, PROF_CLK_HZ, PROF_CLK_MHZ};

/// VPU 2.0. No published DMA latency.
pub const VPU2_0: HwCharacteristics = HwCharacteristics {
    dpu_fclk: 700,
    cmx_fclk: 700,
    cmx_word_size_bytes: 16,
    dma_ddr_interface_bytes: 32,
    dpu_cmx_num_read_ports: 4,
    dram_bandwidth_mbps: 20000.0,
    nr_macs: 256,
    fp_ratio: 4,
    nr_ppe: 16,
    input_channels_mac: 1,
    ndpu_per_tile: 5,
    dma_ports: 1,
    profiling_clk_mhz: PROF_CLK_MHZ,
    profiling_clk_hz: PROF_CLK_HZ,
    latency: DmaLatencyParams::NONE,
};

/// VPU 2.1.
pub const VPU2_1: HwCharacteristics = HwCharacteristics {
    dpu_fclk: 850,
    cmx_fclk: 850,
    dma_ports: 2,
    ..VPU2_0
};

/// VPU 2.7, identical in every set.
pub const VPU2_7: HwCharacteristics = HwCharacteristics {
    dpu_fclk: 1300,
    cmx_fclk: 975,
    cmx_word_size_bytes: 16,
    dma_ddr_interface_bytes: 32,
    dpu_cmx_num_read_ports: 8,
    dram_bandwidth_mbps: 27000.0,
    nr_macs: 2048,
    fp_ratio: 2,
    nr_ppe: 64,
    input_channels_mac: 8,
    ndpu_per_tile: 1,
    dma_ports: 2,
    profiling_clk_mhz: PROF_CLK_MHZ,
    profiling_clk_hz: PROF_CLK_HZ,
    latency: DmaLatencyParams::new(956, 16, 0, 1.0),
};

/// VPU 4.0, first evolution: ideal DMA.
pub const VPU4_0_EVO0: HwCharacteristics = HwCharacteristics {
    dpu_fclk: 1700,
    cmx_fclk: 971,
    cmx_word_size_bytes: 32,
    dma_ddr_interface_bytes: 64,
    dpu_cmx_num_read_ports: 8,
    dram_bandwidth_mbps: 136000.0,
    nr_macs: 2048,
    fp_ratio: 2,
    nr_ppe: 64,
    input_channels_mac: 8,
    ndpu_per_tile: 1,
    dma_ports: 2,
    profiling_clk_mhz: PROF_CLK_MHZ / 2.0,
    profiling_clk_hz: PROF_CLK_HZ / 2,
    latency: DmaLatencyParams::new(300, 32, 0, 1.0),
};

/// VPU 4.0 with post latency and imperfect mixed memory transfers.
pub const VPU4_0_EVO1: HwCharacteristics = HwCharacteristics {
    latency: DmaLatencyParams::new(300, 32, 50, 0.958589),
    ..VPU4_0_EVO0
};

/// VPU 4.0 as modelled before DMA latencies were measured.
pub const VPU4_0_LEGACY: HwCharacteristics = HwCharacteristics {
    cmx_fclk: 975,
    dram_bandwidth_mbps: 45000.0,
    latency: DmaLatencyParams::new(956, 16, 0, 1.0),
    ..VPU4_0_EVO0
};

/// NPU 5.0, first evolution.
pub const NPU5_0_EVO0: HwCharacteristics = HwCharacteristics {
    dpu_fclk: 1950,
    cmx_fclk: 1114,
    cmx_word_size_bytes: 32,
    dma_ddr_interface_bytes: 64,
    dpu_cmx_num_read_ports: 8,
    dram_bandwidth_mbps: 136000.0,
    nr_macs: 4096,
    fp_ratio: 2,
    nr_ppe: 32,
    input_channels_mac: 8,
    ndpu_per_tile: 1,
    dma_ports: 2,
    profiling_clk_mhz: PROF_CLK_MHZ / 2.0,
    profiling_clk_hz: PROF_CLK_HZ / 2,
    latency: DmaLatencyParams::new(300, 32, 0, 1.0),
};

/// NPU 5.0 with post latency and imperfect mixed memory transfers.
pub const NPU5_0_EVO1: HwCharacteristics = HwCharacteristics {
    latency: DmaLatencyParams::new(300, 32, 50, 0.958589),
    ..NPU5_0_EVO0
};

pub const NPU5_0_LEGACY: HwCharacteristics = HwCharacteristics {
    dram_bandwidth_mbps: 45000.0,
    latency: DmaLatencyParams::new(956, 16, 0, 1.0),
    ..NPU5_0_EVO0
};

/// Record for devices without characteristics. Values are degenerate: lookups
/// never fail, the numbers they produce are meaningless.
pub const DEFAULT: HwCharacteristics = HwCharacteristics {
    dpu_fclk: 1,
    cmx_fclk: 1,
    cmx_word_size_bytes: 16,
    dma_ddr_interface_bytes: -1,
    dpu_cmx_num_read_ports: 8,
    dram_bandwidth_mbps: 1.0,
    nr_macs: 2048,
    fp_ratio: 2,
    nr_ppe: 64,
    input_channels_mac: 8,
    ndpu_per_tile: 1,
    dma_ports: 1,
    profiling_clk_mhz: 0.0,
    profiling_clk_hz: 0,
    latency: DmaLatencyParams::NONE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evolutions_only_change_dma_behaviour() {
        assert_eq!(VPU4_0_EVO1.nr_macs, VPU4_0_EVO0.nr_macs);
        assert_eq!(VPU4_0_EVO1.dram_bandwidth_mbps, VPU4_0_EVO0.dram_bandwidth_mbps);
        assert_eq!(NPU5_0_EVO1.dpu_fclk, 1950);
        assert!(NPU5_0_EVO1.latency.mixed_memory_efficiency < 1.0);
    }

    #[test]
    fn legacy_records_use_old_dram_model() {
        for hw in [VPU4_0_LEGACY, NPU5_0_LEGACY] {
            assert_eq!(hw.dram_bandwidth_mbps, 45000.0);
            assert_eq!(hw.latency.dram_latency_ns, 956);
        }
    }

    #[test]
    fn profiling_clock_halves_from_4_0() {
        assert_eq!(VPU2_7.profiling_clk_hz, 38_400_000);
        assert_eq!(VPU4_0_EVO0.profiling_clk_hz, 19_200_000);
        assert_eq!(NPU5_0_LEGACY.profiling_clk_mhz, 19.2);
    }

    #[test]
    fn default_is_degenerate() {
        assert_eq!(DEFAULT.dpu_fclk, 1);
        assert_eq!(DEFAULT.dma_ddr_interface_bytes, -1);
        assert_eq!(DEFAULT.profiling_clk_hz, 0);
    }
}
