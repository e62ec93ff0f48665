//! Closed form DPU cycle estimate.
//!
//! The estimate is the larger of two bounds:
//! - **MAC bound:** kernel area times output volume (times input channels for convolutions,
//!   minus the work skipped on zero padding), divided over the MAC array and scaled by the
//!   FP ratio when the computation runs natively on 16 bit floats. Elementwise operations
//!   use the PPE throughput instead, halved when the output is broadcast to several tiles.
//! - **CMX read bound:** bytes of activations and weights the NTHW/NTK grid reads from CMX,
//!   converted from CMX cycles to DPU cycles.

use npucost_core::cycles::START_ERROR_RANGE;
use npucost_core::types::compute_size_in_bytes;
use npucost_core::{CyclesInterfaceType, DataType, Device, DpuWorkload, Operation};
use npucost_hw::{CharacteristicsSet, DeviceCharacteristics};

use crate::provider::{report_source, CostProvider};

/// Theoretical DPU model over one characteristics set.
#[derive(Debug, Clone, Default)]
pub struct DpuTheoreticalProvider {
    set: CharacteristicsSet,
}

impl DpuTheoreticalProvider {
    pub const NAME: &'static str = "dpu-theoretical";

    pub fn new(set: CharacteristicsSet) -> Self {
        Self { set }
    }

    pub fn characteristics(&self) -> &CharacteristicsSet {
        &self.set
    }

    /// Estimated DPU cycles for `wl`.
    pub fn theoretical_cycles(&self, wl: &DpuWorkload) -> u64 {
        let hw = self.set.device(wl.device);
        let in_channels = u64::from(wl.input_0.channels());

        let mut cycles = u64::from(wl.kernels[0]) * u64::from(wl.kernels[1]) * wl.output_0.volume();
        let mt = if wl.output_write_tiles > 1 { 2 } else { 1 };
        let mut nr_macs = u64::from(hw.nr_macs());

        if wl.op == Operation::Eltwise {
            let ppe = u64::from(hw.nr_ppe() / mt).max(1);
            cycles = wl.input_0.volume().div_ceil(ppe);
        }
        if matches!(wl.op, Operation::Convolution | Operation::CmConvolution) {
            cycles = (cycles * in_channels).saturating_sub(padding_skip_cycles(wl));
        } else {
            nr_macs /= u64::from(hw.input_channels_mac().max(1));
        }

        cycles = cycles.div_ceil(nr_macs.max(1));
        if native_comp_on_fp16(wl.input_0.dtype) {
            cycles *= u64::from(hw.fp_ratio());
        }

        cycles.max(cmx_reads(wl, hw))
    }
}

impl CostProvider<DpuWorkload> for DpuTheoreticalProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn get_cost(&self, workload: &DpuWorkload, source: Option<&mut String>) -> CyclesInterfaceType {
        let cycles = self.theoretical_cycles(workload);
        report_source(source, Self::NAME);
        CyclesInterfaceType::try_from(cycles).map_or(START_ERROR_RANGE, |c| c.min(START_ERROR_RANGE))
    }
}

/// Computation runs on the FP16 datapath: 16 bit or wider float input.
fn native_comp_on_fp16(dtype: DataType) -> bool {
    dtype.is_float() && dtype.bytes() >= 2
}

/// Sum of `start + (start - step) + ...` over the positive terms.
fn stepped_sum(start: i64, step: i64) -> i64 {
    (1..=start).rev().step_by(step as usize).sum()
}

/// Overlap of two padded edges walked diagonally, counted once by each edge.
fn corner_overlap(mut i: i64, i_step: i64, mut j: i64, j_step: i64) -> i64 {
    let mut overlap = 0;
    while i > 0 && j > 0 {
        overlap += i * j;
        i -= i_step;
        j -= j_step;
    }
    overlap
}

/// MAC cycles the hardware skips because the window lies over zero padding.
pub fn padding_skip_cycles(wl: &DpuWorkload) -> u64 {
    let (kw, kh) = (i64::from(wl.kernels[0]), i64::from(wl.kernels[1]));
    let (sw, sh) = (i64::from(wl.strides[0].max(1)), i64::from(wl.strides[1].max(1)));
    let [pt, pb, pl, pr] = wl.padding.map(i64::from);
    let (in_w, in_h) = (i64::from(wl.input_0.width()), i64::from(wl.input_0.height()));

    // edge columns and rows the last stride step never reaches
    let right = pr - in_w % sw;
    let bottom = pb - in_h % sh;

    let cols = (in_w + sw - 1) / sw;
    let rows = (in_h + sh - 1) / sh;
    let top_cycles = stepped_sum(pt, sh) * kw * cols - corner_overlap(pt, sh, pl, sw) - corner_overlap(pt, sh, right, sw);
    let bottom_cycles =
        stepped_sum(bottom, sh) * kw * cols - corner_overlap(bottom, sh, pl, sw) - corner_overlap(bottom, sh, right, sw);
    let left_cycles = stepped_sum(pl, sw) * kh * rows;
    let right_cycles = stepped_sum(right, sw) * kh * rows;

    let total = (top_cycles + bottom_cycles + left_cycles + right_cycles).max(0) as u64;
    total * u64::from(wl.input_0.channels()) * u64::from(wl.output_0.channels())
}

/// DPU cycles spent reading activations and weights from CMX.
fn cmx_reads(wl: &DpuWorkload, hw: &dyn DeviceCharacteristics) -> u64 {
    if matches!(wl.device, Device::Vpu2_0 | Device::Vpu2_1) {
        return 0;
    }
    let [grid_x, grid_y, grid_z, _] = wl.execution_order.nthw_ntk_grid().map(f64::from);
    let (out_w, out_h, out_c) = (
        f64::from(wl.output_0.width()),
        f64::from(wl.output_0.height()),
        f64::from(wl.output_0.channels()),
    );
    let in_c = f64::from(wl.input_0.channels());
    let kernel_area = f64::from(wl.kernels[0]) * f64::from(wl.kernels[1]);

    let num_wt_grids = (out_c / grid_z).ceil();
    let num_act_grids = (out_h / grid_y).ceil() * (out_w / grid_x).ceil();

    let dtype = wl.input_0.dtype;
    let act_reads = compute_size_in_bytes((num_wt_grids * out_h * out_w * in_c * kernel_area).ceil() as u64, dtype);
    let wt_reads = compute_size_in_bytes((num_act_grids * out_c * in_c * kernel_area).ceil() as u64, dtype);

    let bytes_per_cycle = f64::from(hw.cmx_word_size_bytes() * hw.dpu_cmx_num_read_ports()).max(1.0);
    let reads = (act_reads + wt_reads) as f64 / bytes_per_cycle;
    (reads * f64::from(hw.cmx_fclk()) / f64::from(hw.dpu_fclk().max(1))).ceil() as u64
}
