//! Workload adapters: per trained-model policies that move a present-day workload back
//! into the space the model was trained on.
//!
//! Adapters are stateless. An encoder asks its adapter for replacement values and encodes
//! those; the workload itself is never modified.

use std::fmt;

use npucost_core::{DataType, Device, DpuWorkload, IsiStrategy, Operation, Swizzling, Tensor};

/// Split strategy and output write tiles after an adapter's filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteredFields {
    pub isi: IsiStrategy,
    pub owt: u32,
}

impl FilteredFields {
    fn of(workload: &DpuWorkload) -> Self {
        Self {
            isi: workload.isi_strategy,
            owt: workload.output_write_tiles,
        }
    }
}

/// Swizzling of input 0, input 1 and output 0.
pub type SwizzlingTriple = (Swizzling, Swizzling, Swizzling);

/// Policy mapping present-day values onto a trained model's space.
///
/// Every method defaults to passing values through unchanged.
pub trait WorkloadAdapter: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn mock_replace_datatypes(&self, dtype: DataType) -> DataType {
        dtype
    }

    fn mock_replace_operations(&self, op: Operation) -> Operation {
        op
    }

    fn mock_replace_devices(&self, device: Device) -> Device {
        device
    }

    /// Split strategy and output write tiles as the model saw them in training.
    fn avoid_untrained_space(&self, workload: &DpuWorkload) -> FilteredFields {
        FilteredFields::of(workload)
    }

    /// Collapse swizzling keys to the granularity the model was trained with.
    fn establish_unique_swizzling(
        &self,
        in0: Swizzling,
        in1: Swizzling,
        out0: Swizzling,
        _op: Operation,
    ) -> SwizzlingTriple {
        (in0, in1, out0)
    }

    /// Input 0 tensor to describe: the compute tensor, or the memory tensor when the
    /// model was trained with memory sizes.
    fn alternative_input0_spatial_memory(&self, workload: &DpuWorkload) -> Tensor {
        workload.input_0
    }
}

/// Operations that never use their weights' swizzling.
fn weights_always_unswizzled(op: Operation) -> bool {
    op == Operation::Maxpool
}

/// Input tensor with the positive parts of the input halo removed from W and H.
///
/// Negative halo values (memory larger than compute) leave the dimension unchanged.
/// Results are floored at zero.
pub fn actual_spatial_memory_no_halo(tensor: &Tensor, workload: &DpuWorkload) -> Tensor {
    let halo = &workload.halo.input_0_halo;
    let shrink = |dim: u32, one_end: i32, other_end: i32| -> u32 {
        let cut = i64::from(one_end.max(0)) + i64::from(other_end.max(0));
        let new_dim = i64::from(dim) - cut;
        u32::try_from(new_dim.max(0)).unwrap_or(0)
    };
    let mut memory = *tensor;
    memory.shape[0] = shrink(tensor.width(), halo.left, halo.right);
    memory.shape[1] = shrink(tensor.height(), halo.top, halo.bottom);
    memory
}

/// No remapping at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughAdapter;

impl WorkloadAdapter for PassThroughAdapter {
    fn name(&self) -> &'static str {
        "pass-through"
    }
}

/// Models trained on VPU 2.7.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nn27Adapter;

impl WorkloadAdapter for Nn27Adapter {
    fn name(&self) -> &'static str {
        "nn27"
    }

    /// 8 bit floats behave like 8 bit integers; 32 bit outputs are not trained and run
    /// as FLOAT16.
    fn mock_replace_datatypes(&self, dtype: DataType) -> DataType {
        match dtype {
            DataType::Bf8 | DataType::Hf8 => DataType::Uint8,
            DataType::Float32 | DataType::Int32 => DataType::Float16,
            other => other,
        }
    }

    fn mock_replace_operations(&self, op: Operation) -> Operation {
        match op {
            Operation::LayerNorm | Operation::EltwiseMul => Operation::Eltwise,
            other => other,
        }
    }

    /// Every newer generation is estimated as 2.7.
    fn mock_replace_devices(&self, device: Device) -> Device {
        match device {
            Device::Vpu4_0 | Device::Npu5_0 | Device::Npu6_0 => Device::Vpu2_7,
            other => other,
        }
    }

    /// Rules, applied once in this order:
    /// 1. SOH with a kernel of height 1 becomes CLUSTERING.
    /// 2. CLUSTERING with more than one output tile becomes SOK.
    /// 3. SOK on ELTWISE becomes CLUSTERING with one output tile.
    /// 4. Output tiles are clamped to 2.
    fn avoid_untrained_space(&self, workload: &DpuWorkload) -> FilteredFields {
        let mut f = FilteredFields::of(workload);
        if f.isi == IsiStrategy::SplitOverH && workload.kernels[1] == 1 {
            f.isi = IsiStrategy::Clustering;
        }
        if f.isi == IsiStrategy::Clustering && f.owt > 1 {
            f.isi = IsiStrategy::SplitOverK;
        }
        if f.isi == IsiStrategy::SplitOverK && workload.op == Operation::Eltwise {
            f.isi = IsiStrategy::Clustering;
            f.owt = 1;
        }
        f.owt = f.owt.min(2);
        f
    }

    /// Only KEY_5 was trained, plus all-KEY_0 for ELTWISE.
    fn establish_unique_swizzling(
        &self,
        in0: Swizzling,
        in1: Swizzling,
        out0: Swizzling,
        op: Operation,
    ) -> SwizzlingTriple {
        let all_off = [in0, in1, out0].iter().all(|&s| s == Swizzling::Key0);
        let key = if op == Operation::Eltwise && all_off {
            Swizzling::Key0
        } else {
            Swizzling::Key5
        };
        let weights = if weights_always_unswizzled(op) {
            Swizzling::Key0
        } else {
            key
        };
        (key, weights, key)
    }

    fn alternative_input0_spatial_memory(&self, workload: &DpuWorkload) -> Tensor {
        if workload.isi_strategy == IsiStrategy::SplitOverH {
            actual_spatial_memory_no_halo(&workload.input_0, workload)
        } else {
            workload.input_0
        }
    }
}

/// VPU 2.7 models trained without the split and swizzling restrictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nn27Compat159Adapter;

impl WorkloadAdapter for Nn27Compat159Adapter {
    fn name(&self) -> &'static str {
        "nn27-compat159"
    }

    fn mock_replace_datatypes(&self, dtype: DataType) -> DataType {
        Nn27Adapter.mock_replace_datatypes(dtype)
    }

    fn mock_replace_operations(&self, op: Operation) -> Operation {
        Nn27Adapter.mock_replace_operations(op)
    }

    fn mock_replace_devices(&self, device: Device) -> Device {
        Nn27Adapter.mock_replace_devices(device)
    }

    fn alternative_input0_spatial_memory(&self, workload: &DpuWorkload) -> Tensor {
        Nn27Adapter.alternative_input0_spatial_memory(workload)
    }
}

/// Models trained on NPU 4.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nn40Adapter;

impl WorkloadAdapter for Nn40Adapter {
    fn name(&self) -> &'static str {
        "nn40"
    }

    fn mock_replace_datatypes(&self, dtype: DataType) -> DataType {
        Nn27Adapter.mock_replace_datatypes(dtype)
    }

    fn mock_replace_operations(&self, op: Operation) -> Operation {
        Nn27Adapter.mock_replace_operations(op)
    }

    /// Generations after 4.0 are estimated as 4.0.
    fn mock_replace_devices(&self, device: Device) -> Device {
        match device {
            Device::Npu5_0 | Device::Npu6_0 => Device::Vpu4_0,
            other => other,
        }
    }

    /// SOH was never trained (becomes CLUSTERING), CLUSTERING with several output tiles
    /// becomes SOK, output tiles are clamped to 6.
    fn avoid_untrained_space(&self, workload: &DpuWorkload) -> FilteredFields {
        split_rules_without_soh(workload, 6)
    }

    /// ELTWISE keeps KEY_0 for its inputs (together) and for its output (independently);
    /// everything else is KEY_5.
    fn establish_unique_swizzling(
        &self,
        in0: Swizzling,
        in1: Swizzling,
        out0: Swizzling,
        op: Operation,
    ) -> SwizzlingTriple {
        let enabled = |s: Swizzling| if s == Swizzling::Key0 { Swizzling::Key0 } else { Swizzling::Key5 };
        let (a, mut b, c) = if op == Operation::Eltwise {
            let inputs = if in0 == Swizzling::Key0 && in1 == Swizzling::Key0 {
                Swizzling::Key0
            } else {
                Swizzling::Key5
            };
            (inputs, inputs, enabled(out0))
        } else {
            (Swizzling::Key5, Swizzling::Key5, Swizzling::Key5)
        };
        if weights_always_unswizzled(op) {
            b = Swizzling::Key0;
        }
        (a, b, c)
    }

    fn alternative_input0_spatial_memory(&self, workload: &DpuWorkload) -> Tensor {
        Nn27Adapter.alternative_input0_spatial_memory(workload)
    }
}

/// NPU 4.0 models trained with every swizzling key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nn41Adapter;

impl WorkloadAdapter for Nn41Adapter {
    fn name(&self) -> &'static str {
        "nn41"
    }

    fn mock_replace_datatypes(&self, dtype: DataType) -> DataType {
        Nn40Adapter.mock_replace_datatypes(dtype)
    }

    fn mock_replace_operations(&self, op: Operation) -> Operation {
        Nn40Adapter.mock_replace_operations(op)
    }

    fn mock_replace_devices(&self, device: Device) -> Device {
        Nn40Adapter.mock_replace_devices(device)
    }

    fn avoid_untrained_space(&self, workload: &DpuWorkload) -> FilteredFields {
        Nn40Adapter.avoid_untrained_space(workload)
    }

    /// Keys pass through, except the weights of weightless pooling.
    fn establish_unique_swizzling(
        &self,
        in0: Swizzling,
        in1: Swizzling,
        out0: Swizzling,
        op: Operation,
    ) -> SwizzlingTriple {
        let in1 = if weights_always_unswizzled(op) { Swizzling::Key0 } else { in1 };
        (in0, in1, out0)
    }

    fn alternative_input0_spatial_memory(&self, workload: &DpuWorkload) -> Tensor {
        Nn40Adapter.alternative_input0_spatial_memory(workload)
    }
}

/// Models trained on NPU 5.x. Only the split strategy is filtered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nn5xAdapter;

impl WorkloadAdapter for Nn5xAdapter {
    fn name(&self) -> &'static str {
        "nn5x"
    }

    /// Same rules as NPU 4.0 with output tiles clamped to 3.
    fn avoid_untrained_space(&self, workload: &DpuWorkload) -> FilteredFields {
        split_rules_without_soh(workload, 3)
    }
}

fn split_rules_without_soh(workload: &DpuWorkload, max_owt: u32) -> FilteredFields {
    let mut f = FilteredFields::of(workload);
    if f.isi == IsiStrategy::SplitOverH {
        f.isi = IsiStrategy::Clustering;
    }
    if f.isi == IsiStrategy::Clustering && f.owt > 1 {
        f.isi = IsiStrategy::SplitOverK;
    }
    f.owt = f.owt.min(max_owt);
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use npucost_core::{ExecutionMode, HaloInfoHwc, HaloWorkload};

    fn workload(op: Operation) -> DpuWorkload {
        let t = Tensor::new([65, 12, 64, 1], DataType::Uint8);
        DpuWorkload::new(Device::Vpu2_7, op, t, t, ExecutionMode::Cuboid16x16).with_kernels([3, 3])
    }

    fn with_halo(isi: IsiStrategy, top: i32, bottom: i32, left: i32, right: i32) -> DpuWorkload {
        workload(Operation::Convolution)
            .with_isi(isi, 1)
            .with_halo(HaloWorkload::with_input(HaloInfoHwc::new(top, bottom, left, right)))
    }

    #[test]
    fn nn27_clustering_with_many_tiles_becomes_sok_clamped() {
        let wl = workload(Operation::Convolution).with_isi(IsiStrategy::Clustering, 5);
        let f = Nn27Adapter.avoid_untrained_space(&wl);
        assert_eq!(f, FilteredFields { isi: IsiStrategy::SplitOverK, owt: 2 });

        let wl = workload(Operation::Convolution).with_isi(IsiStrategy::Clustering, 1);
        let f = Nn27Adapter.avoid_untrained_space(&wl);
        assert_eq!(f, FilteredFields { isi: IsiStrategy::Clustering, owt: 1 });
    }

    #[test]
    fn nn27_rule_chain_is_one_pass() {
        // SOH with a flat kernel falls to CLUSTERING, then to SOK because of the tiles.
        let wl = workload(Operation::Convolution)
            .with_kernels([3, 1])
            .with_isi(IsiStrategy::SplitOverH, 4);
        let f = Nn27Adapter.avoid_untrained_space(&wl);
        assert_eq!(f, FilteredFields { isi: IsiStrategy::SplitOverK, owt: 2 });

        // ELTWISE ends up back in CLUSTERING with a single tile.
        let wl = workload(Operation::Eltwise).with_isi(IsiStrategy::Clustering, 3);
        let f = Nn27Adapter.avoid_untrained_space(&wl);
        assert_eq!(f, FilteredFields { isi: IsiStrategy::Clustering, owt: 1 });

        // SOH with a tall kernel is kept.
        let wl = workload(Operation::Convolution).with_isi(IsiStrategy::SplitOverH, 1);
        assert_eq!(Nn27Adapter.avoid_untrained_space(&wl).isi, IsiStrategy::SplitOverH);
    }

    #[test]
    fn nn27_swizzling_collapse() {
        use Swizzling::*;
        let conv = Operation::Convolution;
        assert_eq!(Nn27Adapter.establish_unique_swizzling(Key0, Key0, Key0, conv), (Key5, Key5, Key5));
        let elt = Operation::Eltwise;
        assert_eq!(Nn27Adapter.establish_unique_swizzling(Key0, Key0, Key0, elt), (Key0, Key0, Key0));
        assert_eq!(Nn27Adapter.establish_unique_swizzling(Key0, Key0, Key2, elt), (Key5, Key5, Key5));
        assert_eq!(Nn27Adapter.establish_unique_swizzling(Key1, Key0, Key0, elt), (Key5, Key5, Key5));
        let pool = Operation::Maxpool;
        assert_eq!(Nn27Adapter.establish_unique_swizzling(Key5, Key5, Key5, pool), (Key5, Key0, Key5));
    }

    #[test]
    fn nn40_eltwise_output_swizzling_is_independent() {
        use Swizzling::*;
        let elt = Operation::Eltwise;
        assert_eq!(Nn40Adapter.establish_unique_swizzling(Key0, Key0, Key3, elt), (Key0, Key0, Key5));
        assert_eq!(Nn40Adapter.establish_unique_swizzling(Key0, Key4, Key0, elt), (Key5, Key5, Key0));
        assert_eq!(
            Nn40Adapter.establish_unique_swizzling(Key0, Key0, Key0, Operation::Convolution),
            (Key5, Key5, Key5)
        );
    }

    #[test]
    fn nn41_passes_keys_through() {
        use Swizzling::*;
        assert_eq!(
            Nn41Adapter.establish_unique_swizzling(Key1, Key2, Key3, Operation::Convolution),
            (Key1, Key2, Key3)
        );
        assert_eq!(
            Nn41Adapter.establish_unique_swizzling(Key1, Key2, Key3, Operation::Maxpool),
            (Key1, Key0, Key3)
        );
    }

    #[test]
    fn split_filters_per_generation() {
        let soh = workload(Operation::Convolution).with_isi(IsiStrategy::SplitOverH, 1);
        assert_eq!(Nn40Adapter.avoid_untrained_space(&soh).isi, IsiStrategy::Clustering);
        let many = workload(Operation::Convolution).with_isi(IsiStrategy::Clustering, 8);
        assert_eq!(Nn40Adapter.avoid_untrained_space(&many), FilteredFields { isi: IsiStrategy::SplitOverK, owt: 6 });
        assert_eq!(Nn5xAdapter.avoid_untrained_space(&many), FilteredFields { isi: IsiStrategy::SplitOverK, owt: 3 });
        assert_eq!(Nn27Compat159Adapter.avoid_untrained_space(&many), FilteredFields { isi: IsiStrategy::Clustering, owt: 8 });
        assert_eq!(PassThroughAdapter.avoid_untrained_space(&many).owt, 8);
    }

    #[test]
    fn device_and_type_mocks() {
        assert_eq!(Nn27Adapter.mock_replace_devices(Device::Npu5_0), Device::Vpu2_7);
        assert_eq!(Nn27Adapter.mock_replace_devices(Device::Vpu2_1), Device::Vpu2_1);
        assert_eq!(Nn40Adapter.mock_replace_devices(Device::Npu6_0), Device::Vpu4_0);
        assert_eq!(Nn40Adapter.mock_replace_devices(Device::Vpu2_7), Device::Vpu2_7);
        assert_eq!(Nn27Adapter.mock_replace_datatypes(DataType::Hf8), DataType::Uint8);
        assert_eq!(Nn41Adapter.mock_replace_datatypes(DataType::Float32), DataType::Float16);
        assert_eq!(Nn5xAdapter.mock_replace_datatypes(DataType::Float32), DataType::Float32);
        assert_eq!(Nn27Adapter.mock_replace_operations(Operation::EltwiseMul), Operation::Eltwise);
        assert_eq!(Nn27Adapter.mock_replace_operations(Operation::ReduceMs), Operation::ReduceMs);
    }

    #[test]
    fn halo_shrink_under_soh() {
        let t = Nn27Adapter.alternative_input0_spatial_memory(&with_halo(IsiStrategy::SplitOverH, 0, 4, 0, 6));
        assert_eq!((t.width(), t.height()), (59, 8));
        let t = Nn27Adapter.alternative_input0_spatial_memory(&with_halo(IsiStrategy::SplitOverH, 4, 4, 4, 4));
        assert_eq!((t.width(), t.height()), (57, 4));
        let t = Nn27Adapter.alternative_input0_spatial_memory(&with_halo(IsiStrategy::SplitOverH, -2, 4, 3, -6));
        assert_eq!((t.width(), t.height()), (62, 8));
        assert_eq!(t.channels(), 64);
    }

    #[test]
    fn halo_shrink_floors_at_zero() {
        let t = Nn40Adapter.alternative_input0_spatial_memory(&with_halo(IsiStrategy::SplitOverH, 10, 10, 40, 40));
        assert_eq!((t.width(), t.height()), (0, 0));
    }

    #[test]
    fn clustering_is_halo_immune() {
        for (top, bottom, left, right) in [(0, 4, 0, 6), (4, 4, 4, 4), (-2, 4, 3, -6), (100, 100, 100, 100)] {
            let wl = with_halo(IsiStrategy::Clustering, top, bottom, left, right);
            let t = Nn27Adapter.alternative_input0_spatial_memory(&wl);
            assert_eq!((t.width(), t.height()), (65, 12));
        }
    }
}
