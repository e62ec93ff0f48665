//! The weights tensor (input 1) of a DPU workload.
//!
//! Workloads do not carry their weights tensor; interfaces that describe it derive it from
//! the operation and the convolution geometry.

use npucost_core::{DpuWorkload, Operation, Tensor};

/// Derives the weights tensor of a workload.
pub trait Input1Builder: Send + Sync {
    fn construct_input_1(&self, workload: &DpuWorkload) -> Tensor;
}

/// Weights as the hardware stores them: one `1 x 1` plane of all kernel values per
/// output channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInput1Builder;

fn align_to(value: u32, multiple: u32) -> u32 {
    value.div_ceil(multiple) * multiple
}

impl Input1Builder for DefaultInput1Builder {
    fn construct_input_1(&self, workload: &DpuWorkload) -> Tensor {
        let in0 = &workload.input_0;
        let kernel_area = workload.kernels[0] * workload.kernels[1];
        let out_c = workload.output_0.channels();
        let shape = match workload.op {
            Operation::Convolution => [1, 1, in0.channels() * kernel_area, out_c],
            Operation::DwConvolution | Operation::Avepool => [1, 1, align_to(kernel_area, 16), out_c],
            Operation::CmConvolution => {
                let multiple = if in0.dtype.is_float() { 8 } else { 16 };
                [1, 1, align_to(in0.channels() * kernel_area, multiple), out_c]
            }
            // Same volume as the input, stored transposed.
            Operation::Eltwise | Operation::EltwiseMul => {
                [in0.height(), in0.channels(), in0.width(), in0.batches()]
            }
            Operation::Maxpool
            | Operation::LayerNorm
            | Operation::ReduceMs
            | Operation::ReduceSumSquares
            | Operation::ReduceMinMax => [0; 4],
        };
        Tensor {
            shape,
            dtype: in0.dtype,
            layout: in0.layout,
            sparsity_enabled: workload.weight_sparsity_enabled,
        }
    }
}
