//! DPU compute workloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::halo::HaloWorkload;
use crate::tensor::Tensor;
use crate::types::{ActivationFunction, DataType, Device, ExecutionMode, IsiStrategy, Operation, Swizzling};
use crate::{TextEnum, DUMP_TERMINATOR};

/// One compute operation on a DPU.
///
/// Input and output tensors are compute tensors. The weights tensor is not stored; it is
/// derived from the geometry when an encoder needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DpuWorkload {
    pub device: Device,
    pub op: Operation,
    pub input_0: Tensor,
    pub output_0: Tensor,
    /// Kernel `[W, H]`.
    pub kernels: [u32; 2],
    /// Stride `[W, H]`.
    pub strides: [u32; 2],
    /// Padding `[top, bottom, left, right]`.
    pub padding: [u32; 4],
    pub execution_order: ExecutionMode,
    #[serde(default = "default_activation")]
    pub activation_function: ActivationFunction,
    /// Activation sparsity level in `[0, 1]`.
    #[serde(default)]
    pub act_sparsity: f32,
    /// Weight sparsity level in `[0, 1]`.
    #[serde(default)]
    pub weight_sparsity: f32,
    #[serde(default = "default_swizzling")]
    pub input_0_swizzling: Swizzling,
    #[serde(default = "default_swizzling")]
    pub input_1_swizzling: Swizzling,
    #[serde(default = "default_swizzling")]
    pub output_0_swizzling: Swizzling,
    /// Number of tiles the whole output is written to. 0 and 1 both mean "only this tile".
    #[serde(default = "default_owt")]
    pub output_write_tiles: u32,
    /// Offsets relative to the parent layer.
    #[serde(default)]
    pub offsets: [u32; 4],
    #[serde(default = "default_isi")]
    pub isi_strategy: IsiStrategy,
    /// Whether the weights are stored sparse. Independent of the sparsity level.
    #[serde(default)]
    pub weight_sparsity_enabled: bool,
    #[serde(default)]
    pub halo: HaloWorkload,
    /// Weights datatype when it differs from the input datatype.
    #[serde(default)]
    pub weight_type: Option<DataType>,
    /// Free text naming the layer this workload belongs to. Only used in logs.
    #[serde(default)]
    pub layer_info: String,
    #[serde(default)]
    pub weightless_operation: Option<bool>,
    #[serde(default)]
    pub in_place_output_memory: Option<bool>,
    #[serde(default)]
    pub superdense_memory: Option<bool>,
    /// Hardware pads input channels below 16.
    #[serde(default)]
    pub input_autopad: Option<bool>,
    /// Hardware pads output channels below 16.
    #[serde(default)]
    pub output_autopad: Option<bool>,
}

fn default_activation() -> ActivationFunction {
    ActivationFunction::None
}

fn default_swizzling() -> Swizzling {
    Swizzling::Key0
}

fn default_owt() -> u32 {
    1
}

fn default_isi() -> IsiStrategy {
    IsiStrategy::Clustering
}

impl DpuWorkload {
    /// Workload with unit kernel and stride, no padding and every optional aspect at its
    /// default.
    pub fn new(
        device: Device,
        op: Operation,
        input_0: Tensor,
        output_0: Tensor,
        execution_order: ExecutionMode,
    ) -> Self {
        Self {
            device,
            op,
            input_0,
            output_0,
            kernels: [1, 1],
            strides: [1, 1],
            padding: [0; 4],
            execution_order,
            activation_function: default_activation(),
            act_sparsity: 0.0,
            weight_sparsity: 0.0,
            input_0_swizzling: default_swizzling(),
            input_1_swizzling: default_swizzling(),
            output_0_swizzling: default_swizzling(),
            output_write_tiles: default_owt(),
            offsets: [0; 4],
            isi_strategy: default_isi(),
            weight_sparsity_enabled: false,
            halo: HaloWorkload::default(),
            weight_type: None,
            layer_info: String::new(),
            weightless_operation: None,
            in_place_output_memory: None,
            superdense_memory: None,
            input_autopad: None,
            output_autopad: None,
        }
    }

    /// The smallest legal workload: a 1x1 UINT8 convolution on VPU 2.7.
    pub fn sample() -> Self {
        let t = Tensor::new([1, 1, 1, 1], DataType::Uint8);
        Self::new(Device::Vpu2_7, Operation::Convolution, t, t, ExecutionMode::Cuboid16x16)
    }

    pub fn with_kernels(mut self, kernels: [u32; 2]) -> Self {
        self.kernels = kernels;
        self
    }

    pub fn with_strides(mut self, strides: [u32; 2]) -> Self {
        self.strides = strides;
        self
    }

    pub fn with_padding(mut self, padding: [u32; 4]) -> Self {
        self.padding = padding;
        self
    }

    /// Set the split strategy together with the output write tiles.
    pub fn with_isi(mut self, isi_strategy: IsiStrategy, output_write_tiles: u32) -> Self {
        self.isi_strategy = isi_strategy;
        self.output_write_tiles = output_write_tiles;
        self
    }

    /// Swizzling of input 0, input 1 and output 0.
    pub fn with_swizzling(mut self, in0: Swizzling, in1: Swizzling, out0: Swizzling) -> Self {
        self.input_0_swizzling = in0;
        self.input_1_swizzling = in1;
        self.output_0_swizzling = out0;
        self
    }

    pub fn with_halo(mut self, halo: HaloWorkload) -> Self {
        self.halo = halo;
        self
    }

    pub fn with_sparsity(mut self, act_sparsity: f32, weight_sparsity: f32, weight_sparsity_enabled: bool) -> Self {
        self.act_sparsity = act_sparsity;
        self.weight_sparsity = weight_sparsity;
        self.weight_sparsity_enabled = weight_sparsity_enabled;
        self
    }

    /// ELTWISE or ELTWISE_MUL.
    pub fn is_elementwise_like(&self) -> bool {
        matches!(self.op, Operation::Eltwise | Operation::EltwiseMul)
    }

    /// Only elementwise operations may write their output over their input. Setting
    /// `true` on any other operation is ignored.
    pub fn set_inplace_output_memory(&mut self, in_place: bool) {
        if self.is_elementwise_like() || !in_place {
            self.in_place_output_memory = Some(in_place);
        }
    }

    pub fn is_inplace_output_memory(&self) -> bool {
        if !self.is_elementwise_like() {
            return false;
        }
        self.in_place_output_memory
            .unwrap_or_else(|| self.preconditions_for_inplace_output())
    }

    pub fn set_weightless_operation(&mut self, weightless: bool) {
        self.weightless_operation = Some(weightless);
    }

    pub fn is_weightless_operation(&self) -> bool {
        if !self.is_elementwise_like() {
            return false;
        }
        self.weightless_operation
            .unwrap_or_else(|| self.special_no_weights_situation())
    }

    pub fn set_superdense(&mut self, superdense: bool) {
        self.superdense_memory = Some(superdense);
    }

    pub fn is_superdense(&self) -> bool {
        self.superdense_memory.unwrap_or(false)
    }

    pub fn is_reduce_minmax_op(&self) -> bool {
        self.op == Operation::ReduceMinMax
    }

    /// Input and output could share memory: same layout and same element footprint.
    fn preconditions_for_inplace_output(&self) -> bool {
        self.input_0.layout == self.output_0.layout
            && self.input_0.dtype.same_footprint(self.output_0.dtype)
    }

    // Permute or (de)quantize: the second input does not exist.
    fn special_no_weights_situation(&self) -> bool {
        self.input_0.layout != self.output_0.layout
            || !self.input_0.dtype.same_footprint(self.output_0.dtype)
    }
}

fn optional_flag(v: Option<bool>) -> String {
    v.map_or_else(|| "NA".to_string(), |b| u8::from(b).to_string())
}

impl fmt::Display for DpuWorkload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Workload: ")?;
        writeln!(f, " device: \t{} : {} ;", self.device.index(), self.device)?;
        writeln!(f, " Operation: \t{} : {} ;", self.op.index(), self.op)?;
        writeln!(f, " input: \t{{\n{} }} ;", self.input_0)?;
        writeln!(f, " output: \t{{\n{} }} ;", self.output_0)?;
        writeln!(f, " kernels: [W,H]  \t{{{},{}}} ;", self.kernels[0], self.kernels[1])?;
        writeln!(f, " strides: [W,H]  \t{{{},{}}} ;", self.strides[0], self.strides[1])?;
        let [t, b, l, r] = self.padding;
        writeln!(f, " padding: [TBLR] \t{{{t},{b},{l},{r}}} ;")?;
        writeln!(
            f,
            " execution_order: \t{} : {} ;",
            self.execution_order.index(),
            self.execution_order
        )?;
        writeln!(
            f,
            " activation_function: \t{} : {} ;",
            self.activation_function.index(),
            self.activation_function
        )?;
        writeln!(f, " act_sparsity: \t{} ;", self.act_sparsity)?;
        writeln!(f, " weight_sparsity: \t{} ;", self.weight_sparsity)?;
        writeln!(
            f,
            " input_swizzling: \t{{{},{}}} :  {{{},{}}} ;",
            self.input_0_swizzling.index(),
            self.input_1_swizzling.index(),
            self.input_0_swizzling,
            self.input_1_swizzling
        )?;
        writeln!(
            f,
            " output_swizzling: \t{{{}}} :  {{{}}} ;",
            self.output_0_swizzling.index(),
            self.output_0_swizzling
        )?;
        writeln!(f, " output_write_tiles: \t{} ;", self.output_write_tiles)?;
        let [o0, o1, o2, o3] = self.offsets;
        writeln!(f, " offsets: \t{{{o0},{o1},{o2},{o3}}} ;")?;
        writeln!(f, " isi_strategy: \t{} : {} ;", self.isi_strategy.index(), self.isi_strategy)?;
        writeln!(
            f,
            " weight_sparsity_enabled: \t{} : {} ;",
            u8::from(self.weight_sparsity_enabled),
            self.weight_sparsity_enabled
        )?;
        writeln!(f, "{}", self.halo)?;
        writeln!(
            f,
            " weight_type: \t{} ;",
            self.weight_type.map_or("Same", |t| t.as_text())
        )?;
        writeln!(f, " weightless_operation: \t{} ;", optional_flag(self.weightless_operation))?;
        writeln!(f, " in_place_output_memory: \t{} ;", optional_flag(self.in_place_output_memory))?;
        writeln!(f, " superdense_memory: \t{} ;", optional_flag(self.superdense_memory))?;
        write!(f, "{DUMP_TERMINATOR}Workload ")
    }
}
