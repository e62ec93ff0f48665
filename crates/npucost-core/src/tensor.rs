//! Four-dimensional tensor descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{compute_size_in_bytes, DataType, Layout};
use crate::TextEnum;

/// A tensor as seen by the hardware: shape, element type, layout and sparsity.
///
/// The shape is always `[W, H, C, B]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Tensor {
    /// Width, height, channels, batch.
    pub shape: [u32; 4],
    /// Element datatype.
    pub dtype: DataType,
    /// Memory layout.
    pub layout: Layout,
    /// Whether the tensor is stored sparse.
    pub sparsity_enabled: bool,
}

impl Tensor {
    /// A dense ZMAJOR tensor.
    pub fn new(shape: [u32; 4], dtype: DataType) -> Self {
        Self {
            shape,
            dtype,
            layout: Layout::Zmajor,
            sparsity_enabled: false,
        }
    }

    /// Same tensor with a different layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Same tensor with sparsity switched on or off.
    pub fn with_sparsity(mut self, enabled: bool) -> Self {
        self.sparsity_enabled = enabled;
        self
    }

    /// Same tensor with a different datatype.
    pub fn with_dtype(mut self, dtype: DataType) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn width(&self) -> u32 {
        self.shape[0]
    }

    pub fn height(&self) -> u32 {
        self.shape[1]
    }

    pub fn channels(&self) -> u32 {
        self.shape[2]
    }

    pub fn batches(&self) -> u32 {
        self.shape[3]
    }

    /// Number of elements.
    pub fn volume(&self) -> u64 {
        self.shape.iter().map(|&d| u64::from(d)).product()
    }

    /// Size in bytes, sub-byte types packed.
    pub fn size(&self) -> u64 {
        compute_size_in_bytes(self.volume(), self.dtype)
    }

    /// Byte strides per dimension (`[W, H, C, B]`), following the layout order.
    pub fn strides(&self) -> [u64; 4] {
        let mut strides = [0u64; 4];
        let mut step = u64::from(self.dtype.bytes());
        for dim in self.layout.order() {
            strides[dim] = step;
            step *= u64::from(self.shape[dim]);
        }
        strides
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " shape: [W,H,C,B] \t{{{},{},{},{}}} ;",
            self.shape[0], self.shape[1], self.shape[2], self.shape[3]
        )?;
        writeln!(f, " dtype: \t{} : {} ;", self.dtype.index(), self.dtype)?;
        writeln!(f, " layout: \t{} : {} ;", self.layout.index(), self.layout)?;
        write!(f, " sparsity_enabled: \t{} ;", self.sparsity_enabled)
    }
}
