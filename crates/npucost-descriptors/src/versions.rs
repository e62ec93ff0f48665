//! DPU descriptor layouts, one recipe per interface version.
//!
//! | id   | recipe                     | adapter        | size |
//! |------|----------------------------|----------------|------|
//! | 1    | [`LegacyRecipe::v01`]      | none           | 88   |
//! | 10   | [`LegacyRecipe::v10`]      | none           | 84   |
//! | 11   | [`V11Recipe`]              | NN27           | 93   |
//! | 89   | [`V11Recipe`]              | NN27 compat159 | 93   |
//! | 4011 | [`V11Recipe`]              | NN40           | 93   |
//! | 4111 | [`V11Recipe`]              | NN41           | 93   |
//! | 12   | [`CompactRecipe<V12>`]     | NN40           | 47   |
//! | 13   | [`CompactRecipe<V13>`]     | NN5X           | 53   |
//! | 14   | [`CompactRecipe<V14>`]     | NN5X           | 56   |
//! | 16   | [`CompactRecipe<V16>`]     | NN5X           | 61   |

mod compact;
pub mod v01;
pub mod v11;
pub mod v12;
pub mod v13;
pub mod v14;
pub mod v16;

pub use compact::{CompactInterface, CompactRecipe};
pub use v01::LegacyRecipe;
pub use v11::V11Recipe;
pub use v12::V12;
pub use v13::V13;
pub use v14::V14;
pub use v16::V16;

use npucost_core::DpuWorkload;

use crate::encoder::requantize;
use crate::error::Result;
use crate::inserter::{InsertMode, Inserter};

/// Kernel `[W, H]`, stride `[W, H]` and padding `[T, B, L, R]` as raw values.
fn insert_geometry<M: InsertMode>(ins: &mut Inserter<'_, M>, wl: &DpuWorkload, mut offset: usize) -> Result<usize> {
    for v in wl.kernels.iter().chain(&wl.strides).chain(&wl.padding) {
        offset = ins.uint(*v, offset)?;
    }
    Ok(offset)
}

/// Activation then weight sparsity, optionally re-quantized.
fn insert_sparsity<M: InsertMode>(
    ins: &mut Inserter<'_, M>,
    wl: &DpuWorkload,
    requantized: bool,
    offset: usize,
) -> Result<usize> {
    let (act, wt) = if requantized {
        (requantize(wl.act_sparsity), requantize(wl.weight_sparsity))
    } else {
        (wl.act_sparsity, wl.weight_sparsity)
    };
    let offset = ins.value(act, offset)?;
    ins.value(wt, offset)
}

/// Shape with the channel count raised to 16 when an autopad flag is present, whatever its
/// value.
fn autopadded(shape: [u32; 4], autopad: Option<bool>) -> [u32; 4] {
    const AUTOPAD_CHANNELS: u32 = 16;
    let mut shape = shape;
    if autopad.is_some() && shape[2] < AUTOPAD_CHANNELS {
        shape[2] = AUTOPAD_CHANNELS;
    }
    shape
}
