//! Descriptor encoders.
//!
//! A [`DescriptorRecipe`] is the fixed field order of one interface version. Wrapping it
//! in [`Preprocessing`] yields a [`DescriptorEncoder`]: the recipe's size is checked once
//! at construction by simulating it over its sample workload, then every encode commits
//! into a zero-filled buffer and checks the written count again.

use crate::error::{EncodeError, Result};
use crate::inserter::{InsertMode, Inserter};

/// Field order of one descriptor interface version.
pub trait DescriptorRecipe: Send + Sync {
    /// Workload type this recipe describes.
    type Workload;

    /// Version id persisted next to the models trained on this layout.
    fn interface_version(&self) -> u32;

    /// Number of values the recipe writes.
    fn declared_size(&self) -> usize;

    /// A workload every recipe of this version can encode.
    fn sample_workload(&self) -> Self::Workload;

    /// Insert every field of `workload` starting at offset 0. Returns the final offset.
    fn write<M: InsertMode>(&self, workload: &Self::Workload, ins: &mut Inserter<'_, M>) -> Result<usize>;
}

/// Turns workloads of type `W` into fixed-length descriptors.
pub trait DescriptorEncoder<W>: Send + Sync {
    fn interface_version(&self) -> u32;

    /// Length of every descriptor this encoder produces.
    fn output_size(&self) -> usize;

    /// Encode into the encoder's own buffer. Returns the descriptor and the number of
    /// values written, which always equals [`output_size`](Self::output_size).
    fn generate_descriptor(&mut self, workload: &W) -> Result<(&[f32], usize)>;

    /// Encode into a fresh vector; does not touch the encoder's buffer.
    fn encode(&self, workload: &W) -> Result<Vec<f32>>;

    /// Encode into `buf`, which is zero-filled first. Returns the number of values written.
    fn encode_into(&self, workload: &W, buf: &mut [f32]) -> Result<usize>;

    /// Encode a batch into one contiguous vector, padded with zero descriptors up to a
    /// multiple of `pad` workloads. `pad` of 0 or 1 means no padding.
    fn transform_batch(&self, workloads: &[W], pad: usize) -> Result<Vec<f32>> {
        let size = self.output_size();
        let pad = pad.max(1);
        let slots = workloads.len().div_ceil(pad) * pad;
        let mut out = vec![0.0; slots * size];
        for (workload, chunk) in workloads.iter().zip(out.chunks_mut(size)) {
            self.encode_into(workload, chunk)?;
        }
        Ok(out)
    }

    /// Resize the internal buffer. Smaller than [`output_size`](Self::output_size), later
    /// encodes fail with [`EncodeError::OutOfRange`]; larger, the descriptor is followed by a
    /// zero tail up to `size`.
    fn set_size(&mut self, size: usize);

    /// Zero the internal buffer.
    fn reset(&mut self);
}

/// An encoder built from a recipe, with a reusable output buffer.
#[derive(Debug)]
pub struct Preprocessing<R: DescriptorRecipe> {
    recipe: R,
    buffer: Vec<f32>,
}

impl<R: DescriptorRecipe> Preprocessing<R> {
    /// Build an encoder, checking the recipe's declared size against a simulated encode of
    /// its sample workload.
    pub fn new(recipe: R) -> Result<Self> {
        let version = recipe.interface_version();
        let declared = recipe.declared_size();
        let written = recipe.write(&recipe.sample_workload(), &mut Inserter::simulate())?;
        if written != declared {
            return Err(EncodeError::SizeMismatch {
                version,
                declared,
                written,
            });
        }
        tracing::debug!(version, size = declared, "descriptor encoder ready");
        Ok(Self {
            recipe,
            buffer: vec![0.0; declared],
        })
    }

    pub fn recipe(&self) -> &R {
        &self.recipe
    }

    fn commit(&self, workload: &R::Workload, buf: &mut [f32]) -> Result<usize> {
        buf.fill(0.0);
        let written = self.recipe.write(workload, &mut Inserter::commit(buf))?;
        let declared = self.recipe.declared_size();
        if written != declared {
            return Err(EncodeError::SizeMismatch {
                version: self.recipe.interface_version(),
                declared,
                written,
            });
        }
        Ok(written)
    }
}

impl<R: DescriptorRecipe> DescriptorEncoder<R::Workload> for Preprocessing<R> {
    fn interface_version(&self) -> u32 {
        self.recipe.interface_version()
    }

    fn output_size(&self) -> usize {
        self.recipe.declared_size()
    }

    fn generate_descriptor(&mut self, workload: &R::Workload) -> Result<(&[f32], usize)> {
        let mut buffer = std::mem::take(&mut self.buffer);
        let result = self.commit(workload, &mut buffer);
        self.buffer = buffer;
        let written = result?;
        Ok((&self.buffer, written))
    }

    fn encode(&self, workload: &R::Workload) -> Result<Vec<f32>> {
        let mut out = vec![0.0; self.output_size()];
        self.commit(workload, &mut out)?;
        Ok(out)
    }

    fn encode_into(&self, workload: &R::Workload, buf: &mut [f32]) -> Result<usize> {
        self.commit(workload, buf)
    }

    fn set_size(&mut self, size: usize) {
        self.buffer.resize(size, 0.0);
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
    }
}

/// Re-quantize a value through its six-decimal text form, the precision the training data
/// was stored with.
pub(crate) fn requantize(value: f32) -> f32 {
    format!("{value:.6}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes `n` then as many ones as the value says.
    #[derive(Debug)]
    struct Counting {
        declared: usize,
    }

    impl DescriptorRecipe for Counting {
        type Workload = u32;

        fn interface_version(&self) -> u32 {
            7
        }

        fn declared_size(&self) -> usize {
            self.declared
        }

        fn sample_workload(&self) -> u32 {
            2
        }

        fn write<M: InsertMode>(&self, workload: &u32, ins: &mut Inserter<'_, M>) -> Result<usize> {
            let mut offset = ins.uint(*workload, 0)?;
            for _ in 0..*workload {
                offset = ins.value(1.0, offset)?;
            }
            Ok(offset)
        }
    }

    #[test]
    fn construction_checks_declared_size() {
        let enc = Preprocessing::new(Counting { declared: 3 }).unwrap();
        assert_eq!(enc.output_size(), 3);
        assert_eq!(enc.interface_version(), 7);
        let err = Preprocessing::new(Counting { declared: 4 }).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::SizeMismatch { version: 7, declared: 4, written: 3 }
        ));
    }

    #[test]
    fn generate_reuses_buffer() {
        let mut enc = Preprocessing::new(Counting { declared: 3 }).unwrap();
        let (descriptor, written) = enc.generate_descriptor(&2).unwrap();
        assert_eq!(descriptor, &[2.0, 1.0, 1.0]);
        assert_eq!(written, 3);
        enc.reset();
        assert_eq!(enc.buffer, vec![0.0; 3]);
    }

    #[test]
    fn shorter_workload_is_a_size_mismatch() {
        let enc = Preprocessing::new(Counting { declared: 3 }).unwrap();
        assert!(matches!(enc.encode(&1), Err(EncodeError::SizeMismatch { written: 2, .. })));
        assert!(matches!(enc.encode(&5), Err(EncodeError::OutOfRange { offset: 3, capacity: 3 })));
    }

    #[test]
    fn set_size_too_small_fails_with_out_of_range() {
        let mut enc = Preprocessing::new(Counting { declared: 3 }).unwrap();
        enc.set_size(2);
        assert!(matches!(
            enc.generate_descriptor(&2),
            Err(EncodeError::OutOfRange { offset: 2, capacity: 2 })
        ));
        enc.set_size(3);
        assert!(enc.generate_descriptor(&2).is_ok());
    }

    #[test]
    fn larger_buffer_gets_a_zero_tail() {
        let mut enc = Preprocessing::new(Counting { declared: 3 }).unwrap();
        enc.set_size(5);
        let (descriptor, written) = enc.generate_descriptor(&2).unwrap();
        assert_eq!(descriptor, &[2.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(written, 3);
        assert_eq!(enc.output_size(), 3);
    }

    #[test]
    fn batch_is_padded_with_zero_descriptors() {
        let enc = Preprocessing::new(Counting { declared: 3 }).unwrap();
        let batch = enc.transform_batch(&[2, 2, 2], 4).unwrap();
        assert_eq!(batch.len(), 12);
        assert_eq!(&batch[6..9], &[2.0, 1.0, 1.0]);
        assert!(batch[9..].iter().all(|&v| v == 0.0));
        assert_eq!(enc.transform_batch(&[2, 2, 2], 0).unwrap().len(), 9);
        assert!(enc.transform_batch(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn requantize_keeps_six_decimals() {
        assert_eq!(requantize(0.5), 0.5);
        assert_eq!(requantize(0.123_456_78), "0.123457".parse::<f32>().unwrap());
        assert_eq!(requantize(0.0), 0.0);
    }
}
