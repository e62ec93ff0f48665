//! The provider contract and the inference engine boundary.

use npucost_core::CyclesInterfaceType;

use crate::error::Result;

/// Something that can put a cycle count on a workload of type `W`.
///
/// A provider never fails: problems are reported as cycle error codes (see
/// [`npucost_core::cycles`]) so callers can chain providers and check the final value once.
pub trait CostProvider<W>: Send + Sync {
    /// Name reported as the cost source.
    fn name(&self) -> &str;

    /// Whether the provider is backed by a loaded NN model.
    fn is_initialized(&self) -> bool {
        false
    }

    /// Cycles for `workload`, or an error code. When `source` is given and the result is a
    /// valid cost it is set to this provider's name.
    fn get_cost(&self, workload: &W, source: Option<&mut String>) -> CyclesInterfaceType;
}

/// Write `name` into `source` when the caller asked for it.
pub(crate) fn report_source(source: Option<&mut String>, name: &str) {
    if let Some(source) = source {
        source.clear();
        source.push_str(name);
    }
}

/// A trained model evaluated on descriptors.
///
/// Implementations wrap whatever engine runs the model. They must be safe to call from
/// several threads; engines that are not reentrant serialize internally.
pub trait Inference: Send + Sync {
    /// Run the model on one descriptor.
    fn infer(&self, descriptor: &[f32]) -> Result<f32>;

    /// Run the model on `descriptors`, a concatenation of `descriptor_size` long vectors.
    fn infer_batch(&self, descriptors: &[f32], descriptor_size: usize) -> Result<Vec<f32>> {
        descriptors
            .chunks(descriptor_size.max(1))
            .map(|d| self.infer(d))
            .collect()
    }
}

impl<F> Inference for F
where
    F: Fn(&[f32]) -> Result<f32> + Send + Sync,
{
    fn infer(&self, descriptor: &[f32]) -> Result<f32> {
        self(descriptor)
    }
}
