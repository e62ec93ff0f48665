//! Cost provider backed by a trained model.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use npucost_core::cycles::{ERROR_INVALID_OUTPUT_RANGE, START_ERROR_RANGE};
use npucost_core::CyclesInterfaceType;
use npucost_descriptors::{DescriptorEncoder, EncoderRegistry};

use crate::error::{ProviderError, Result};
use crate::provider::{report_source, CostProvider, Inference};

/// Encodes workloads with the interface the model was trained on and runs the model.
///
/// The encoder's buffer is reused across calls; concurrent calls on one provider are
/// serialized on it.
pub struct NnCostProvider<W> {
    name: String,
    encoder: Mutex<Box<dyn DescriptorEncoder<W>>>,
    inference: Box<dyn Inference>,
}

impl<W: 'static> NnCostProvider<W> {
    pub fn new(name: impl Into<String>, encoder: Box<dyn DescriptorEncoder<W>>, inference: Box<dyn Inference>) -> Self {
        Self {
            name: name.into(),
            encoder: Mutex::new(encoder),
            inference,
        }
    }

    /// Provider for a model trained on interface `version`.
    pub fn from_registry(
        name: impl Into<String>,
        registry: &EncoderRegistry<W>,
        version: u32,
        inference: Box<dyn Inference>,
    ) -> Result<Self> {
        let encoder = registry.make(version)?;
        let provider = Self::new(name, encoder, inference);
        tracing::info!(model = %provider.name, version, "NN cost provider ready");
        Ok(provider)
    }

    pub fn interface_version(&self) -> u32 {
        self.encoder().interface_version()
    }

    fn encoder(&self) -> std::sync::MutexGuard<'_, Box<dyn DescriptorEncoder<W>>> {
        self.encoder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw model output for `workload`.
    pub fn raw_value(&self, workload: &W) -> Result<f32> {
        let mut encoder = self.encoder();
        let (descriptor, _) = encoder.generate_descriptor(workload)?;
        self.inference.infer(descriptor)
    }

    /// Costs of a batch, in order. Descriptors are padded to a multiple of `pad` before
    /// inference; the padding results are dropped.
    pub fn get_costs(&self, workloads: &[W], pad: usize) -> Vec<CyclesInterfaceType> {
        match self.batch_values(workloads, pad) {
            Ok(values) => values.into_iter().take(workloads.len()).map(checked_cycles).collect(),
            Err(err) => {
                tracing::warn!(model = %self.name, error = %err, "batch cost failed");
                vec![err.cycles_code(); workloads.len()]
            }
        }
    }

    fn batch_values(&self, workloads: &[W], pad: usize) -> Result<Vec<f32>> {
        let encoder = self.encoder();
        let descriptors = encoder.transform_batch(workloads, pad)?;
        self.inference.infer_batch(&descriptors, encoder.output_size())
    }
}

impl<W: 'static> CostProvider<W> for NnCostProvider<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_cost(&self, workload: &W, source: Option<&mut String>) -> CyclesInterfaceType {
        let cycles = match self.raw_value(workload) {
            Ok(value) => checked_cycles(value),
            Err(err) => {
                if matches!(err, ProviderError::Encode(_)) {
                    tracing::warn!(model = %self.name, error = %err, "workload cannot be described to the model");
                } else {
                    tracing::debug!(model = %self.name, error = %err, "inference failed");
                }
                return err.cycles_code();
            }
        };
        if cycles != ERROR_INVALID_OUTPUT_RANGE {
            report_source(source, &self.name);
        }
        cycles
    }
}

impl<W> fmt::Debug for NnCostProvider<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NnCostProvider").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Round a model output up to cycles. NaN, negative and error range outputs are rejected.
fn checked_cycles(value: f32) -> CyclesInterfaceType {
    let ceiled = f64::from(value).ceil();
    if value.is_nan() || value < 0.0 || ceiled > f64::from(START_ERROR_RANGE) {
        return ERROR_INVALID_OUTPUT_RANGE;
    }
    ceiled as CyclesInterfaceType
}

#[cfg(test)]
mod tests {
    use super::*;
    use npucost_core::cycles::ERROR_INVALID_INPUT_CONFIGURATION;
    use npucost_core::{DataType, Device, DpuWorkload, ExecutionMode, Operation, Tensor};
    use npucost_descriptors::{dpu_registry, EncodeError};

    fn constant(value: f32) -> Box<dyn Inference> {
        Box::new(move |_: &[f32]| -> Result<f32> { Ok(value) })
    }

    fn provider(inference: Box<dyn Inference>) -> NnCostProvider<DpuWorkload> {
        NnCostProvider::from_registry("vpu27-11", &dpu_registry(), 11, inference).unwrap()
    }

    fn conv() -> DpuWorkload {
        let t = Tensor::new([16, 16, 64, 1], DataType::Uint8);
        DpuWorkload::new(Device::Vpu2_7, Operation::Convolution, t, t, ExecutionMode::Cuboid16x16).with_kernels([3, 3])
    }

    #[test]
    fn valid_output_is_rounded_up() {
        let provider = provider(constant(100.4));
        let mut source = String::new();
        assert_eq!(provider.get_cost(&conv(), Some(&mut source)), 101);
        assert_eq!(source, "vpu27-11");
        assert!(provider.is_initialized());
        assert_eq!(provider.interface_version(), 11);
    }

    #[test]
    fn model_sees_full_descriptors() {
        let provider = provider(Box::new(|d: &[f32]| -> Result<f32> { Ok(d.len() as f32) }));
        assert_eq!(provider.get_cost(&conv(), None), 93);
    }

    #[test]
    fn invalid_outputs_are_rejected() {
        for value in [f32::NAN, -1.0, 1e12] {
            let mut source = String::from("untouched");
            assert_eq!(
                provider(constant(value)).get_cost(&conv(), Some(&mut source)),
                ERROR_INVALID_OUTPUT_RANGE
            );
            assert_eq!(source, "untouched");
        }
        assert_eq!(provider(constant(0.0)).get_cost(&conv(), None), 0);
    }

    #[test]
    fn unencodable_workload_is_invalid_input() {
        let mut wl = conv();
        wl.execution_order = ExecutionMode::Vector;
        assert_eq!(provider(constant(1.0)).get_cost(&wl, None), ERROR_INVALID_INPUT_CONFIGURATION);
    }

    #[test]
    fn inference_failure_is_invalid_output() {
        let failing = Box::new(|_: &[f32]| -> Result<f32> {
            Err(ProviderError::Inference {
                model: "vpu27-11".to_string(),
                reason: "not loaded".to_string(),
            })
        });
        assert_eq!(provider(failing).get_cost(&conv(), None), ERROR_INVALID_OUTPUT_RANGE);
    }

    #[test]
    fn batches_drop_padding_results() {
        let provider = provider(Box::new(|d: &[f32]| -> Result<f32> { Ok(d.iter().sum()) }));
        let costs = provider.get_costs(&[conv(), conv(), conv()], 4);
        assert_eq!(costs.len(), 3);
        assert_eq!(costs[0], provider.get_cost(&conv(), None));
        assert!(costs.iter().all(|&c| c == costs[0]));

        let mut wl = conv();
        wl.execution_order = ExecutionMode::Vector;
        assert_eq!(
            provider.get_costs(&[conv(), wl], 1),
            vec![ERROR_INVALID_INPUT_CONFIGURATION; 2]
        );
    }

    #[test]
    fn unknown_interface() {
        let err = NnCostProvider::from_registry("x", &dpu_registry(), 15, constant(1.0)).unwrap_err();
        assert!(matches!(err, ProviderError::Encode(EncodeError::UnknownVersion { version: 15, .. })));
    }
}
