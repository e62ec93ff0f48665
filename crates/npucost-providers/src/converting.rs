//! Providers of one workload type seen as providers of another.
//!
//! Priority chains hold providers of a single workload type. A model trained on a narrower
//! workload (the NN DMA models, for instance) joins a chain of generic workloads through a
//! conversion; when the conversion fails the provider reports
//! `ERROR_INVALID_INPUT_CONFIGURATION` and the chain moves on.

use std::fmt;
use std::sync::Arc;

use npucost_core::cycles::ERROR_INVALID_INPUT_CONFIGURATION;
use npucost_core::{CoreError, CyclesInterfaceType};

use crate::error::{ProviderError, Result};
use crate::provider::CostProvider;

/// A provider of `W` workloads, possibly converting them for the provider it wraps.
#[derive(Clone)]
pub struct ConvertingProvider<W> {
    inner: Arc<dyn CostProvider<W>>,
}

impl<W: 'static> ConvertingProvider<W> {
    /// Wrap a provider of `W` as is.
    pub fn direct(provider: Arc<dyn CostProvider<W>>) -> Self {
        Self { inner: provider }
    }

    /// Wrap a provider of `T`, converting each workload with `convert`.
    pub fn new<T, F>(provider: Arc<dyn CostProvider<T>>, convert: F) -> Self
    where
        T: 'static,
        F: Fn(&W) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Converted { provider, convert }),
        }
    }

    /// Wrap a provider of `T`, converting with `T`'s `TryFrom<&W>`.
    pub fn try_from_workload<T>(provider: Arc<dyn CostProvider<T>>) -> Self
    where
        T: for<'a> TryFrom<&'a W, Error = CoreError> + 'static,
    {
        Self::new(provider, |wl: &W| T::try_from(wl).map_err(ProviderError::from))
    }
}

impl<W> CostProvider<W> for ConvertingProvider<W> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    fn get_cost(&self, workload: &W, source: Option<&mut String>) -> CyclesInterfaceType {
        self.inner.get_cost(workload, source)
    }
}

impl<W> fmt::Debug for ConvertingProvider<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertingProvider").field("name", &self.inner.name()).finish()
    }
}

struct Converted<T, F> {
    provider: Arc<dyn CostProvider<T>>,
    convert: F,
}

impl<W, T, F> CostProvider<W> for Converted<T, F>
where
    F: Fn(&W) -> Result<T> + Send + Sync,
{
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_initialized(&self) -> bool {
        self.provider.is_initialized()
    }

    fn get_cost(&self, workload: &W, source: Option<&mut String>) -> CyclesInterfaceType {
        match (self.convert)(workload) {
            Ok(converted) => self.provider.get_cost(&converted, source),
            Err(err) => {
                tracing::debug!(provider = self.provider.name(), error = %err, "workload conversion failed");
                ERROR_INVALID_INPUT_CONFIGURATION
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::report_source;
    use npucost_core::{
        DataType, Device, DmaNnWorkloadNpu27, DmaWorkload, Layout, MemoryDirection, MemoryLocation, Tensor,
    };

    /// Costs a plane transfer at one cycle per byte.
    struct PerByte;

    impl CostProvider<DmaNnWorkloadNpu27> for PerByte {
        fn name(&self) -> &str {
            "per-byte"
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn get_cost(&self, wl: &DmaNnWorkloadNpu27, source: Option<&mut String>) -> CyclesInterfaceType {
            report_source(source, self.name());
            wl.length as CyclesInterfaceType
        }
    }

    fn per_byte() -> ConvertingProvider<DmaWorkload> {
        ConvertingProvider::try_from_workload(Arc::new(PerByte) as Arc<dyn CostProvider<DmaNnWorkloadNpu27>>)
    }

    #[test]
    fn plain_copies_reach_the_wrapped_provider() {
        let provider = per_byte();
        let wl = DmaWorkload::linear(Device::Vpu2_7, 4096, MemoryLocation::Dram, MemoryLocation::Cmx);
        let mut source = String::new();
        assert_eq!(provider.get_cost(&wl, Some(&mut source)), 4096);
        assert_eq!(source, "per-byte");
        assert_eq!(provider.name(), "per-byte");
        assert!(provider.is_initialized());
    }

    #[test]
    fn unrepresentable_workloads_are_invalid_input() {
        let provider = per_byte();
        let t = Tensor::new([64, 32, 1, 1], DataType::Float16);
        let wl = DmaWorkload::new(
            Device::Vpu2_7,
            t,
            t.with_layout(Layout::Xyz),
            MemoryLocation::Cmx,
            MemoryLocation::Cmx,
        );
        let mut source = String::from("untouched");
        assert_eq!(provider.get_cost(&wl, Some(&mut source)), ERROR_INVALID_INPUT_CONFIGURATION);
        assert_eq!(source, "untouched");
    }

    #[test]
    fn custom_conversion() {
        let provider = ConvertingProvider::new(
            Arc::new(PerByte) as Arc<dyn CostProvider<DmaNnWorkloadNpu27>>,
            |bytes: &i32| Ok(DmaNnWorkloadNpu27::contiguous(Device::Vpu2_7, *bytes, MemoryDirection::Ddr2Cmx)),
        );
        assert_eq!(provider.get_cost(&128, None), 128);
    }

    #[test]
    fn direct_wrapping_keeps_the_provider() {
        let provider = ConvertingProvider::direct(Arc::new(PerByte) as Arc<dyn CostProvider<DmaNnWorkloadNpu27>>);
        let wl = DmaNnWorkloadNpu27::contiguous(Device::Vpu2_7, 64, MemoryDirection::Ddr2Cmx);
        assert_eq!(provider.get_cost(&wl, None), 64);
        assert_eq!(format!("{provider:?}"), "ConvertingProvider { name: \"per-byte\" }");
    }
}
