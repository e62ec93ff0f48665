//! DMA transfer workloads.
//!
//! [`DmaWorkload`] is the generic, tensor based description used by the theoretical model.
//! The NN models were trained on narrower, byte geometry descriptions that differ per
//! hardware generation: [`DmaNnWorkloadNpu27`] (planes) and [`DmaNnWorkloadNpu40`] (up to
//! six addressing dimensions). A generic workload converts into either one only when it is
//! a plain copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::tensor::Tensor;
use crate::types::{DataType, Device, DmaEngines, MemoryDirection, MemoryLocation};
use crate::{TextEnum, DUMP_TERMINATOR};

/// Generic DMA transfer between two memory locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DmaWorkload {
    pub device: Device,
    pub input: Tensor,
    pub output: Tensor,
    pub input_location: MemoryLocation,
    pub output_location: MemoryLocation,
    /// Number of CMX tiles the output is broadcast to.
    #[serde(default = "one")]
    pub output_write_tiles: u32,
}

fn one() -> u32 {
    1
}

impl DmaWorkload {
    pub fn new(
        device: Device,
        input: Tensor,
        output: Tensor,
        input_location: MemoryLocation,
        output_location: MemoryLocation,
    ) -> Self {
        Self {
            device,
            input,
            output,
            input_location,
            output_location,
            output_write_tiles: 1,
        }
    }

    /// A contiguous UINT8 copy of `bytes` bytes.
    pub fn linear(device: Device, bytes: u32, from: MemoryLocation, to: MemoryLocation) -> Self {
        let t = Tensor::new([bytes, 1, 1, 1], DataType::Uint8);
        Self::new(device, t, t, from, to)
    }

    /// Direction of this transfer, when one exists.
    pub fn direction(&self) -> Option<MemoryDirection> {
        create_direction(self.input_location, self.output_location)
    }

    /// Checks shared by every narrowing conversion; returns the byte count and direction.
    fn plain_copy(&self, target: &'static str) -> Result<(i32, MemoryDirection)> {
        let (input, output) = (&self.input, &self.output);
        if input.size() != output.size() || input.dtype != output.dtype || input.layout != output.layout {
            return Err(CoreError::Unrepresentable {
                target,
                reason: "size, datatype or layout change between input and output".to_string(),
            });
        }
        let direction = self.direction().ok_or_else(|| CoreError::Unrepresentable {
            target,
            reason: format!(
                "no transfer direction from {} to {}",
                self.input_location, self.output_location
            ),
        })?;
        let bytes = i32::try_from(input.size()).map_err(|_| CoreError::Unrepresentable {
            target,
            reason: format!("{} bytes exceed the transfer length range", input.size()),
        })?;
        Ok((bytes, direction))
    }
}

/// Direction of a transfer from `from` to `to`. Only DRAM and CMX pairs have one.
pub fn create_direction(from: MemoryLocation, to: MemoryLocation) -> Option<MemoryDirection> {
    use MemoryLocation::{Cmx, Dram};
    match (from, to) {
        (Dram, Dram) => Some(MemoryDirection::Ddr2Ddr),
        (Dram, Cmx) => Some(MemoryDirection::Ddr2Cmx),
        (Cmx, Dram) => Some(MemoryDirection::Cmx2Ddr),
        (Cmx, Cmx) => Some(MemoryDirection::Cmx2Cmx),
        _ => None,
    }
}

/// DMA transfer as seen by the NPU 2.7 DMA engine: lines grouped in planes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DmaNnWorkloadNpu27 {
    pub device: Device,
    /// Planes beyond the first; 0 means a single plane.
    pub num_planes: i32,
    /// Bytes per plane.
    pub length: i32,
    pub src_width: i32,
    pub dst_width: i32,
    pub src_stride: i32,
    pub dst_stride: i32,
    pub src_plane_stride: i32,
    pub dst_plane_stride: i32,
    pub transfer_direction: MemoryDirection,
    #[serde(default)]
    pub loc_name: String,
}

impl DmaNnWorkloadNpu27 {
    /// Single plane transfer of `length` contiguous bytes.
    pub fn contiguous(device: Device, length: i32, transfer_direction: MemoryDirection) -> Self {
        Self {
            device,
            num_planes: 0,
            length,
            src_width: length,
            dst_width: length,
            src_stride: 0,
            dst_stride: 0,
            src_plane_stride: 0,
            dst_plane_stride: 0,
            transfer_direction,
            loc_name: String::new(),
        }
    }

    pub fn accessed_bytes(&self) -> i64 {
        (i64::from(self.num_planes) + 1) * i64::from(self.length)
    }
}

impl TryFrom<&DmaWorkload> for DmaNnWorkloadNpu27 {
    type Error = CoreError;

    /// All data lands in one plane.
    fn try_from(dma: &DmaWorkload) -> Result<Self> {
        let (bytes, direction) = dma.plain_copy("DmaNnWorkloadNpu27")?;
        Ok(Self::contiguous(dma.device, bytes, direction))
    }
}

/// Stride and size of one extra addressing dimension.
///
/// A size counts repetitions minus one, so 0 means one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SizeStride {
    pub src_stride: i32,
    pub dst_stride: i32,
    pub src_dim_size: i32,
    pub dst_dim_size: i32,
}

/// DMA transfer as seen by the NPU 4.0 and later DMA engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DmaNnWorkloadNpu40 {
    pub device: Device,
    /// Bytes in the innermost dimension.
    pub src_width: i32,
    pub dst_width: i32,
    /// Extra dimensions in use; 0 means 1D.
    pub num_dim: i32,
    #[serde(default)]
    pub e_dim: [SizeStride; DmaNnWorkloadNpu40::MAX_EXTRA_DIMENSIONS],
    pub num_engine: DmaEngines,
    pub transfer_direction: MemoryDirection,
    #[serde(default)]
    pub loc_name: String,
}

impl DmaNnWorkloadNpu40 {
    /// Dimensions beyond the innermost width.
    pub const MAX_EXTRA_DIMENSIONS: usize = 5;

    /// Empty CMX to CMX transfer on `device`.
    pub fn new(device: Device) -> Self {
        Self {
            device,
            src_width: 0,
            dst_width: 0,
            num_dim: 0,
            e_dim: [SizeStride::default(); Self::MAX_EXTRA_DIMENSIONS],
            num_engine: DmaEngines::One,
            transfer_direction: MemoryDirection::Cmx2Cmx,
            loc_name: String::new(),
        }
    }

    /// 1D transfer of `width` bytes.
    pub fn linear(device: Device, width: i32, transfer_direction: MemoryDirection) -> Self {
        Self {
            src_width: width,
            dst_width: width,
            transfer_direction,
            ..Self::new(device)
        }
    }

    /// Source bytes touched: the width times every used dimension's repetitions.
    pub fn accessed_bytes(&self) -> i64 {
        let used = usize::try_from(self.num_dim).unwrap_or(0).min(Self::MAX_EXTRA_DIMENSIONS);
        self.e_dim[..used]
            .iter()
            .fold(i64::from(self.src_width), |acc, d| acc * (i64::from(d.src_dim_size) + 1))
    }
}

impl TryFrom<&DmaWorkload> for DmaNnWorkloadNpu40 {
    type Error = CoreError;

    fn try_from(dma: &DmaWorkload) -> Result<Self> {
        let (bytes, direction) = dma.plain_copy("DmaNnWorkloadNpu40")?;
        Ok(Self::linear(dma.device, bytes, direction))
    }
}

impl fmt::Display for DmaWorkload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DMAWorkload: ")?;
        writeln!(f, " device: \t{} : {} ;", self.device.index(), self.device)?;
        writeln!(f, " input: \t{{\n{} ; size(bytes): {} }} ;", self.input, self.input.size())?;
        writeln!(f, " output: \t{{\n{} ; size(bytes): {} }} ;", self.output, self.output.size())?;
        writeln!(
            f,
            " input_location: \t{} : {} ;",
            self.input_location.index(),
            self.input_location
        )?;
        writeln!(
            f,
            " output_location: \t{} : {} ;",
            self.output_location.index(),
            self.output_location
        )?;
        writeln!(f, " output_write_tiles: \t{} ;", self.output_write_tiles)?;
        write!(f, "{DUMP_TERMINATOR}DMAWorkload ")
    }
}

impl fmt::Display for DmaNnWorkloadNpu27 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DMANNWorkload_NPU27: ")?;
        writeln!(f, "device: \t{} : {} ;", self.device.index(), self.device)?;
        writeln!(f, "num_planes: \t{} ;", self.num_planes)?;
        writeln!(f, "length: \t{} ;", self.length)?;
        writeln!(f, "src_width: \t{} ;", self.src_width)?;
        writeln!(f, "dst_width: \t{} ;", self.dst_width)?;
        writeln!(f, "src_stride: \t{} ;", self.src_stride)?;
        writeln!(f, "dst_stride: \t{} ;", self.dst_stride)?;
        writeln!(f, "src_plane_stride: \t{} ;", self.src_plane_stride)?;
        writeln!(f, "dst_plane_stride: \t{} ;", self.dst_plane_stride)?;
        writeln!(
            f,
            "direction: \t{} : {} ;",
            self.transfer_direction.index(),
            self.transfer_direction
        )?;
        write!(f, "{DUMP_TERMINATOR}DMANNWorkload_NPU27 ")
    }
}

impl fmt::Display for DmaNnWorkloadNpu40 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DMANNWorkload_NPU40: ")?;
        writeln!(f, "device: \t{} : {} ;", self.device.index(), self.device)?;
        writeln!(f, "src_width: \t{} ;", self.src_width)?;
        writeln!(f, "dst_width: \t{} ;", self.dst_width)?;
        writeln!(f, "num_dim: \t{} ;", self.num_dim)?;
        for (i, dim) in self.e_dim.iter().enumerate() {
            let n = i + 1;
            writeln!(f, "  src_stride_{n}  : \t{} ;", dim.src_stride)?;
            writeln!(f, "  dst_stride_{n}  : \t{} ;", dim.dst_stride)?;
            writeln!(f, "  src_dim_size_{n}: \t{} ;", dim.src_dim_size)?;
            writeln!(f, "  dst_dim_size_{n}: \t{} ;", dim.dst_dim_size)?;
        }
        writeln!(f, "Num_DMA_Engine: \t{} : {} ;", self.num_engine.index(), self.num_engine)?;
        writeln!(
            f,
            "direction: \t{} : {} ;",
            self.transfer_direction.index(),
            self.transfer_direction
        )?;
        write!(f, "{DUMP_TERMINATOR}DMANNWorkload_NPU40 ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Layout;

    #[test]
    fn directions_cover_dram_and_cmx_only() {
        use MemoryLocation::*;
        assert_eq!(create_direction(Dram, Cmx), Some(MemoryDirection::Ddr2Cmx));
        assert_eq!(create_direction(Cmx, Dram), Some(MemoryDirection::Cmx2Ddr));
        assert_eq!(create_direction(Cmx, Cmx), Some(MemoryDirection::Cmx2Cmx));
        assert_eq!(create_direction(Dram, Dram), Some(MemoryDirection::Ddr2Ddr));
        assert_eq!(create_direction(Csram, Cmx), None);
        assert_eq!(create_direction(Cmx, Upa), None);
    }

    #[test]
    fn plain_copy_becomes_one_plane() {
        let t = Tensor::new([56, 56, 16, 1], DataType::Float16);
        let dma = DmaWorkload::new(Device::Vpu2_7, t, t, MemoryLocation::Dram, MemoryLocation::Cmx);
        let nn = DmaNnWorkloadNpu27::try_from(&dma).unwrap();
        assert_eq!(nn.num_planes, 0);
        assert_eq!(nn.length, 56 * 56 * 16 * 2);
        assert_eq!(nn.src_width, nn.length);
        assert_eq!(nn.transfer_direction, MemoryDirection::Ddr2Cmx);
        assert_eq!(nn.accessed_bytes(), i64::from(nn.length));
    }

    #[test]
    fn plain_copy_becomes_1d_transfer() {
        let dma = DmaWorkload::linear(Device::Vpu4_0, 4096, MemoryLocation::Cmx, MemoryLocation::Dram);
        let nn = DmaNnWorkloadNpu40::try_from(&dma).unwrap();
        assert_eq!(nn.num_dim, 0);
        assert_eq!(nn.src_width, 4096);
        assert_eq!(nn.num_engine, DmaEngines::One);
        assert_eq!(nn.transfer_direction, MemoryDirection::Cmx2Ddr);
    }

    #[test]
    fn changing_transfers_are_unrepresentable() {
        let t = Tensor::new([16, 16, 16, 1], DataType::Uint8);
        let mut dma = DmaWorkload::new(Device::Vpu2_7, t, t.with_layout(Layout::Cmajor), MemoryLocation::Cmx, MemoryLocation::Cmx);
        assert!(matches!(
            DmaNnWorkloadNpu27::try_from(&dma),
            Err(CoreError::Unrepresentable { .. })
        ));
        dma.output = t.with_dtype(DataType::Int8);
        assert!(DmaNnWorkloadNpu40::try_from(&dma).is_err());
        dma.output = t;
        dma.input_location = MemoryLocation::Upa;
        let err = DmaNnWorkloadNpu40::try_from(&dma).unwrap_err();
        assert!(err.to_string().contains("no transfer direction"));
    }

    #[test]
    fn accessed_bytes_multiplies_used_dimensions() {
        let mut nn = DmaNnWorkloadNpu40::linear(Device::Npu5_0, 64, MemoryDirection::Ddr2Cmx);
        nn.num_dim = 2;
        nn.e_dim[0].src_dim_size = 3;
        nn.e_dim[1].src_dim_size = 1;
        nn.e_dim[2].src_dim_size = 9;
        assert_eq!(nn.accessed_bytes(), 64 * 4 * 2);
    }

    #[test]
    fn dumps_name_their_type() {
        let dma = DmaWorkload::linear(Device::Vpu2_7, 10, MemoryLocation::Dram, MemoryLocation::Cmx);
        assert!(dma.to_string().ends_with("DMAWorkload "));
        let nn = DmaNnWorkloadNpu27::try_from(&dma).unwrap();
        let text = nn.to_string();
        assert!(text.contains("length: \t10 ;"));
        assert!(text.ends_with("DMANNWorkload_NPU27 "));
        let nn40 = DmaNnWorkloadNpu40::try_from(&dma).unwrap().to_string();
        assert!(nn40.contains("  src_dim_size_5: \t0 ;"));
    }
}
