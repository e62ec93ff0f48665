//! DMA descriptor layouts.
//!
//! Interface 01 describes NPU 2.7 plane transfers. Interfaces 02 and 03 describe the same
//! NPU 4.0 style workload and differ only in field order: 02 interleaves each extra
//! dimension's strides and sizes, 03 groups all sizes before all strides.

use npucost_core::{Device, DmaNnWorkloadNpu27, DmaNnWorkloadNpu40, MemoryDirection, SizeStride};

use crate::compat::convert;
use crate::encoder::DescriptorRecipe;
use crate::error::Result;
use crate::inserter::{InsertMode, Inserter};
use crate::intf::intf_dma;

fn insert_direction<M: InsertMode>(ins: &mut Inserter<'_, M>, direction: MemoryDirection, offset: usize) -> Result<usize> {
    ins.one_hot(convert::<intf_dma::MemoryDirection, _>(direction)?, offset)
}

/// Interface 01, NPU 2.7 planes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmaNpu27Recipe;

impl DescriptorRecipe for DmaNpu27Recipe {
    type Workload = DmaNnWorkloadNpu27;

    fn interface_version(&self) -> u32 {
        1
    }

    fn declared_size(&self) -> usize {
        12
    }

    fn sample_workload(&self) -> DmaNnWorkloadNpu27 {
        DmaNnWorkloadNpu27::contiguous(Device::Vpu2_7, 1, MemoryDirection::Ddr2Cmx)
    }

    fn write<M: InsertMode>(&self, wl: &DmaNnWorkloadNpu27, ins: &mut Inserter<'_, M>) -> Result<usize> {
        let mut offset = 0;
        for v in [
            wl.num_planes,
            wl.length,
            wl.src_width,
            wl.dst_width,
            wl.src_stride,
            wl.dst_stride,
            wl.src_plane_stride,
            wl.dst_plane_stride,
        ] {
            offset = ins.int(v, offset)?;
        }
        insert_direction(ins, wl.transfer_direction, offset)
    }
}

/// Interface 02, NPU 4.0 with interleaved dimensions and the engine count.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmaNpu40Recipe;

impl DescriptorRecipe for DmaNpu40Recipe {
    type Workload = DmaNnWorkloadNpu40;

    fn interface_version(&self) -> u32 {
        2
    }

    fn declared_size(&self) -> usize {
        29
    }

    fn sample_workload(&self) -> DmaNnWorkloadNpu40 {
        DmaNnWorkloadNpu40::linear(Device::Vpu4_0, 1, MemoryDirection::Ddr2Cmx)
    }

    fn write<M: InsertMode>(&self, wl: &DmaNnWorkloadNpu40, ins: &mut Inserter<'_, M>) -> Result<usize> {
        let mut offset = ins.int(wl.dst_width, 0)?;
        offset = ins.int(wl.src_width, offset)?;
        offset = ins.int(wl.num_dim, offset)?;
        for dim in &wl.e_dim {
            for v in [dim.dst_stride, dim.src_stride, dim.dst_dim_size, dim.src_dim_size] {
                offset = ins.int(v, offset)?;
            }
        }
        offset = ins.one_hot(convert::<intf_dma::NumDmaEngine, _>(wl.num_engine)?, offset)?;
        insert_direction(ins, wl.transfer_direction, offset)
    }
}

/// Interface 03, NPU 5.x with grouped dimensions. The engine count is not described.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmaNpu5xRecipe;

impl DescriptorRecipe for DmaNpu5xRecipe {
    type Workload = DmaNnWorkloadNpu40;

    fn interface_version(&self) -> u32 {
        3
    }

    fn declared_size(&self) -> usize {
        27
    }

    fn sample_workload(&self) -> DmaNnWorkloadNpu40 {
        DmaNnWorkloadNpu40::linear(Device::Npu5_0, 1, MemoryDirection::Ddr2Cmx)
    }

    fn write<M: InsertMode>(&self, wl: &DmaNnWorkloadNpu40, ins: &mut Inserter<'_, M>) -> Result<usize> {
        let mut offset = ins.int(wl.num_dim, 0)?;
        offset = ins.int(wl.dst_width, offset)?;
        offset = ins.int(wl.src_width, offset)?;
        let groups: [fn(&SizeStride) -> i32; 4] = [
            |d| d.dst_dim_size,
            |d| d.src_dim_size,
            |d| d.dst_stride,
            |d| d.src_stride,
        ];
        for field in groups {
            for dim in &wl.e_dim {
                offset = ins.int(field(dim), offset)?;
            }
        }
        insert_direction(ins, wl.transfer_direction, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{DescriptorEncoder, Preprocessing};
    use npucost_core::DmaEngines;

    fn two_dim() -> DmaNnWorkloadNpu40 {
        let mut wl = DmaNnWorkloadNpu40::linear(Device::Vpu4_0, 64, MemoryDirection::Cmx2Ddr);
        wl.dst_width = 32;
        wl.num_dim = 2;
        wl.num_engine = DmaEngines::Two;
        wl.e_dim[0] = SizeStride {
            src_stride: 64,
            dst_stride: 32,
            src_dim_size: 7,
            dst_dim_size: 15,
        };
        wl.e_dim[1] = SizeStride {
            src_stride: 512,
            dst_stride: 1024,
            src_dim_size: 1,
            dst_dim_size: 2,
        };
        wl
    }

    #[test]
    fn npu27_layout() {
        let enc = Preprocessing::new(DmaNpu27Recipe).unwrap();
        let mut wl = DmaNnWorkloadNpu27::contiguous(Device::Vpu2_7, 4096, MemoryDirection::Cmx2Cmx);
        wl.num_planes = 3;
        wl.src_plane_stride = 8192;
        let d = enc.encode(&wl).unwrap();
        assert_eq!(d.len(), 12);
        assert_eq!(&d[..8], &[3.0, 4096.0, 4096.0, 4096.0, 0.0, 0.0, 8192.0, 0.0]);
        assert_eq!(&d[8..], &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn npu40_interleaves_dimensions() {
        let d = Preprocessing::new(DmaNpu40Recipe).unwrap().encode(&two_dim()).unwrap();
        assert_eq!(d.len(), 29);
        assert_eq!(&d[..3], &[32.0, 64.0, 2.0]);
        assert_eq!(&d[3..7], &[32.0, 64.0, 15.0, 7.0]);
        assert_eq!(&d[7..11], &[1024.0, 512.0, 2.0, 1.0]);
        assert!(d[11..23].iter().all(|&v| v == 0.0));
        assert_eq!(&d[23..25], &[0.0, 1.0]);
        assert_eq!(&d[25..], &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn npu5x_groups_dimensions() {
        let d = Preprocessing::new(DmaNpu5xRecipe).unwrap().encode(&two_dim()).unwrap();
        assert_eq!(d.len(), 27);
        assert_eq!(&d[..3], &[2.0, 32.0, 64.0]);
        assert_eq!(&d[3..8], &[15.0, 2.0, 0.0, 0.0, 0.0]);
        assert_eq!(&d[8..13], &[7.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&d[13..18], &[32.0, 1024.0, 0.0, 0.0, 0.0]);
        assert_eq!(&d[18..23], &[64.0, 512.0, 0.0, 0.0, 0.0]);
        assert_eq!(&d[23..], &[0.0, 0.0, 1.0, 0.0]);
    }
}
