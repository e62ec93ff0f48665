//! Writing values into a descriptor buffer.
//!
//! Every insert takes the current offset and returns the offset after the inserted field,
//! so a recipe is a chain of `offset = ins.x(value, offset)?` calls. The same chain runs in
//! two modes: [`Simulate`] only advances the offset, [`Commit`] writes and bounds checks.
//! Commit mode expects a zero-filled buffer; one-hot fields only write their single 1.0.

use std::marker::PhantomData;

use npucost_core::{HaloInfoHw, HaloInfoHwc, HaloWorkload, TextEnum};

use crate::error::{EncodeError, Result};

mod sealed {
    pub trait Sealed {}
}

/// Insert mode: whether values are actually written.
pub trait InsertMode: sealed::Sealed {
    const WRITES: bool;
}

/// Offsets only; nothing is written.
#[derive(Debug)]
pub enum Simulate {}

/// Values are written and every write is bounds checked.
#[derive(Debug)]
pub enum Commit {}

impl sealed::Sealed for Simulate {}
impl sealed::Sealed for Commit {}

impl InsertMode for Simulate {
    const WRITES: bool = false;
}

impl InsertMode for Commit {
    const WRITES: bool = true;
}

/// Inserts values into an externally owned descriptor buffer.
#[derive(Debug)]
pub struct Inserter<'buf, M: InsertMode> {
    buf: &'buf mut [f32],
    _mode: PhantomData<M>,
}

impl Inserter<'static, Simulate> {
    /// A simulating inserter with no buffer behind it.
    pub fn simulate() -> Self {
        Self {
            buf: &mut [],
            _mode: PhantomData,
        }
    }
}

impl<'buf> Inserter<'buf, Commit> {
    /// A committing inserter over `buf`. The caller zero-fills the buffer.
    pub fn commit(buf: &'buf mut [f32]) -> Self {
        Self {
            buf,
            _mode: PhantomData,
        }
    }
}

impl<'buf, M: InsertMode> Inserter<'buf, M> {
    /// Declared capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn write(&mut self, value: f32, offset: usize) -> Result<()> {
        if !M::WRITES {
            return Ok(());
        }
        let capacity = self.buf.len();
        match self.buf.get_mut(offset) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EncodeError::OutOfRange { offset, capacity }),
        }
    }

    /// One raw value.
    pub fn value(&mut self, value: f32, offset: usize) -> Result<usize> {
        self.write(value, offset)?;
        Ok(offset + 1)
    }

    /// An unsigned integer as one raw value.
    pub fn uint(&mut self, value: u32, offset: usize) -> Result<usize> {
        self.value(value as f32, offset)
    }

    /// A signed integer as one raw value.
    pub fn int(&mut self, value: i32, offset: usize) -> Result<usize> {
        self.value(value as f32, offset)
    }

    /// A boolean as 0.0 or 1.0.
    pub fn flag(&mut self, value: bool, offset: usize) -> Result<usize> {
        self.value(if value { 1.0 } else { 0.0 }, offset)
    }

    /// One-hot field of `E::COUNT` positions, 1.0 at `offset + value.index()`.
    pub fn one_hot<E: TextEnum>(&mut self, value: E, offset: usize) -> Result<usize> {
        let width = E::COUNT;
        if M::WRITES && offset + width > self.buf.len() {
            return Err(EncodeError::OutOfRange {
                offset: offset + width - 1,
                capacity: self.buf.len(),
            });
        }
        let position = value.index();
        if position < width {
            self.write(1.0, offset + position)?;
        }
        Ok(offset + width)
    }

    /// Four raw dimensions, `[W, H, C, B]`.
    pub fn shape(&mut self, shape: &[u32; 4], mut offset: usize) -> Result<usize> {
        for &dim in shape {
            offset = self.uint(dim, offset)?;
        }
        Ok(offset)
    }

    /// Shape and one-hot datatype.
    pub fn tensor<D: TextEnum>(&mut self, shape: &[u32; 4], dtype: D, offset: usize) -> Result<usize> {
        let offset = self.shape(shape, offset)?;
        self.one_hot(dtype, offset)
    }

    /// Shape, one-hot datatype, one-hot layout and the sparsity flag, as older interfaces
    /// describe a tensor.
    pub fn tensor_with_layout<D: TextEnum, L: TextEnum>(
        &mut self,
        shape: &[u32; 4],
        dtype: D,
        layout: L,
        sparse: bool,
        offset: usize,
    ) -> Result<usize> {
        let offset = self.tensor(shape, dtype, offset)?;
        let offset = self.one_hot(layout, offset)?;
        self.flag(sparse, offset)
    }

    /// Top, bottom, left, right.
    pub fn halo_hw(&mut self, halo: &HaloInfoHw, mut offset: usize) -> Result<usize> {
        for edge in [halo.top, halo.bottom, halo.left, halo.right] {
            offset = self.int(edge, offset)?;
        }
        Ok(offset)
    }

    /// Top, bottom, left, right, front, back.
    pub fn halo_hwc(&mut self, halo: &HaloInfoHwc, offset: usize) -> Result<usize> {
        let mut offset = self.halo_hw(&halo.spatial(), offset)?;
        offset = self.int(halo.front, offset)?;
        self.int(halo.back, offset)
    }

    /// Input halo, output halo and output broadcast count. The inbound output halo only
    /// affects memory and is not part of a descriptor.
    pub fn halo(&mut self, halo: &HaloWorkload, offset: usize) -> Result<usize> {
        let offset = self.halo_hwc(&halo.input_0_halo, offset)?;
        let offset = self.halo_hwc(&halo.output_0_halo, offset)?;
        self.halo_hwc(&halo.output_0_halo_broadcast_cnt, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npucost_core::{ExecutionMode, Swizzling};

    #[test]
    fn simulate_only_advances() {
        let mut ins = Inserter::simulate();
        let mut offset = ins.value(3.5, 0).unwrap();
        offset = ins.one_hot(Swizzling::Key3, offset).unwrap();
        offset = ins.shape(&[1, 2, 3, 4], offset).unwrap();
        assert_eq!(offset, 1 + 6 + 4);
        assert_eq!(ins.capacity(), 0);
    }

    #[test]
    fn commit_writes_raw_values() {
        let mut buf = vec![0.0; 6];
        let mut ins = Inserter::commit(&mut buf);
        let mut offset = ins.uint(7, 0).unwrap();
        offset = ins.int(-2, offset).unwrap();
        offset = ins.flag(true, offset).unwrap();
        offset = ins.flag(false, offset).unwrap();
        offset = ins.value(0.25, offset).unwrap();
        assert_eq!(offset, 5);
        assert_eq!(buf, vec![7.0, -2.0, 1.0, 0.0, 0.25, 0.0]);
    }

    #[test]
    fn one_hot_sets_exactly_one_position() {
        for mode in ExecutionMode::variants() {
            let mut buf = vec![0.0; ExecutionMode::COUNT + 1];
            let mut ins = Inserter::commit(&mut buf);
            let offset = ins.one_hot(*mode, 1).unwrap();
            assert_eq!(offset, 1 + ExecutionMode::COUNT);
            assert_eq!(buf[0], 0.0);
            let field = &buf[1..];
            assert_eq!(field.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(field.iter().filter(|&&v| v == 0.0).count(), ExecutionMode::COUNT - 1);
            assert_eq!(field[mode.index()], 1.0);
        }
    }

    #[test]
    fn write_at_capacity_fails() {
        let mut buf = vec![0.0; 2];
        let mut ins = Inserter::commit(&mut buf);
        let offset = ins.value(1.0, 0).unwrap();
        let offset = ins.value(2.0, offset).unwrap();
        let err = ins.value(3.0, offset).unwrap_err();
        assert!(matches!(err, EncodeError::OutOfRange { offset: 2, capacity: 2 }));
    }

    #[test]
    fn one_hot_must_fit_entirely() {
        let mut buf = vec![0.0; 4];
        let mut ins = Inserter::commit(&mut buf);
        assert!(ins.one_hot(Swizzling::Key0, 0).is_err());
        assert!(buf.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn tensor_with_layout_field_order() {
        use npucost_core::{DataType, Layout};
        let mut buf = vec![0.0; 4 + DataType::COUNT + Layout::COUNT + 1];
        let mut ins = Inserter::commit(&mut buf);
        let end = ins
            .tensor_with_layout(&[8, 4, 16, 1], DataType::Float16, Layout::Cmajor, true, 0)
            .unwrap();
        assert_eq!(end, buf.len());
        assert_eq!(&buf[..4], &[8.0, 4.0, 16.0, 1.0]);
        assert_eq!(buf[4 + DataType::Float16.index()], 1.0);
        assert_eq!(buf[4 + DataType::COUNT + Layout::Cmajor.index()], 1.0);
        assert_eq!(buf[end - 1], 1.0);
    }

    #[test]
    fn halo_order_is_tblrfb() {
        let mut halo = HaloWorkload::with_input(HaloInfoHwc::new(1, 2, 3, 4).with_channels(5, 6));
        halo.output_0_inbound_halo = HaloInfoHwc::new(9, 9, 9, 9);
        let mut buf = vec![0.0; 18];
        let mut ins = Inserter::commit(&mut buf);
        assert_eq!(ins.halo(&halo, 0).unwrap(), 18);
        assert_eq!(&buf[..6], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(buf[6..].iter().all(|&v| v == 0.0));
        let mut sim = Inserter::simulate();
        assert_eq!(sim.halo_hw(&HaloInfoHw::default(), 10).unwrap(), 14);
    }
}
