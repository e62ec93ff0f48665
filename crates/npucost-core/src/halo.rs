//! Halo regions exchanged between neighbouring tiles.
//!
//! Halo values are normally zero or positive and count rows/columns read from or written
//! to other tiles. A negative input halo models a memory tensor larger than the compute
//! tensor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-edge halo in the H and W dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HaloInfoHw {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl HaloInfoHw {
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Force the vertical (H) halo to zero.
    pub fn set_vertical_no_halo(&mut self) {
        self.top = 0;
        self.bottom = 0;
    }
}

/// Per-edge halo in H, W and C.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HaloInfoHwc {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    /// Low index channels.
    pub front: i32,
    /// High index channels.
    pub back: i32,
}

impl HaloInfoHwc {
    /// Spatial-only halo, channels zero.
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
            front: 0,
            back: 0,
        }
    }

    pub fn with_channels(mut self, front: i32, back: i32) -> Self {
        self.front = front;
        self.back = back;
        self
    }

    /// The H/W part.
    pub fn spatial(&self) -> HaloInfoHw {
        HaloInfoHw::new(self.top, self.bottom, self.left, self.right)
    }

    pub fn set_vertical_no_halo(&mut self) {
        self.top = 0;
        self.bottom = 0;
    }

    /// True when no edge is negative.
    pub fn is_all_positive(&self) -> bool {
        [self.top, self.bottom, self.left, self.right, self.front, self.back]
            .iter()
            .all(|&v| v >= 0)
    }
}

/// Every halo aspect of a DPU workload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HaloWorkload {
    /// Rows/columns of the compute input that are read from other tiles. Negative values
    /// extend the memory tensor instead.
    pub input_0_halo: HaloInfoHwc,
    /// Rows/columns of the output also broadcast to adjacent tiles.
    pub output_0_halo: HaloInfoHwc,
    /// To how many tiles the output halo is written.
    pub output_0_halo_broadcast_cnt: HaloInfoHwc,
    /// Elements other tiles write next to our output. Memory only, never encoded.
    pub output_0_inbound_halo: HaloInfoHwc,
}

impl HaloWorkload {
    /// Halo that only carries an input halo.
    pub fn with_input(input_0_halo: HaloInfoHwc) -> Self {
        Self {
            input_0_halo,
            ..Self::default()
        }
    }

    /// Zero the vertical halo everywhere.
    pub fn set_vertical_no_halo(&mut self) {
        self.input_0_halo.set_vertical_no_halo();
        self.output_0_halo.set_vertical_no_halo();
        self.output_0_halo_broadcast_cnt.set_vertical_no_halo();
        self.output_0_inbound_halo.set_vertical_no_halo();
    }

    /// Fill the inbound vertical halo so that every tile's memory output covers the whole
    /// layer output when the split is broadcast to all tiles.
    pub fn set_inbound_halo_vertical_for_broadcast_all(
        &mut self,
        full_output_size: u32,
        output_remaining_to_process: u32,
        output_tile_dim: u32,
    ) {
        let previous = full_output_size.saturating_sub(output_remaining_to_process);
        let next = output_remaining_to_process.saturating_sub(output_tile_dim);
        self.output_0_inbound_halo.top = i32::try_from(previous).unwrap_or(i32::MAX);
        self.output_0_inbound_halo.bottom = i32::try_from(next).unwrap_or(i32::MAX);
    }
}

impl fmt::Display for HaloInfoHw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[TBLR] :  \t{{{},{},{},{}}} ;",
            self.top, self.bottom, self.left, self.right
        )
    }
}

impl fmt::Display for HaloInfoHwc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[TBLRFB] :  \t{{{},{},{},{},{},{}}} ;",
            self.top, self.bottom, self.left, self.right, self.front, self.back
        )
    }
}

impl fmt::Display for HaloWorkload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Halo: ")?;
        writeln!(f, " input {}", self.input_0_halo)?;
        writeln!(f, " output {}", self.output_0_halo)?;
        writeln!(f, " output broadcast {}", self.output_0_halo_broadcast_cnt)?;
        write!(f, " output inbound {}", self.output_0_inbound_halo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_reset_keeps_horizontal() {
        let mut halo = HaloWorkload::with_input(HaloInfoHwc::new(1, 2, 3, 4));
        halo.output_0_halo = HaloInfoHwc::new(5, 6, 7, 8);
        halo.set_vertical_no_halo();
        assert_eq!(halo.input_0_halo, HaloInfoHwc::new(0, 0, 3, 4));
        assert_eq!(halo.output_0_halo, HaloInfoHwc::new(0, 0, 7, 8));
    }

    #[test]
    fn positivity_checks_all_edges() {
        assert!(HaloInfoHwc::new(0, 1, 2, 3).is_all_positive());
        assert!(!HaloInfoHwc::new(0, 1, 2, 3).with_channels(0, -1).is_all_positive());
    }

    #[test]
    fn inbound_broadcast_split() {
        let mut halo = HaloWorkload::default();
        halo.set_inbound_halo_vertical_for_broadcast_all(100, 60, 20);
        assert_eq!(halo.output_0_inbound_halo.top, 40);
        assert_eq!(halo.output_0_inbound_halo.bottom, 40);
    }

    #[test]
    fn display_formats() {
        assert_eq!(HaloInfoHw::new(1, 2, 3, 4).to_string(), "[TBLR] :  \t{1,2,3,4} ;");
        assert!(HaloWorkload::default().to_string().starts_with("Halo: "));
    }
}
