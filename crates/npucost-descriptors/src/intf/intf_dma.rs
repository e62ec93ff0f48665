//! Enumerations of the DMA descriptor interfaces (01 to 03).

use npucost_core::text_enum;

use crate::compat::CompatibleEnum;

text_enum! {
    pub enum MemoryDirection {
        Ddr2Cmx => "DDR2CMX",
        Cmx2Cmx => "CMX2CMX",
        Cmx2Ddr => "CMX2DDR",
        Ddr2Ddr => "DDR2DDR",
    }
}

text_enum! {
    pub enum NumDmaEngine {
        One => "Num_Engine_1",
        Two => "Num_Engine_2",
    }
}

impl CompatibleEnum for MemoryDirection {}
impl CompatibleEnum for NumDmaEngine {}
