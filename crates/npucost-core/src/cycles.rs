//! Cycle counts and the error codes that share their value space.
//!
//! A cost is a `u32`. Values close to `u32::MAX` are not cycle counts but error codes, so a
//! single number can travel through every provider and be checked at the end.

/// Cycle count or error code.
pub type CyclesInterfaceType = u32;

pub const ERROR_INPUT_TOO_BIG: CyclesInterfaceType = CyclesInterfaceType::MAX;
pub const ERROR_INVALID_INPUT_CONFIGURATION: CyclesInterfaceType = CyclesInterfaceType::MAX - 1;
pub const ERROR_INVALID_INPUT_DEVICE: CyclesInterfaceType = CyclesInterfaceType::MAX - 2;
pub const ERROR_INVALID_INPUT_OPERATION: CyclesInterfaceType = CyclesInterfaceType::MAX - 3;
pub const ERROR_INVALID_OUTPUT_RANGE: CyclesInterfaceType = CyclesInterfaceType::MAX - 4;
pub const ERROR_TILE_OUTPUT: CyclesInterfaceType = CyclesInterfaceType::MAX - 5;
pub const ERROR_TILE_SPLIT_ZERO_CYC_OUTPUT: CyclesInterfaceType = CyclesInterfaceType::MAX - 6;
pub const ERROR_TILE_SPLIT_EXCEPTION: CyclesInterfaceType = CyclesInterfaceType::MAX - 7;
pub const ERROR_INVALID_LAYER_CONFIGURATION: CyclesInterfaceType = CyclesInterfaceType::MAX - 8;
/// Every provider of a priority chain failed.
pub const NO_VALID_COST_PROVIDER: CyclesInterfaceType = CyclesInterfaceType::MAX - 9;

/// Values above this are reserved for error codes.
pub const START_ERROR_RANGE: CyclesInterfaceType = CyclesInterfaceType::MAX - 1000;

const ERROR_TEXTS: &[(CyclesInterfaceType, &str)] = &[
    (ERROR_INPUT_TOO_BIG, "ERROR_INPUT_TOO_BIG"),
    (ERROR_INVALID_INPUT_CONFIGURATION, "ERROR_INVALID_INPUT_CONFIGURATION"),
    (ERROR_INVALID_INPUT_DEVICE, "ERROR_INVALID_INPUT_DEVICE"),
    (ERROR_INVALID_INPUT_OPERATION, "ERROR_INVALID_INPUT_OPERATION"),
    (ERROR_INVALID_OUTPUT_RANGE, "ERROR_INVALID_OUTPUT_RANGE"),
    (ERROR_TILE_OUTPUT, "ERROR_TILE_OUTPUT"),
    (ERROR_TILE_SPLIT_ZERO_CYC_OUTPUT, "ERROR_TILE_SPLIT_ZERO_CYC_OUTPUT"),
    (ERROR_TILE_SPLIT_EXCEPTION, "ERROR_TILE_SPLIT_EXCEPTION"),
    (ERROR_INVALID_LAYER_CONFIGURATION, "ERROR_INVALID_LAYER_CONFIGURATION"),
    (NO_VALID_COST_PROVIDER, "NO_VALID_COST_PROVIDER"),
];

/// True when `cycles` is an error code rather than a cycle count.
pub fn is_error_code(cycles: CyclesInterfaceType) -> bool {
    cycles > START_ERROR_RANGE
}

/// Name of an error code, `"UNKNOWN"` for unnamed codes in the error range, `"NO_ERROR"` for
/// plain cycle counts.
pub fn error_text(cycles: CyclesInterfaceType) -> &'static str {
    if !is_error_code(cycles) {
        return "NO_ERROR";
    }
    ERROR_TEXTS
        .iter()
        .find(|(code, _)| *code == cycles)
        .map(|(_, text)| *text)
        .unwrap_or("UNKNOWN")
}

/// Round a fractional estimate up to whole cycles.
///
/// Negative and NaN estimates become 0; estimates that would land in the error range are
/// saturated to its lower bound.
pub fn to_cycles(estimate: f64) -> CyclesInterfaceType {
    if estimate.is_nan() || estimate <= 0.0 {
        return 0;
    }
    let ceiled = estimate.ceil();
    if ceiled >= f64::from(START_ERROR_RANGE) {
        START_ERROR_RANGE
    } else {
        ceiled as CyclesInterfaceType
    }
}

/// Add two costs. The first error code wins; valid sums saturate below the error range.
pub fn cost_adder(a: CyclesInterfaceType, b: CyclesInterfaceType) -> CyclesInterfaceType {
    if is_error_code(a) {
        return a;
    }
    if is_error_code(b) {
        return b;
    }
    a.saturating_add(b).min(START_ERROR_RANGE)
}
