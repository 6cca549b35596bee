use ethereum_types::U256;

pub const WORD_SIZE_IN_BYTES_USIZE: usize = 32;
pub const WORD_SIZE_IN_BYTES_U64: u64 = 32;
pub const WORD_SIZE: usize = 32;

/// Maximum height of the evaluation stack.
pub const STACK_LIMIT: usize = 1024;

/// Maximum call/create nesting depth.
pub const MAX_CALL_DEPTH: u32 = 1024;

/// Denominator of the quadratic term of the memory expansion cost.
pub const MEMORY_EXPANSION_QUOTIENT: u64 = 512;

/// Hard bound on a single frame's memory. Accesses past this halt the frame
/// before any allocation happens.
pub const MAX_MEMORY_SIZE: usize = 1 << 32;

/// [EIP-3860] initcode size bound, enforced from Shanghai.
pub const INIT_CODE_MAX_SIZE: usize = 49152;

/// Success flag pushed by the CALL family.
pub const SUCCESS: U256 = U256([1, 0, 0, 0]);
/// Failure flag pushed by the CALL and CREATE families.
pub const FAIL: U256 = U256([0, 0, 0, 0]);
