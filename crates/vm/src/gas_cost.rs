//! Gas schedules: static per-opcode costs and the dynamic cost functions
//! charged by the handlers.

use ethereum_types::U256;

use crate::{
    constants::WORD_SIZE_IN_BYTES_U64,
    errors::{ExceptionalHalt, InternalError, VMError},
    host::StorageStatus,
    memory,
    revision::Revision,
};

// Opcode static costs.
pub const ADD: u64 = 3;
pub const MUL: u64 = 5;
pub const SUB: u64 = 3;
pub const DIV: u64 = 5;
pub const SDIV: u64 = 5;
pub const MOD: u64 = 5;
pub const SMOD: u64 = 5;
pub const ADDMOD: u64 = 8;
pub const MULMOD: u64 = 8;
pub const EXP_STATIC: u64 = 10;
pub const EXP_DYNAMIC_BASE: u64 = 50;
/// [EIP-160] raised the per-byte EXP cost from 10 to 50.
pub const EXP_DYNAMIC_BASE_PRE_SPURIOUS_DRAGON: u64 = 10;
pub const SIGNEXTEND: u64 = 5;
pub const LT: u64 = 3;
pub const GT: u64 = 3;
pub const SLT: u64 = 3;
pub const SGT: u64 = 3;
pub const EQ: u64 = 3;
pub const ISZERO: u64 = 3;
pub const AND: u64 = 3;
pub const OR: u64 = 3;
pub const XOR: u64 = 3;
pub const NOT: u64 = 3;
pub const BYTE: u64 = 3;
pub const SHL: u64 = 3;
pub const SHR: u64 = 3;
pub const SAR: u64 = 3;
pub const KECCAK256_STATIC: u64 = 30;
pub const KECCAK256_DYNAMIC_BASE: u64 = 6;
pub const ADDRESS: u64 = 2;
pub const ORIGIN: u64 = 2;
pub const CALLER: u64 = 2;
pub const CALLVALUE: u64 = 2;
pub const CALLDATALOAD: u64 = 3;
pub const CALLDATASIZE: u64 = 2;
pub const CALLDATACOPY_STATIC: u64 = 3;
pub const CALLDATACOPY_DYNAMIC_BASE: u64 = 3;
pub const CODESIZE: u64 = 2;
pub const CODECOPY_STATIC: u64 = 3;
pub const CODECOPY_DYNAMIC_BASE: u64 = 3;
pub const GASPRICE: u64 = 2;
pub const RETURNDATASIZE: u64 = 2;
pub const RETURNDATACOPY_STATIC: u64 = 3;
pub const RETURNDATACOPY_DYNAMIC_BASE: u64 = 3;
pub const BLOCKHASH: u64 = 20;
pub const COINBASE: u64 = 2;
pub const TIMESTAMP: u64 = 2;
pub const NUMBER: u64 = 2;
pub const PREVRANDAO: u64 = 2;
pub const GASLIMIT: u64 = 2;
pub const CHAINID: u64 = 2;
pub const SELFBALANCE: u64 = 5;
pub const BASEFEE: u64 = 2;
pub const BLOBHASH: u64 = 3;
pub const BLOBBASEFEE: u64 = 2;
pub const POP: u64 = 2;
pub const MLOAD_STATIC: u64 = 3;
pub const MSTORE_STATIC: u64 = 3;
pub const MSTORE8_STATIC: u64 = 3;
pub const JUMP: u64 = 8;
pub const JUMPI: u64 = 10;
pub const PC: u64 = 2;
pub const MSIZE: u64 = 2;
pub const GAS: u64 = 2;
pub const JUMPDEST: u64 = 1;
pub const TLOAD: u64 = 100;
pub const TSTORE: u64 = 100;
pub const MCOPY_STATIC: u64 = 3;
pub const MCOPY_DYNAMIC_BASE: u64 = 3;
pub const PUSH0: u64 = 2;
pub const PUSHN: u64 = 3;
pub const DUPN: u64 = 3;
pub const SWAPN: u64 = 3;
pub const LOGN_STATIC: u64 = 375;
pub const LOGN_DYNAMIC_BASE: u64 = 375;
pub const LOGN_DYNAMIC_BYTE_BASE: u64 = 8;

// [EIP-2929] account and storage access.
pub const WARM_ADDRESS_ACCESS_COST: u64 = 100;
pub const COLD_ADDRESS_ACCESS_COST: u64 = 2600;
pub const ADDITIONAL_COLD_ADDRESS_ACCESS_COST: u64 = 2500;
pub const COLD_SLOAD_COST: u64 = 2100;

// CALL family.
pub const CALL_POSITIVE_VALUE: u64 = 9000;
pub const CALL_POSITIVE_VALUE_STIPEND: i64 = 2300;
pub const CALL_TO_NON_EXISTENT_ACCOUNT: u64 = 25000;

// CREATE family.
pub const CREATE_BASE_COST: u64 = 32000;
pub const INIT_CODE_WORD_COST: u64 = 2;
pub const CREATE2_HASHING_WORD_COST: u64 = 6;

// SELFDESTRUCT.
pub const SELFDESTRUCT_STATIC: u64 = 5000;
pub const SELFDESTRUCT_TO_NON_EXISTENT_ACCOUNT: u64 = 25000;

// SSTORE schedule parameters.
pub const SSTORE_SET: u64 = 20000;
pub const SSTORE_RESET: u64 = 5000;
pub const STORAGE_CLEAR_REFUND: i64 = 15000;
/// [EIP-3529] reduced clear refund.
pub const STORAGE_CLEAR_REFUND_POST_LONDON: i64 = 4800;

#[inline]
fn words(size: usize) -> Result<u64, VMError> {
    let size = u64::try_from(size).map_err(|_| InternalError::TypeConversion)?;
    Ok(size.div_ceil(WORD_SIZE_IN_BYTES_U64))
}

#[inline]
fn sum(costs: &[u64]) -> Result<u64, VMError> {
    let mut total: u64 = 0;
    for cost in costs {
        total = total
            .checked_add(*cost)
            .ok_or(ExceptionalHalt::OutOfGas)?;
    }
    Ok(total)
}

/// EXP: static cost plus a per-byte cost on the exponent's length.
pub fn exp(exponent: U256, rev: Revision) -> Result<u64, VMError> {
    let exponent_byte_size = u64::try_from(exponent.bits())
        .map_err(|_| InternalError::TypeConversion)?
        .div_ceil(8);
    let byte_cost = if rev >= Revision::SpuriousDragon {
        EXP_DYNAMIC_BASE
    } else {
        EXP_DYNAMIC_BASE_PRE_SPURIOUS_DRAGON
    };
    let dynamic = byte_cost
        .checked_mul(exponent_byte_size)
        .ok_or(ExceptionalHalt::OutOfGas)?;
    sum(&[EXP_STATIC, dynamic])
}

pub fn keccak256(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
) -> Result<u64, VMError> {
    let word_cost = KECCAK256_DYNAMIC_BASE
        .checked_mul(words(size)?)
        .ok_or(ExceptionalHalt::OutOfGas)?;
    sum(&[
        KECCAK256_STATIC,
        word_cost,
        memory::expansion_cost(new_memory_size, current_memory_size)?,
    ])
}

/// Shared shape of every word-copying opcode: static cost, a per-word copy
/// cost and the memory expansion.
fn copy_behavior(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
    static_cost: u64,
    dynamic_base: u64,
) -> Result<u64, VMError> {
    let copy_cost = dynamic_base
        .checked_mul(words(size)?)
        .ok_or(ExceptionalHalt::OutOfGas)?;
    sum(&[
        static_cost,
        copy_cost,
        memory::expansion_cost(new_memory_size, current_memory_size)?,
    ])
}

pub fn calldatacopy(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
) -> Result<u64, VMError> {
    copy_behavior(
        new_memory_size,
        current_memory_size,
        size,
        CALLDATACOPY_STATIC,
        CALLDATACOPY_DYNAMIC_BASE,
    )
}

pub fn codecopy(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
) -> Result<u64, VMError> {
    copy_behavior(
        new_memory_size,
        current_memory_size,
        size,
        CODECOPY_STATIC,
        CODECOPY_DYNAMIC_BASE,
    )
}

pub fn returndatacopy(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
) -> Result<u64, VMError> {
    copy_behavior(
        new_memory_size,
        current_memory_size,
        size,
        RETURNDATACOPY_STATIC,
        RETURNDATACOPY_DYNAMIC_BASE,
    )
}

pub fn mcopy(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
) -> Result<u64, VMError> {
    copy_behavior(
        new_memory_size,
        current_memory_size,
        size,
        MCOPY_STATIC,
        MCOPY_DYNAMIC_BASE,
    )
}

/// Cost of touching an account: the warm access cost, raised by the cold
/// surcharge from Berlin on.
pub fn account_access(rev: Revision, address_was_cold: bool) -> u64 {
    if rev >= Revision::Berlin && address_was_cold {
        COLD_ADDRESS_ACCESS_COST
    } else {
        WARM_ADDRESS_ACCESS_COST
    }
}

pub fn balance(rev: Revision, address_was_cold: bool) -> u64 {
    account_access(rev, address_was_cold)
}

pub fn extcodesize(rev: Revision, address_was_cold: bool) -> u64 {
    account_access(rev, address_was_cold)
}

pub fn extcodehash(rev: Revision, address_was_cold: bool) -> u64 {
    account_access(rev, address_was_cold)
}

/// SLOAD charges the account-style cold surcharge on a cold slot.
pub fn sload(rev: Revision, slot_was_cold: bool) -> u64 {
    account_access(rev, slot_was_cold)
}

pub fn extcodecopy(
    size: usize,
    new_memory_size: usize,
    current_memory_size: usize,
    address_was_cold: bool,
    rev: Revision,
) -> Result<u64, VMError> {
    copy_behavior(
        new_memory_size,
        current_memory_size,
        size,
        account_access(rev, address_was_cold),
        CODECOPY_DYNAMIC_BASE,
    )
}

pub fn log(
    new_memory_size: usize,
    current_memory_size: usize,
    size: usize,
    topic_count: usize,
) -> Result<u64, VMError> {
    let topic_count = u64::try_from(topic_count).map_err(|_| InternalError::TypeConversion)?;
    let size = u64::try_from(size).map_err(|_| InternalError::TypeConversion)?;
    let topic_cost = LOGN_DYNAMIC_BASE
        .checked_mul(topic_count)
        .ok_or(ExceptionalHalt::OutOfGas)?;
    let byte_cost = LOGN_DYNAMIC_BYTE_BASE
        .checked_mul(size)
        .ok_or(ExceptionalHalt::OutOfGas)?;
    sum(&[
        LOGN_STATIC,
        topic_cost,
        byte_cost,
        memory::expansion_cost(new_memory_size, current_memory_size)?,
    ])
}

pub fn mload(new_memory_size: usize, current_memory_size: usize) -> Result<u64, VMError> {
    sum(&[
        MLOAD_STATIC,
        memory::expansion_cost(new_memory_size, current_memory_size)?,
    ])
}

pub fn mstore(new_memory_size: usize, current_memory_size: usize) -> Result<u64, VMError> {
    sum(&[
        MSTORE_STATIC,
        memory::expansion_cost(new_memory_size, current_memory_size)?,
    ])
}

pub fn mstore8(new_memory_size: usize, current_memory_size: usize) -> Result<u64, VMError> {
    sum(&[
        MSTORE8_STATIC,
        memory::expansion_cost(new_memory_size, current_memory_size)?,
    ])
}

/// RETURN and REVERT only pay for the memory they snapshot.
pub fn exit_opcode(new_memory_size: usize, current_memory_size: usize) -> Result<u64, VMError> {
    memory::expansion_cost(new_memory_size, current_memory_size)
}

/// [EIP-3860] initcode metering plus the CREATE2 hashing cost.
pub fn initcode_cost(code_size: usize, is_create2: bool, rev: Revision) -> Result<u64, VMError> {
    let mut word_cost = 0u64;
    if rev >= Revision::Shanghai {
        word_cost = word_cost
            .checked_add(INIT_CODE_WORD_COST)
            .ok_or(ExceptionalHalt::OutOfGas)?;
    }
    if is_create2 {
        word_cost = word_cost
            .checked_add(CREATE2_HASHING_WORD_COST)
            .ok_or(ExceptionalHalt::OutOfGas)?;
    }
    word_cost
        .checked_mul(words(code_size)?)
        .ok_or(ExceptionalHalt::OutOfGas.into())
}

pub fn selfdestruct(beneficiary_is_absent: bool, beneficiary_was_cold: bool) -> Result<u64, VMError> {
    let mut cost = SELFDESTRUCT_STATIC;
    if beneficiary_is_absent {
        cost = cost
            .checked_add(SELFDESTRUCT_TO_NON_EXISTENT_ACCOUNT)
            .ok_or(ExceptionalHalt::OutOfGas)?;
    }
    if beneficiary_was_cold {
        cost = cost
            .checked_add(ADDITIONAL_COLD_ADDRESS_ACCESS_COST)
            .ok_or(ExceptionalHalt::OutOfGas)?;
    }
    Ok(cost)
}

/// [EIP-150]: a frame may forward at most all but one 64th of its gas.
#[inline]
pub fn max_message_call_gas(gas_remaining: i64) -> i64 {
    let gas_remaining = gas_remaining.max(0);
    gas_remaining.wrapping_sub(gas_remaining.wrapping_div(64))
}

/// The SSTORE schedule of a revision.
struct StorageCostSchedule {
    net_metered: bool,
    warm_access: u64,
    set: u64,
    reset: u64,
    clear_refund: i64,
}

fn storage_cost_schedule(rev: Revision) -> StorageCostSchedule {
    match rev {
        // [EIP-1283], repealed again by Petersburg.
        Revision::Constantinople => StorageCostSchedule {
            net_metered: true,
            warm_access: 200,
            set: SSTORE_SET,
            reset: SSTORE_RESET,
            clear_refund: STORAGE_CLEAR_REFUND,
        },
        // [EIP-2200].
        Revision::Istanbul => StorageCostSchedule {
            net_metered: true,
            warm_access: 800,
            set: SSTORE_SET,
            reset: SSTORE_RESET,
            clear_refund: STORAGE_CLEAR_REFUND,
        },
        // [EIP-2929]: the cold cost moves out of the reset cost.
        Revision::Berlin => StorageCostSchedule {
            net_metered: true,
            warm_access: WARM_ADDRESS_ACCESS_COST,
            set: SSTORE_SET,
            reset: SSTORE_RESET - COLD_SLOAD_COST,
            clear_refund: STORAGE_CLEAR_REFUND,
        },
        rev if rev >= Revision::London => StorageCostSchedule {
            net_metered: true,
            warm_access: WARM_ADDRESS_ACCESS_COST,
            set: SSTORE_SET,
            reset: SSTORE_RESET - COLD_SLOAD_COST,
            clear_refund: STORAGE_CLEAR_REFUND_POST_LONDON,
        },
        _ => StorageCostSchedule {
            net_metered: false,
            warm_access: 200,
            set: SSTORE_SET,
            reset: SSTORE_RESET,
            clear_refund: STORAGE_CLEAR_REFUND,
        },
    }
}

/// SSTORE cost and refund delta for a storage transition.
///
/// The cost is the cold-slot surcharge (Berlin on) plus the warm cost keyed
/// on (revision, status). The refund delta can be negative under net
/// metering, when an earlier refund is taken back.
#[expect(clippy::as_conversions, reason = "schedule values are all small")]
pub fn sstore(rev: Revision, slot_was_cold: bool, status: StorageStatus) -> (u64, i64) {
    let schedule = storage_cost_schedule(rev);
    let warm = schedule.warm_access;
    let warm_i = warm as i64;
    let set_i = schedule.set as i64;
    let reset_i = schedule.reset as i64;
    let clear = schedule.clear_refund;

    let (gas, refund) = if schedule.net_metered {
        match status {
            StorageStatus::Unchanged => (warm, 0),
            StorageStatus::Added => (schedule.set, 0),
            StorageStatus::Deleted => (schedule.reset, clear),
            StorageStatus::Modified => (schedule.reset, 0),
            StorageStatus::DeletedAdded => (warm, -clear),
            StorageStatus::ModifiedDeleted => (warm, clear),
            StorageStatus::DeletedRestored => (warm, reset_i - warm_i - clear),
            StorageStatus::AddedDeleted => (warm, set_i - warm_i),
            StorageStatus::ModifiedRestored => (warm, reset_i - warm_i),
        }
    } else {
        match status {
            StorageStatus::Added | StorageStatus::DeletedAdded | StorageStatus::AddedDeleted => {
                (schedule.set, 0)
            }
            StorageStatus::Deleted
            | StorageStatus::ModifiedDeleted
            | StorageStatus::DeletedRestored => (schedule.reset, clear),
            StorageStatus::Unchanged
            | StorageStatus::Modified
            | StorageStatus::ModifiedRestored => (schedule.reset, 0),
        }
    };

    let cold = if rev >= Revision::Berlin && slot_was_cold {
        COLD_SLOAD_COST
    } else {
        0
    };

    (gas.saturating_add(cold), refund)
}
