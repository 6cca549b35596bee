use strum::EnumString;

use crate::{
    errors::{ExceptionalHalt, OpcodeResult, VMError},
    revision::Revision,
    vm::Vm,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, EnumString, Hash)]
pub enum Opcode {
    // Stop and Arithmetic Operations
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,

    // Comparison & Bitwise Logic Operations
    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,
    SHL = 0x1B,
    SHR = 0x1C,
    SAR = 0x1D,

    // KECCAK256
    KECCAK256 = 0x20,

    // Environmental Information
    ADDRESS = 0x30,
    BALANCE = 0x31,
    ORIGIN = 0x32,
    CALLER = 0x33,
    CALLVALUE = 0x34,
    CALLDATALOAD = 0x35,
    CALLDATASIZE = 0x36,
    CALLDATACOPY = 0x37,
    CODESIZE = 0x38,
    CODECOPY = 0x39,
    GASPRICE = 0x3A,
    EXTCODESIZE = 0x3B,
    EXTCODECOPY = 0x3C,
    RETURNDATASIZE = 0x3D,
    RETURNDATACOPY = 0x3E,
    EXTCODEHASH = 0x3F,

    // Block Information
    BLOCKHASH = 0x40,
    COINBASE = 0x41,
    TIMESTAMP = 0x42,
    NUMBER = 0x43,
    PREVRANDAO = 0x44,
    GASLIMIT = 0x45,
    CHAINID = 0x46,
    SELFBALANCE = 0x47,
    BASEFEE = 0x48,
    BLOBHASH = 0x49,
    BLOBBASEFEE = 0x4A,

    // Stack, Memory, Storage, and Flow Operations
    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    SLOAD = 0x54,
    SSTORE = 0x55,
    JUMP = 0x56,
    JUMPI = 0x57,
    PC = 0x58,
    MSIZE = 0x59,
    GAS = 0x5A,
    JUMPDEST = 0x5B,
    TLOAD = 0x5C,
    TSTORE = 0x5D,
    MCOPY = 0x5E,

    // Push Operations
    PUSH0 = 0x5F,
    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,
    PUSH9 = 0x68,
    PUSH10 = 0x69,
    PUSH11 = 0x6A,
    PUSH12 = 0x6B,
    PUSH13 = 0x6C,
    PUSH14 = 0x6D,
    PUSH15 = 0x6E,
    PUSH16 = 0x6F,
    PUSH17 = 0x70,
    PUSH18 = 0x71,
    PUSH19 = 0x72,
    PUSH20 = 0x73,
    PUSH21 = 0x74,
    PUSH22 = 0x75,
    PUSH23 = 0x76,
    PUSH24 = 0x77,
    PUSH25 = 0x78,
    PUSH26 = 0x79,
    PUSH27 = 0x7A,
    PUSH28 = 0x7B,
    PUSH29 = 0x7C,
    PUSH30 = 0x7D,
    PUSH31 = 0x7E,
    PUSH32 = 0x7F,

    // Duplication Operations
    DUP1 = 0x80,
    DUP2 = 0x81,
    DUP3 = 0x82,
    DUP4 = 0x83,
    DUP5 = 0x84,
    DUP6 = 0x85,
    DUP7 = 0x86,
    DUP8 = 0x87,
    DUP9 = 0x88,
    DUP10 = 0x89,
    DUP11 = 0x8A,
    DUP12 = 0x8B,
    DUP13 = 0x8C,
    DUP14 = 0x8D,
    DUP15 = 0x8E,
    DUP16 = 0x8F,

    // Swap Operations
    SWAP1 = 0x90,
    SWAP2 = 0x91,
    SWAP3 = 0x92,
    SWAP4 = 0x93,
    SWAP5 = 0x94,
    SWAP6 = 0x95,
    SWAP7 = 0x96,
    SWAP8 = 0x97,
    SWAP9 = 0x98,
    SWAP10 = 0x99,
    SWAP11 = 0x9A,
    SWAP12 = 0x9B,
    SWAP13 = 0x9C,
    SWAP14 = 0x9D,
    SWAP15 = 0x9E,
    SWAP16 = 0x9F,

    // Logging Operations
    LOG0 = 0xA0,
    LOG1 = 0xA1,
    LOG2 = 0xA2,
    LOG3 = 0xA3,
    LOG4 = 0xA4,

    // System Operations
    CREATE = 0xF0,
    CALL = 0xF1,
    CALLCODE = 0xF2,
    RETURN = 0xF3,
    DELEGATECALL = 0xF4,
    CREATE2 = 0xF5,
    STATICCALL = 0xFA,
    REVERT = 0xFD,
    INVALID = 0xFE,
    SELFDESTRUCT = 0xFF,
}

impl From<u8> for Opcode {
    #[expect(clippy::as_conversions)]
    fn from(byte: u8) -> Self {
        // A const lookup table beats a match here; unknown bytes decode to
        // INVALID.
        const OPCODE_TABLE: [Opcode; 256] = const {
            let mut table = [Opcode::INVALID; 256];
            table[0x00] = Opcode::STOP;
            table[0x01] = Opcode::ADD;
            table[0x02] = Opcode::MUL;
            table[0x03] = Opcode::SUB;
            table[0x04] = Opcode::DIV;
            table[0x05] = Opcode::SDIV;
            table[0x06] = Opcode::MOD;
            table[0x07] = Opcode::SMOD;
            table[0x08] = Opcode::ADDMOD;
            table[0x09] = Opcode::MULMOD;
            table[0x0A] = Opcode::EXP;
            table[0x0B] = Opcode::SIGNEXTEND;
            table[0x10] = Opcode::LT;
            table[0x11] = Opcode::GT;
            table[0x12] = Opcode::SLT;
            table[0x13] = Opcode::SGT;
            table[0x14] = Opcode::EQ;
            table[0x15] = Opcode::ISZERO;
            table[0x16] = Opcode::AND;
            table[0x17] = Opcode::OR;
            table[0x18] = Opcode::XOR;
            table[0x19] = Opcode::NOT;
            table[0x1A] = Opcode::BYTE;
            table[0x1B] = Opcode::SHL;
            table[0x1C] = Opcode::SHR;
            table[0x1D] = Opcode::SAR;
            table[0x20] = Opcode::KECCAK256;
            table[0x30] = Opcode::ADDRESS;
            table[0x31] = Opcode::BALANCE;
            table[0x32] = Opcode::ORIGIN;
            table[0x33] = Opcode::CALLER;
            table[0x34] = Opcode::CALLVALUE;
            table[0x35] = Opcode::CALLDATALOAD;
            table[0x36] = Opcode::CALLDATASIZE;
            table[0x37] = Opcode::CALLDATACOPY;
            table[0x38] = Opcode::CODESIZE;
            table[0x39] = Opcode::CODECOPY;
            table[0x3A] = Opcode::GASPRICE;
            table[0x3B] = Opcode::EXTCODESIZE;
            table[0x3C] = Opcode::EXTCODECOPY;
            table[0x3D] = Opcode::RETURNDATASIZE;
            table[0x3E] = Opcode::RETURNDATACOPY;
            table[0x3F] = Opcode::EXTCODEHASH;
            table[0x40] = Opcode::BLOCKHASH;
            table[0x41] = Opcode::COINBASE;
            table[0x42] = Opcode::TIMESTAMP;
            table[0x43] = Opcode::NUMBER;
            table[0x44] = Opcode::PREVRANDAO;
            table[0x45] = Opcode::GASLIMIT;
            table[0x46] = Opcode::CHAINID;
            table[0x47] = Opcode::SELFBALANCE;
            table[0x48] = Opcode::BASEFEE;
            table[0x49] = Opcode::BLOBHASH;
            table[0x4A] = Opcode::BLOBBASEFEE;
            table[0x50] = Opcode::POP;
            table[0x51] = Opcode::MLOAD;
            table[0x52] = Opcode::MSTORE;
            table[0x53] = Opcode::MSTORE8;
            table[0x54] = Opcode::SLOAD;
            table[0x55] = Opcode::SSTORE;
            table[0x56] = Opcode::JUMP;
            table[0x57] = Opcode::JUMPI;
            table[0x58] = Opcode::PC;
            table[0x59] = Opcode::MSIZE;
            table[0x5A] = Opcode::GAS;
            table[0x5B] = Opcode::JUMPDEST;
            table[0x5C] = Opcode::TLOAD;
            table[0x5D] = Opcode::TSTORE;
            table[0x5E] = Opcode::MCOPY;
            table[0x5F] = Opcode::PUSH0;
            let mut push = 0;
            while push < 32 {
                table[0x60 + push] = PUSH_OPCODES[push];
                push += 1;
            }
            let mut dup = 0;
            while dup < 16 {
                table[0x80 + dup] = DUP_OPCODES[dup];
                dup += 1;
            }
            let mut swap = 0;
            while swap < 16 {
                table[0x90 + swap] = SWAP_OPCODES[swap];
                swap += 1;
            }
            table[0xA0] = Opcode::LOG0;
            table[0xA1] = Opcode::LOG1;
            table[0xA2] = Opcode::LOG2;
            table[0xA3] = Opcode::LOG3;
            table[0xA4] = Opcode::LOG4;
            table[0xF0] = Opcode::CREATE;
            table[0xF1] = Opcode::CALL;
            table[0xF2] = Opcode::CALLCODE;
            table[0xF3] = Opcode::RETURN;
            table[0xF4] = Opcode::DELEGATECALL;
            table[0xF5] = Opcode::CREATE2;
            table[0xFA] = Opcode::STATICCALL;
            table[0xFD] = Opcode::REVERT;
            table[0xFE] = Opcode::INVALID;
            table[0xFF] = Opcode::SELFDESTRUCT;

            table
        };
        #[expect(clippy::indexing_slicing)] // the table covers every byte
        let opcode = OPCODE_TABLE[byte as usize];
        opcode
    }
}

const PUSH_OPCODES: [Opcode; 32] = [
    Opcode::PUSH1,
    Opcode::PUSH2,
    Opcode::PUSH3,
    Opcode::PUSH4,
    Opcode::PUSH5,
    Opcode::PUSH6,
    Opcode::PUSH7,
    Opcode::PUSH8,
    Opcode::PUSH9,
    Opcode::PUSH10,
    Opcode::PUSH11,
    Opcode::PUSH12,
    Opcode::PUSH13,
    Opcode::PUSH14,
    Opcode::PUSH15,
    Opcode::PUSH16,
    Opcode::PUSH17,
    Opcode::PUSH18,
    Opcode::PUSH19,
    Opcode::PUSH20,
    Opcode::PUSH21,
    Opcode::PUSH22,
    Opcode::PUSH23,
    Opcode::PUSH24,
    Opcode::PUSH25,
    Opcode::PUSH26,
    Opcode::PUSH27,
    Opcode::PUSH28,
    Opcode::PUSH29,
    Opcode::PUSH30,
    Opcode::PUSH31,
    Opcode::PUSH32,
];

const DUP_OPCODES: [Opcode; 16] = [
    Opcode::DUP1,
    Opcode::DUP2,
    Opcode::DUP3,
    Opcode::DUP4,
    Opcode::DUP5,
    Opcode::DUP6,
    Opcode::DUP7,
    Opcode::DUP8,
    Opcode::DUP9,
    Opcode::DUP10,
    Opcode::DUP11,
    Opcode::DUP12,
    Opcode::DUP13,
    Opcode::DUP14,
    Opcode::DUP15,
    Opcode::DUP16,
];

const SWAP_OPCODES: [Opcode; 16] = [
    Opcode::SWAP1,
    Opcode::SWAP2,
    Opcode::SWAP3,
    Opcode::SWAP4,
    Opcode::SWAP5,
    Opcode::SWAP6,
    Opcode::SWAP7,
    Opcode::SWAP8,
    Opcode::SWAP9,
    Opcode::SWAP10,
    Opcode::SWAP11,
    Opcode::SWAP12,
    Opcode::SWAP13,
    Opcode::SWAP14,
    Opcode::SWAP15,
    Opcode::SWAP16,
];

impl From<Opcode> for u8 {
    #[allow(clippy::as_conversions)]
    fn from(opcode: Opcode) -> Self {
        opcode as u8
    }
}

impl From<Opcode> for usize {
    #[allow(clippy::as_conversions)]
    fn from(opcode: Opcode) -> Self {
        opcode as usize
    }
}

/// An opcode function handler.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpCodeFn<'a>(fn(&mut Vm<'a>) -> Result<OpcodeResult, VMError>);

impl<'a> OpCodeFn<'a> {
    #[inline(always)]
    pub fn call(self, vm: &mut Vm<'a>) -> Result<OpcodeResult, VMError> {
        (self.0)(vm)
    }
}

impl<'a> Vm<'a> {
    /// Build the opcode lookup table for the given revision.
    ///
    /// Each revision's table extends the previous one, so an opcode byte not
    /// yet assigned at that revision dispatches to the invalid handler.
    pub(crate) fn build_opcode_table(rev: Revision) -> [OpCodeFn<'a>; 256] {
        if rev >= Revision::Cancun {
            Self::build_opcode_table_cancun()
        } else if rev >= Revision::Shanghai {
            Self::build_opcode_table_shanghai()
        } else if rev >= Revision::London {
            Self::build_opcode_table_london()
        } else if rev >= Revision::Istanbul {
            Self::build_opcode_table_istanbul()
        } else if rev >= Revision::Constantinople {
            Self::build_opcode_table_constantinople()
        } else if rev >= Revision::Byzantium {
            Self::build_opcode_table_byzantium()
        } else if rev >= Revision::Homestead {
            Self::build_opcode_table_homestead()
        } else {
            Self::build_opcode_table_frontier()
        }
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_frontier() -> [OpCodeFn<'a>; 256] {
        let mut table: [OpCodeFn<'a>; 256] = [OpCodeFn(Vm::on_invalid_opcode); 256];

        table[Opcode::STOP as usize] = OpCodeFn(Vm::op_stop);
        table[Opcode::ADD as usize] = OpCodeFn(Vm::op_add);
        table[Opcode::MUL as usize] = OpCodeFn(Vm::op_mul);
        table[Opcode::SUB as usize] = OpCodeFn(Vm::op_sub);
        table[Opcode::DIV as usize] = OpCodeFn(Vm::op_div);
        table[Opcode::SDIV as usize] = OpCodeFn(Vm::op_sdiv);
        table[Opcode::MOD as usize] = OpCodeFn(Vm::op_mod);
        table[Opcode::SMOD as usize] = OpCodeFn(Vm::op_smod);
        table[Opcode::ADDMOD as usize] = OpCodeFn(Vm::op_addmod);
        table[Opcode::MULMOD as usize] = OpCodeFn(Vm::op_mulmod);
        table[Opcode::EXP as usize] = OpCodeFn(Vm::op_exp);
        table[Opcode::SIGNEXTEND as usize] = OpCodeFn(Vm::op_signextend);
        table[Opcode::LT as usize] = OpCodeFn(Vm::op_lt);
        table[Opcode::GT as usize] = OpCodeFn(Vm::op_gt);
        table[Opcode::SLT as usize] = OpCodeFn(Vm::op_slt);
        table[Opcode::SGT as usize] = OpCodeFn(Vm::op_sgt);
        table[Opcode::EQ as usize] = OpCodeFn(Vm::op_eq);
        table[Opcode::ISZERO as usize] = OpCodeFn(Vm::op_iszero);
        table[Opcode::AND as usize] = OpCodeFn(Vm::op_and);
        table[Opcode::OR as usize] = OpCodeFn(Vm::op_or);
        table[Opcode::XOR as usize] = OpCodeFn(Vm::op_xor);
        table[Opcode::NOT as usize] = OpCodeFn(Vm::op_not);
        table[Opcode::BYTE as usize] = OpCodeFn(Vm::op_byte);
        table[Opcode::KECCAK256 as usize] = OpCodeFn(Vm::op_keccak256);
        table[Opcode::ADDRESS as usize] = OpCodeFn(Vm::op_address);
        table[Opcode::BALANCE as usize] = OpCodeFn(Vm::op_balance);
        table[Opcode::ORIGIN as usize] = OpCodeFn(Vm::op_origin);
        table[Opcode::CALLER as usize] = OpCodeFn(Vm::op_caller);
        table[Opcode::CALLVALUE as usize] = OpCodeFn(Vm::op_callvalue);
        table[Opcode::CALLDATALOAD as usize] = OpCodeFn(Vm::op_calldataload);
        table[Opcode::CALLDATASIZE as usize] = OpCodeFn(Vm::op_calldatasize);
        table[Opcode::CALLDATACOPY as usize] = OpCodeFn(Vm::op_calldatacopy);
        table[Opcode::CODESIZE as usize] = OpCodeFn(Vm::op_codesize);
        table[Opcode::CODECOPY as usize] = OpCodeFn(Vm::op_codecopy);
        table[Opcode::GASPRICE as usize] = OpCodeFn(Vm::op_gasprice);
        table[Opcode::EXTCODESIZE as usize] = OpCodeFn(Vm::op_extcodesize);
        table[Opcode::EXTCODECOPY as usize] = OpCodeFn(Vm::op_extcodecopy);
        table[Opcode::BLOCKHASH as usize] = OpCodeFn(Vm::op_blockhash);
        table[Opcode::COINBASE as usize] = OpCodeFn(Vm::op_coinbase);
        table[Opcode::TIMESTAMP as usize] = OpCodeFn(Vm::op_timestamp);
        table[Opcode::NUMBER as usize] = OpCodeFn(Vm::op_number);
        table[Opcode::PREVRANDAO as usize] = OpCodeFn(Vm::op_prevrandao);
        table[Opcode::GASLIMIT as usize] = OpCodeFn(Vm::op_gaslimit);
        table[Opcode::POP as usize] = OpCodeFn(Vm::op_pop);
        table[Opcode::MLOAD as usize] = OpCodeFn(Vm::op_mload);
        table[Opcode::MSTORE as usize] = OpCodeFn(Vm::op_mstore);
        table[Opcode::MSTORE8 as usize] = OpCodeFn(Vm::op_mstore8);
        table[Opcode::SLOAD as usize] = OpCodeFn(Vm::op_sload);
        table[Opcode::SSTORE as usize] = OpCodeFn(Vm::op_sstore);
        table[Opcode::JUMP as usize] = OpCodeFn(Vm::op_jump);
        table[Opcode::JUMPI as usize] = OpCodeFn(Vm::op_jumpi);
        table[Opcode::PC as usize] = OpCodeFn(Vm::op_pc);
        table[Opcode::MSIZE as usize] = OpCodeFn(Vm::op_msize);
        table[Opcode::GAS as usize] = OpCodeFn(Vm::op_gas);
        table[Opcode::JUMPDEST as usize] = OpCodeFn(Vm::op_jumpdest);

        table[Opcode::PUSH1 as usize] = OpCodeFn(Vm::op_push::<1>);
        table[Opcode::PUSH2 as usize] = OpCodeFn(Vm::op_push::<2>);
        table[Opcode::PUSH3 as usize] = OpCodeFn(Vm::op_push::<3>);
        table[Opcode::PUSH4 as usize] = OpCodeFn(Vm::op_push::<4>);
        table[Opcode::PUSH5 as usize] = OpCodeFn(Vm::op_push::<5>);
        table[Opcode::PUSH6 as usize] = OpCodeFn(Vm::op_push::<6>);
        table[Opcode::PUSH7 as usize] = OpCodeFn(Vm::op_push::<7>);
        table[Opcode::PUSH8 as usize] = OpCodeFn(Vm::op_push::<8>);
        table[Opcode::PUSH9 as usize] = OpCodeFn(Vm::op_push::<9>);
        table[Opcode::PUSH10 as usize] = OpCodeFn(Vm::op_push::<10>);
        table[Opcode::PUSH11 as usize] = OpCodeFn(Vm::op_push::<11>);
        table[Opcode::PUSH12 as usize] = OpCodeFn(Vm::op_push::<12>);
        table[Opcode::PUSH13 as usize] = OpCodeFn(Vm::op_push::<13>);
        table[Opcode::PUSH14 as usize] = OpCodeFn(Vm::op_push::<14>);
        table[Opcode::PUSH15 as usize] = OpCodeFn(Vm::op_push::<15>);
        table[Opcode::PUSH16 as usize] = OpCodeFn(Vm::op_push::<16>);
        table[Opcode::PUSH17 as usize] = OpCodeFn(Vm::op_push::<17>);
        table[Opcode::PUSH18 as usize] = OpCodeFn(Vm::op_push::<18>);
        table[Opcode::PUSH19 as usize] = OpCodeFn(Vm::op_push::<19>);
        table[Opcode::PUSH20 as usize] = OpCodeFn(Vm::op_push::<20>);
        table[Opcode::PUSH21 as usize] = OpCodeFn(Vm::op_push::<21>);
        table[Opcode::PUSH22 as usize] = OpCodeFn(Vm::op_push::<22>);
        table[Opcode::PUSH23 as usize] = OpCodeFn(Vm::op_push::<23>);
        table[Opcode::PUSH24 as usize] = OpCodeFn(Vm::op_push::<24>);
        table[Opcode::PUSH25 as usize] = OpCodeFn(Vm::op_push::<25>);
        table[Opcode::PUSH26 as usize] = OpCodeFn(Vm::op_push::<26>);
        table[Opcode::PUSH27 as usize] = OpCodeFn(Vm::op_push::<27>);
        table[Opcode::PUSH28 as usize] = OpCodeFn(Vm::op_push::<28>);
        table[Opcode::PUSH29 as usize] = OpCodeFn(Vm::op_push::<29>);
        table[Opcode::PUSH30 as usize] = OpCodeFn(Vm::op_push::<30>);
        table[Opcode::PUSH31 as usize] = OpCodeFn(Vm::op_push::<31>);
        table[Opcode::PUSH32 as usize] = OpCodeFn(Vm::op_push::<32>);

        table[Opcode::DUP1 as usize] = OpCodeFn(Vm::op_dup::<0>);
        table[Opcode::DUP2 as usize] = OpCodeFn(Vm::op_dup::<1>);
        table[Opcode::DUP3 as usize] = OpCodeFn(Vm::op_dup::<2>);
        table[Opcode::DUP4 as usize] = OpCodeFn(Vm::op_dup::<3>);
        table[Opcode::DUP5 as usize] = OpCodeFn(Vm::op_dup::<4>);
        table[Opcode::DUP6 as usize] = OpCodeFn(Vm::op_dup::<5>);
        table[Opcode::DUP7 as usize] = OpCodeFn(Vm::op_dup::<6>);
        table[Opcode::DUP8 as usize] = OpCodeFn(Vm::op_dup::<7>);
        table[Opcode::DUP9 as usize] = OpCodeFn(Vm::op_dup::<8>);
        table[Opcode::DUP10 as usize] = OpCodeFn(Vm::op_dup::<9>);
        table[Opcode::DUP11 as usize] = OpCodeFn(Vm::op_dup::<10>);
        table[Opcode::DUP12 as usize] = OpCodeFn(Vm::op_dup::<11>);
        table[Opcode::DUP13 as usize] = OpCodeFn(Vm::op_dup::<12>);
        table[Opcode::DUP14 as usize] = OpCodeFn(Vm::op_dup::<13>);
        table[Opcode::DUP15 as usize] = OpCodeFn(Vm::op_dup::<14>);
        table[Opcode::DUP16 as usize] = OpCodeFn(Vm::op_dup::<15>);

        table[Opcode::SWAP1 as usize] = OpCodeFn(Vm::op_swap::<1>);
        table[Opcode::SWAP2 as usize] = OpCodeFn(Vm::op_swap::<2>);
        table[Opcode::SWAP3 as usize] = OpCodeFn(Vm::op_swap::<3>);
        table[Opcode::SWAP4 as usize] = OpCodeFn(Vm::op_swap::<4>);
        table[Opcode::SWAP5 as usize] = OpCodeFn(Vm::op_swap::<5>);
        table[Opcode::SWAP6 as usize] = OpCodeFn(Vm::op_swap::<6>);
        table[Opcode::SWAP7 as usize] = OpCodeFn(Vm::op_swap::<7>);
        table[Opcode::SWAP8 as usize] = OpCodeFn(Vm::op_swap::<8>);
        table[Opcode::SWAP9 as usize] = OpCodeFn(Vm::op_swap::<9>);
        table[Opcode::SWAP10 as usize] = OpCodeFn(Vm::op_swap::<10>);
        table[Opcode::SWAP11 as usize] = OpCodeFn(Vm::op_swap::<11>);
        table[Opcode::SWAP12 as usize] = OpCodeFn(Vm::op_swap::<12>);
        table[Opcode::SWAP13 as usize] = OpCodeFn(Vm::op_swap::<13>);
        table[Opcode::SWAP14 as usize] = OpCodeFn(Vm::op_swap::<14>);
        table[Opcode::SWAP15 as usize] = OpCodeFn(Vm::op_swap::<15>);
        table[Opcode::SWAP16 as usize] = OpCodeFn(Vm::op_swap::<16>);

        table[Opcode::LOG0 as usize] = OpCodeFn(Vm::op_log::<0>);
        table[Opcode::LOG1 as usize] = OpCodeFn(Vm::op_log::<1>);
        table[Opcode::LOG2 as usize] = OpCodeFn(Vm::op_log::<2>);
        table[Opcode::LOG3 as usize] = OpCodeFn(Vm::op_log::<3>);
        table[Opcode::LOG4 as usize] = OpCodeFn(Vm::op_log::<4>);

        table[Opcode::CREATE as usize] = OpCodeFn(Vm::op_create);
        table[Opcode::CALL as usize] = OpCodeFn(Vm::op_call);
        table[Opcode::CALLCODE as usize] = OpCodeFn(Vm::op_callcode);
        table[Opcode::RETURN as usize] = OpCodeFn(Vm::op_return);
        table[Opcode::INVALID as usize] = OpCodeFn(Vm::op_invalid);
        table[Opcode::SELFDESTRUCT as usize] = OpCodeFn(Vm::op_selfdestruct);

        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_homestead() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_frontier();

        table[Opcode::DELEGATECALL as usize] = OpCodeFn(Vm::op_delegatecall);
        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_byzantium() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_homestead();

        table[Opcode::RETURNDATASIZE as usize] = OpCodeFn(Vm::op_returndatasize);
        table[Opcode::RETURNDATACOPY as usize] = OpCodeFn(Vm::op_returndatacopy);
        table[Opcode::STATICCALL as usize] = OpCodeFn(Vm::op_staticcall);
        table[Opcode::REVERT as usize] = OpCodeFn(Vm::op_revert);
        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_constantinople() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_byzantium();

        // [EIP-145] shifting instructions.
        table[Opcode::SHL as usize] = OpCodeFn(Vm::op_shl);
        table[Opcode::SHR as usize] = OpCodeFn(Vm::op_shr);
        table[Opcode::SAR as usize] = OpCodeFn(Vm::op_sar);
        // [EIP-1014] CREATE2, [EIP-1052] EXTCODEHASH.
        table[Opcode::CREATE2 as usize] = OpCodeFn(Vm::op_create2);
        table[Opcode::EXTCODEHASH as usize] = OpCodeFn(Vm::op_extcodehash);
        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_istanbul() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_constantinople();

        // [EIP-1344] CHAINID, [EIP-1884] SELFBALANCE.
        table[Opcode::CHAINID as usize] = OpCodeFn(Vm::op_chainid);
        table[Opcode::SELFBALANCE as usize] = OpCodeFn(Vm::op_selfbalance);
        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_london() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_istanbul();

        // [EIP-3198] BASEFEE.
        table[Opcode::BASEFEE as usize] = OpCodeFn(Vm::op_basefee);
        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_shanghai() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_london();

        // [EIP-3855] PUSH0.
        table[Opcode::PUSH0 as usize] = OpCodeFn(Vm::op_push0);
        table
    }

    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    const fn build_opcode_table_cancun() -> [OpCodeFn<'a>; 256] {
        let mut table = Self::build_opcode_table_shanghai();

        // [EIP-1153] transient storage.
        table[Opcode::TLOAD as usize] = OpCodeFn(Vm::op_tload);
        table[Opcode::TSTORE as usize] = OpCodeFn(Vm::op_tstore);
        // [EIP-5656] MCOPY.
        table[Opcode::MCOPY as usize] = OpCodeFn(Vm::op_mcopy);
        // [EIP-4844] BLOBHASH, [EIP-7516] BLOBBASEFEE.
        table[Opcode::BLOBHASH as usize] = OpCodeFn(Vm::op_blobhash);
        table[Opcode::BLOBBASEFEE as usize] = OpCodeFn(Vm::op_blobbasefee);
        table
    }

    /// Dispatch target of every opcode byte the active revision does not
    /// define.
    pub fn on_invalid_opcode(&mut self) -> Result<OpcodeResult, VMError> {
        Err(ExceptionalHalt::InvalidOpcode.into())
    }
}
