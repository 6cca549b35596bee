use ethereum_types::U256;

use crate::{
    constants::WORD_SIZE,
    errors::{InternalError, OpcodeResult, VMError},
    gas_cost,
    vm::Vm,
};

// Comparison and Bitwise Logic Operations (14)
// Opcodes: LT, GT, SLT, SGT, EQ, ISZERO, AND, OR, XOR, NOT, BYTE, SHL, SHR, SAR

impl<'a> Vm<'a> {
    // LT operation
    #[inline]
    pub fn op_lt(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::LT)?;
        let [lho, rho] = *frame.stack.pop()?;
        frame.stack.push(u256_from_bool(lho < rho))?;

        Ok(OpcodeResult::Continue)
    }

    // GT operation
    #[inline]
    pub fn op_gt(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::GT)?;
        let [lho, rho] = *frame.stack.pop()?;
        frame.stack.push(u256_from_bool(lho > rho))?;

        Ok(OpcodeResult::Continue)
    }

    // SLT operation (signed less than)
    pub fn op_slt(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SLT)?;
        let [lho, rho] = *frame.stack.pop()?;
        let lho_is_negative = lho.bit(255);
        let rho_is_negative = rho.bit(255);
        let result = if lho_is_negative == rho_is_negative {
            // Same sign: compare magnitudes.
            u256_from_bool(lho < rho)
        } else {
            // Different sign: the negative one is smaller.
            u256_from_bool(lho_is_negative)
        };
        frame.stack.push(result)?;

        Ok(OpcodeResult::Continue)
    }

    // SGT operation (signed greater than)
    pub fn op_sgt(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SGT)?;
        let [lho, rho] = *frame.stack.pop()?;
        let lho_is_negative = lho.bit(255);
        let rho_is_negative = rho.bit(255);
        let result = if lho_is_negative == rho_is_negative {
            u256_from_bool(lho > rho)
        } else {
            u256_from_bool(rho_is_negative)
        };
        frame.stack.push(result)?;

        Ok(OpcodeResult::Continue)
    }

    // EQ operation
    #[inline]
    pub fn op_eq(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::EQ)?;
        let [lho, rho] = *frame.stack.pop()?;
        frame.stack.push(u256_from_bool(lho == rho))?;

        Ok(OpcodeResult::Continue)
    }

    // ISZERO operation
    #[inline]
    pub fn op_iszero(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::ISZERO)?;
        let operand = frame.stack.pop1()?;
        frame.stack.push(u256_from_bool(operand.is_zero()))?;

        Ok(OpcodeResult::Continue)
    }

    // AND operation
    #[inline]
    pub fn op_and(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::AND)?;
        let [a, b] = *frame.stack.pop()?;
        frame.stack.push(a & b)?;

        Ok(OpcodeResult::Continue)
    }

    // OR operation
    #[inline]
    pub fn op_or(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::OR)?;
        let [a, b] = *frame.stack.pop()?;
        frame.stack.push(a | b)?;

        Ok(OpcodeResult::Continue)
    }

    // XOR operation
    pub fn op_xor(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::XOR)?;
        let [a, b] = *frame.stack.pop()?;
        frame.stack.push(a ^ b)?;

        Ok(OpcodeResult::Continue)
    }

    // NOT operation
    pub fn op_not(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::NOT)?;
        let a = frame.stack.pop1()?;
        frame.stack.push(!a)?;

        Ok(OpcodeResult::Continue)
    }

    // BYTE operation
    pub fn op_byte(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::BYTE)?;
        let [index, word] = *frame.stack.pop()?;
        let byte_index: usize = match index.try_into() {
            Ok(byte_index) => byte_index,
            Err(_) => {
                frame.stack.push_zero()?;
                return Ok(OpcodeResult::Continue);
            }
        };

        if byte_index < WORD_SIZE {
            // Stack words index bytes little-endian, the opcode big-endian.
            let byte_to_push = WORD_SIZE
                .checked_sub(byte_index)
                .and_then(|i| i.checked_sub(1))
                .ok_or(InternalError::Underflow)?;
            frame.stack.push(U256::from(word.byte(byte_to_push)))?;
        } else {
            frame.stack.push_zero()?;
        }

        Ok(OpcodeResult::Continue)
    }

    // SHL operation (shift left)
    #[inline]
    #[expect(clippy::arithmetic_side_effects, reason = "shift is below 256")]
    pub fn op_shl(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SHL)?;
        let [shift, value] = *frame.stack.pop()?;

        if shift < U256::from(256) {
            frame.stack.push(value << shift)?;
        } else {
            frame.stack.push_zero()?;
        }

        Ok(OpcodeResult::Continue)
    }

    // SHR operation (shift right)
    #[inline]
    #[expect(clippy::arithmetic_side_effects, reason = "shift is below 256")]
    pub fn op_shr(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SHR)?;
        let [shift, value] = *frame.stack.pop()?;

        if shift < U256::from(256) {
            frame.stack.push(value >> shift)?;
        } else {
            frame.stack.push_zero()?;
        }

        Ok(OpcodeResult::Continue)
    }

    // SAR operation (arithmetic shift right)
    #[expect(clippy::arithmetic_side_effects, reason = "shift is below 256")]
    pub fn op_sar(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SAR)?;
        let [shift, value] = *frame.stack.pop()?;

        let is_negative = value.bit(255);

        let result = if shift < U256::from(256) {
            if !is_negative {
                value >> shift
            } else if shift.is_zero() {
                value
            } else {
                // Shift in ones from the top.
                (value >> shift) | (U256::MAX << (U256::from(256) - shift))
            }
        } else if is_negative {
            U256::MAX
        } else {
            U256::zero()
        };
        frame.stack.push(result)?;

        Ok(OpcodeResult::Continue)
    }
}

const fn u256_from_bool(value: bool) -> U256 {
    if value {
        U256([1, 0, 0, 0])
    } else {
        U256([0, 0, 0, 0])
    }
}
