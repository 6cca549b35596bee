use ethereum_types::{U256, U512};

use crate::{
    errors::{InternalError, OpcodeResult, VMError},
    gas_cost,
    vm::Vm,
};

// Arithmetic Operations (11)
// Opcodes: ADD, SUB, MUL, DIV, SDIV, MOD, SMOD, ADDMOD, MULMOD, EXP, SIGNEXTEND

impl<'a> Vm<'a> {
    // ADD operation
    #[inline]
    pub fn op_add(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::ADD)?;

        let [augend, addend] = *frame.stack.pop()?;
        let sum = augend.overflowing_add(addend).0;
        frame.stack.push(sum)?;

        Ok(OpcodeResult::Continue)
    }

    // SUB operation
    #[inline]
    pub fn op_sub(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SUB)?;

        let [minuend, subtrahend] = *frame.stack.pop()?;
        let difference = minuend.overflowing_sub(subtrahend).0;
        frame.stack.push(difference)?;

        Ok(OpcodeResult::Continue)
    }

    // MUL operation
    #[inline]
    pub fn op_mul(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::MUL)?;

        let [multiplicand, multiplier] = *frame.stack.pop()?;
        let product = multiplicand.overflowing_mul(multiplier).0;
        frame.stack.push(product)?;

        Ok(OpcodeResult::Continue)
    }

    // DIV operation
    pub fn op_div(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::DIV)?;

        let [dividend, divisor] = *frame.stack.pop()?;
        let Some(quotient) = dividend.checked_div(divisor) else {
            frame.stack.push_zero()?;
            return Ok(OpcodeResult::Continue);
        };
        frame.stack.push(quotient)?;

        Ok(OpcodeResult::Continue)
    }

    // SDIV operation
    pub fn op_sdiv(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SDIV)?;

        let [dividend, divisor] = *frame.stack.pop()?;
        if divisor.is_zero() || dividend.is_zero() {
            frame.stack.push_zero()?;
            return Ok(OpcodeResult::Continue);
        }

        let abs_dividend = abs(dividend);
        let abs_divisor = abs(divisor);

        // MIN / -1 falls out of this on its own: |MIN| wraps back to MIN and
        // the quotient sign stays positive, so MIN is pushed unchanged.
        let quotient = match abs_dividend.checked_div(abs_divisor) {
            Some(quot) => {
                let quotient_is_negative = is_negative(dividend) ^ is_negative(divisor);
                if quotient_is_negative {
                    negate(quot)
                } else {
                    quot
                }
            }
            None => U256::zero(),
        };

        frame.stack.push(quotient)?;

        Ok(OpcodeResult::Continue)
    }

    // MOD operation
    pub fn op_mod(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::MOD)?;

        let [dividend, divisor] = *frame.stack.pop()?;
        let remainder = dividend.checked_rem(divisor).unwrap_or_default();
        frame.stack.push(remainder)?;

        Ok(OpcodeResult::Continue)
    }

    // SMOD operation
    pub fn op_smod(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SMOD)?;

        let [unchecked_dividend, unchecked_divisor] = *frame.stack.pop()?;
        if unchecked_divisor.is_zero() || unchecked_dividend.is_zero() {
            frame.stack.push_zero()?;
            return Ok(OpcodeResult::Continue);
        }

        let divisor = abs(unchecked_divisor);
        let dividend = abs(unchecked_dividend);

        let unchecked_remainder = match dividend.checked_rem(divisor) {
            Some(remainder) => remainder,
            None => {
                frame.stack.push_zero()?;
                return Ok(OpcodeResult::Continue);
            }
        };

        // The remainder takes the sign of the dividend.
        let remainder = if is_negative(unchecked_dividend) {
            negate(unchecked_remainder)
        } else {
            unchecked_remainder
        };

        frame.stack.push(remainder)?;

        Ok(OpcodeResult::Continue)
    }

    // ADDMOD operation
    pub fn op_addmod(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::ADDMOD)?;

        let [augend, addend, modulus] = *frame.stack.pop()?;
        if modulus.is_zero() {
            frame.stack.push_zero()?;
            return Ok(OpcodeResult::Continue);
        }

        // The addition must not wrap at 256 bits, so it is done in 512.
        let augend: U512 = augend.into();
        let addend: U512 = addend.into();
        let modulus: U512 = modulus.into();

        #[expect(
            clippy::arithmetic_side_effects,
            reason = "the sum of two u256 fits in a U512 and the modulus is non-zero"
        )]
        let sum_mod = (augend + addend) % modulus;

        let sum_mod: U256 = sum_mod
            .try_into()
            .map_err(|_| InternalError::TypeConversion)?;
        frame.stack.push(sum_mod)?;

        Ok(OpcodeResult::Continue)
    }

    // MULMOD operation
    pub fn op_mulmod(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::MULMOD)?;

        let [multiplicand, multiplier, modulus] = *frame.stack.pop()?;
        if modulus.is_zero() || multiplicand.is_zero() || multiplier.is_zero() {
            frame.stack.push_zero()?;
            return Ok(OpcodeResult::Continue);
        }

        let product = multiplicand.full_mul(multiplier);

        #[expect(clippy::arithmetic_side_effects, reason = "modulus isn't zero")]
        let product_mod = product % U512::from(modulus);

        let product_mod: U256 = product_mod
            .try_into()
            .map_err(|_| InternalError::TypeConversion)?;
        frame.stack.push(product_mod)?;

        Ok(OpcodeResult::Continue)
    }

    // EXP operation
    pub fn op_exp(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [base, exponent] = *frame.stack.pop()?;

        let gas_cost = gas_cost::exp(exponent, frame.revision)?;
        frame.increase_consumed_gas(gas_cost)?;

        let power = base.overflowing_pow(exponent).0;
        frame.stack.push(power)?;

        Ok(OpcodeResult::Continue)
    }

    // SIGNEXTEND operation
    pub fn op_signextend(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SIGNEXTEND)?;

        let [byte_size_minus_one, value_to_extend] = *frame.stack.pop()?;
        if byte_size_minus_one > U256::from(30) {
            frame.stack.push(value_to_extend)?;
            return Ok(OpcodeResult::Continue);
        }

        #[expect(
            clippy::arithmetic_side_effects,
            reason = "byte_size_minus_one is at most 30, so the index tops out at 247"
        )]
        {
            let sign_bit_index = byte_size_minus_one * 8 + 7;
            let sign_bit = (value_to_extend >> sign_bit_index) & U256::one();
            let mask = (U256::one() << sign_bit_index) - U256::one();

            let result = if sign_bit.is_zero() {
                value_to_extend & mask
            } else {
                value_to_extend | !mask
            };
            frame.stack.push(result)?;
        }

        Ok(OpcodeResult::Continue)
    }
}

/// The most significant bit set means the value is negative in two's
/// complement.
pub(crate) fn is_negative(value: U256) -> bool {
    value.bit(255)
}

/// Two's complement negation.
pub(crate) fn negate(value: U256) -> U256 {
    let (negated, _overflowed) = (!value).overflowing_add(U256::one());
    negated
}

pub(crate) fn abs(value: U256) -> U256 {
    if is_negative(value) {
        negate(value)
    } else {
        value
    }
}
