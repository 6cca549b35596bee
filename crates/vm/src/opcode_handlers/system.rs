use bytes::Bytes;
use ethereum_types::{Address, U256};

use crate::{
    constants::{FAIL, INIT_CODE_MAX_SIZE, MAX_CALL_DEPTH, SUCCESS},
    errors::{ExceptionalHalt, InternalError, OpcodeResult, StatusCode, VMError},
    gas_cost,
    host::{AccessStatus, CallKind, Message},
    memory::calculate_memory_size,
    revision::Revision,
    utils::{address_to_word, size_offset_to_usize, word_to_address},
    vm::Vm,
};

// System Operations (10)
// Opcodes: CREATE, CALL, CALLCODE, RETURN, DELEGATECALL, CREATE2,
// STATICCALL, REVERT, INVALID, SELFDESTRUCT

impl<'a> Vm<'a> {
    // STOP operation
    #[inline]
    pub fn op_stop(&mut self) -> Result<OpcodeResult, VMError> {
        self.context.set_return_data(Bytes::new());
        self.exit_frame(StatusCode::Success)?;
        Ok(OpcodeResult::Halt)
    }

    // CALL operation
    pub fn op_call(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [
            gas,
            callee,
            value,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        ] = *frame.stack.pop()?;
        let callee = word_to_address(callee);
        let (args_size, args_offset) = size_offset_to_usize(args_size, args_offset)?;
        let (return_data_size, return_data_offset) =
            size_offset_to_usize(return_data_size, return_data_offset)?;

        self.generic_call(
            CallKind::Call,
            gas,
            callee,
            value,
            true,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        )
    }

    // CALLCODE operation
    pub fn op_callcode(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [
            gas,
            code_address,
            value,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        ] = *frame.stack.pop()?;
        let code_address = word_to_address(code_address);
        let (args_size, args_offset) = size_offset_to_usize(args_size, args_offset)?;
        let (return_data_size, return_data_offset) =
            size_offset_to_usize(return_data_size, return_data_offset)?;

        self.generic_call(
            CallKind::CallCode,
            gas,
            code_address,
            value,
            true,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        )
    }

    // DELEGATECALL operation
    pub fn op_delegatecall(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [
            gas,
            code_address,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        ] = *frame.stack.pop()?;
        let code_address = word_to_address(code_address);
        let (args_size, args_offset) = size_offset_to_usize(args_size, args_offset)?;
        let (return_data_size, return_data_offset) =
            size_offset_to_usize(return_data_size, return_data_offset)?;

        self.generic_call(
            CallKind::DelegateCall,
            gas,
            code_address,
            U256::zero(),
            false,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        )
    }

    // STATICCALL operation
    pub fn op_staticcall(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [
            gas,
            callee,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        ] = *frame.stack.pop()?;
        let callee = word_to_address(callee);
        let (args_size, args_offset) = size_offset_to_usize(args_size, args_offset)?;
        let (return_data_size, return_data_offset) =
            size_offset_to_usize(return_data_size, return_data_offset)?;

        self.generic_call(
            CallKind::StaticCall,
            gas,
            callee,
            U256::zero(),
            false,
            args_offset,
            args_size,
            return_data_offset,
            return_data_size,
        )
    }

    // CREATE operation
    pub fn op_create(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [value, code_offset, code_size] = *frame.stack.pop()?;
        let (code_size, code_offset) = size_offset_to_usize(code_size, code_offset)?;

        self.generic_create(value, code_offset, code_size, None)
    }

    // CREATE2 operation
    pub fn op_create2(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [value, code_offset, code_size, salt] = *frame.stack.pop()?;
        let (code_size, code_offset) = size_offset_to_usize(code_size, code_offset)?;

        self.generic_create(value, code_offset, code_size, Some(salt))
    }

    // RETURN operation
    #[inline]
    pub fn op_return(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [offset, size] = *frame.stack.pop()?;
        let (size, offset) = size_offset_to_usize(size, offset)?;

        let output = if size == 0 {
            Bytes::new()
        } else {
            let new_memory_size = calculate_memory_size(offset, size)?;
            frame
                .increase_consumed_gas(gas_cost::exit_opcode(new_memory_size, frame.memory.len())?)?;
            frame.memory.load_range(offset, size)?
        };

        self.context.set_return_data(output);
        self.exit_frame(StatusCode::Success)?;

        Ok(OpcodeResult::Halt)
    }

    // REVERT operation
    pub fn op_revert(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [offset, size] = *frame.stack.pop()?;
        let (size, offset) = size_offset_to_usize(size, offset)?;

        let output = if size == 0 {
            Bytes::new()
        } else {
            let new_memory_size = calculate_memory_size(offset, size)?;
            frame
                .increase_consumed_gas(gas_cost::exit_opcode(new_memory_size, frame.memory.len())?)?;
            frame.memory.load_range(offset, size)?
        };

        self.context.set_return_data(output);

        // The driver unwinds the frame; unlike a fault, unused gas survives.
        Err(VMError::RevertOpcode)
    }

    // INVALID operation
    pub fn op_invalid(&mut self) -> Result<OpcodeResult, VMError> {
        Err(ExceptionalHalt::InvalidOpcode.into())
    }

    // SELFDESTRUCT operation
    pub fn op_selfdestruct(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        if frame.is_static() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }

        let beneficiary = word_to_address(frame.stack.pop1()?);
        let recipient = frame.msg.recipient;
        let rev = frame.revision;

        // [EIP-161]: sending the balance to a fresh account pays for its
        // creation.
        let beneficiary_is_absent =
            rev >= Revision::SpuriousDragon && !self.host.account_exists(beneficiary);
        let beneficiary_was_cold =
            rev >= Revision::Berlin && self.host.access_account(beneficiary) == AccessStatus::Cold;

        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::selfdestruct(
            beneficiary_is_absent,
            beneficiary_was_cold,
        )?)?;

        self.host.selfdestruct(recipient, beneficiary);

        self.context.set_return_data(Bytes::new());
        self.exit_frame(StatusCode::Success)?;

        Ok(OpcodeResult::Halt)
    }

    /// Common behavior of the CALL family.
    #[allow(clippy::too_many_arguments)]
    fn generic_call(
        &mut self,
        kind: CallKind,
        requested_gas: U256,
        callee: Address,
        value: U256,
        needs_value: bool,
        args_offset: usize,
        args_size: usize,
        return_data_offset: usize,
        return_data_size: usize,
    ) -> Result<OpcodeResult, VMError> {
        // Assume failure so every early exit leaves a consistent stack.
        let frame = self.context.current_frame()?;
        frame.stack.push(FAIL)?;
        self.context.set_return_data(Bytes::new());

        let frame = self.context.current_frame()?;
        let rev = frame.revision;

        // [EIP-2929] account warming.
        let address_was_cold =
            rev >= Revision::Berlin && self.host.access_account(callee) == AccessStatus::Cold;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::account_access(rev, address_was_cold))?;

        // Light failure: the call never happens, the assumed zero stays.
        let depth = frame.msg.depth;
        let current_contract = frame.msg.recipient;
        if depth >= MAX_CALL_DEPTH {
            self.context.set_status(StatusCode::Success);
            return Ok(OpcodeResult::Continue);
        }
        if needs_value && self.host.get_balance(current_contract) < value {
            self.context.set_status(StatusCode::Success);
            return Ok(OpcodeResult::Continue);
        }

        // Both the input and the output range must fit in memory.
        let frame = self.context.current_frame()?;
        let new_memory_size = calculate_memory_size(args_offset, args_size)?
            .max(calculate_memory_size(return_data_offset, return_data_size)?);
        frame.increase_consumed_gas(crate::memory::expansion_cost(
            new_memory_size,
            frame.memory.len(),
        )?)?;
        frame.memory.resize(new_memory_size)?;

        // [EIP-150] gas forwarding.
        let gas = if rev >= Revision::TangerineWhistle {
            let forwardable = gas_cost::max_message_call_gas(frame.gas_remaining);
            let forwardable_u64 =
                u64::try_from(forwardable).map_err(|_| InternalError::TypeConversion)?;
            if requested_gas < U256::from(forwardable_u64) {
                // Fits: the requested amount is below an i64 as well.
                let requested =
                    u64::try_from(requested_gas).map_err(|_| InternalError::TypeConversion)?;
                i64::try_from(requested).map_err(|_| InternalError::TypeConversion)?
            } else {
                forwardable
            }
        } else {
            // Early revisions fault instead of clamping.
            let remaining =
                u64::try_from(frame.gas_remaining.max(0)).map_err(|_| InternalError::TypeConversion)?;
            if requested_gas > U256::from(remaining) {
                return Err(ExceptionalHalt::OutOfGas.into());
            }
            let requested =
                u64::try_from(requested_gas).map_err(|_| InternalError::TypeConversion)?;
            i64::try_from(requested).map_err(|_| InternalError::TypeConversion)?
        };

        let transfers_value = needs_value && !value.is_zero();
        let mut extra_cost: u64 = 0;
        if transfers_value {
            extra_cost = extra_cost
                .checked_add(gas_cost::CALL_POSITIVE_VALUE)
                .ok_or(InternalError::Overflow)?;
        }
        if kind == CallKind::Call {
            if frame.is_static() {
                return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
            }
            if !self.host.account_exists(callee) {
                extra_cost = extra_cost
                    .checked_add(gas_cost::CALL_TO_NON_EXISTENT_ACCOUNT)
                    .ok_or(InternalError::Overflow)?;
            }
        }
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(extra_cost)?;

        // Value-bearing calls carry a stipend so the callee can at least run
        // minimal bookkeeping.
        let gas = if transfers_value {
            gas.checked_add(gas_cost::CALL_POSITIVE_VALUE_STIPEND)
                .ok_or(InternalError::Overflow)?
        } else {
            gas
        };

        let input = frame.memory.load_range(args_offset, args_size)?;
        let msg = Message {
            kind,
            is_static: kind == CallKind::StaticCall || frame.is_static(),
            depth: frame.msg.depth.wrapping_add(1),
            gas,
            recipient: match kind {
                CallKind::Call | CallKind::StaticCall => callee,
                _ => frame.msg.recipient,
            },
            sender: if kind == CallKind::DelegateCall {
                frame.msg.sender
            } else {
                frame.msg.recipient
            },
            value: if kind == CallKind::DelegateCall {
                frame.msg.value
            } else {
                value
            },
            input,
            code_address: callee,
            salt: None,
        };

        let outcome = self.host.call(msg);

        let frame = self.context.current_frame()?;
        if outcome.is_success() {
            frame.stack.pop1()?;
            frame.stack.push(SUCCESS)?;
        }

        // Bill the gas the callee consumed. The stipend part was never
        // deducted from this frame, so a callee that burns into it could
        // exceed what is left; that excess is not billed.
        let consumed = gas
            .checked_sub(outcome.gas_left)
            .ok_or(InternalError::Underflow)?;
        if let Some(remaining) = frame.gas_remaining.checked_sub(consumed) {
            if remaining >= 0 {
                frame.gas_remaining = remaining;
            }
        }
        frame.gas_refund = frame
            .gas_refund
            .checked_add(outcome.gas_refund)
            .ok_or(InternalError::Overflow)?;

        let copy_size = return_data_size.min(outcome.output.len());
        frame.memory.store_data(
            return_data_offset,
            outcome
                .output
                .get(..copy_size)
                .ok_or(InternalError::Underflow)?,
        )?;

        self.context.set_return_data(outcome.output);
        self.context.set_status(outcome.status);

        Ok(OpcodeResult::Continue)
    }

    /// Common behavior of CREATE and CREATE2.
    fn generic_create(
        &mut self,
        value: U256,
        code_offset: usize,
        code_size: usize,
        salt: Option<U256>,
    ) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let rev = frame.revision;

        frame.increase_consumed_gas(gas_cost::CREATE_BASE_COST)?;

        // Assume failure so every early exit leaves a consistent stack.
        frame.stack.push(FAIL)?;
        self.context.set_return_data(Bytes::new());

        let frame = self.context.current_frame()?;
        if frame.is_static() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }

        // [EIP-3860] initcode bound and metering.
        if rev >= Revision::Shanghai && code_size > INIT_CODE_MAX_SIZE {
            return Err(ExceptionalHalt::OutOfGas.into());
        }
        frame.increase_consumed_gas(gas_cost::initcode_cost(code_size, salt.is_some(), rev)?)?;

        // Light failure: nothing is created, the assumed zero stays.
        let depth = frame.msg.depth;
        let deployer = frame.msg.recipient;
        if depth >= MAX_CALL_DEPTH {
            self.context.set_status(StatusCode::Success);
            return Ok(OpcodeResult::Continue);
        }
        if self.host.get_balance(deployer) < value {
            self.context.set_status(StatusCode::Success);
            return Ok(OpcodeResult::Continue);
        }

        let frame = self.context.current_frame()?;
        let new_memory_size = calculate_memory_size(code_offset, code_size)?;
        frame.increase_consumed_gas(crate::memory::expansion_cost(
            new_memory_size,
            frame.memory.len(),
        )?)?;
        let init_code = frame.memory.load_range(code_offset, code_size)?;

        // [EIP-150]: one 64th of the remaining gas stays behind.
        let gas = if rev >= Revision::TangerineWhistle {
            gas_cost::max_message_call_gas(frame.gas_remaining)
        } else {
            frame.gas_remaining
        };

        let msg = Message {
            kind: if salt.is_some() {
                CallKind::Create2
            } else {
                CallKind::Create
            },
            is_static: false,
            depth: frame.msg.depth.wrapping_add(1),
            gas,
            recipient: Address::zero(),
            sender: deployer,
            value,
            input: init_code,
            code_address: Address::zero(),
            salt,
        };

        let outcome = self.host.call(msg);

        let frame = self.context.current_frame()?;
        let consumed = gas
            .checked_sub(outcome.gas_left)
            .ok_or(InternalError::Underflow)?;
        frame.increase_consumed_gas(u64::try_from(consumed).map_err(|_| InternalError::TypeConversion)?)?;
        frame.gas_refund = frame
            .gas_refund
            .checked_add(outcome.gas_refund)
            .ok_or(InternalError::Overflow)?;

        if outcome.is_success() {
            frame.stack.pop1()?;
            frame
                .stack
                .push(address_to_word(outcome.create_address.unwrap_or_default()))?;
        }

        self.context.set_return_data(outcome.output);
        self.context.set_status(outcome.status);

        Ok(OpcodeResult::Continue)
    }
}
