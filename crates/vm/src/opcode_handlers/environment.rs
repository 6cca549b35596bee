use ethereum_types::U256;

use crate::{
    errors::{InternalError, OpcodeResult, VMError},
    gas_cost,
    host::AccessStatus,
    memory::calculate_memory_size,
    revision::Revision,
    utils::{address_to_word, h256_to_u256, size_offset_to_usize, u256_to_usize, word_to_address},
    vm::Vm,
};

// Environmental Information (16)
// Opcodes: ADDRESS, BALANCE, ORIGIN, CALLER, CALLVALUE, CALLDATALOAD,
// CALLDATASIZE, CALLDATACOPY, CODESIZE, CODECOPY, GASPRICE, EXTCODESIZE,
// EXTCODECOPY, RETURNDATASIZE, RETURNDATACOPY, EXTCODEHASH

impl<'a> Vm<'a> {
    // ADDRESS operation
    pub fn op_address(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::ADDRESS)?;

        let address = frame.msg.recipient;
        frame.stack.push(address_to_word(address))?;

        Ok(OpcodeResult::Continue)
    }

    // BALANCE operation
    pub fn op_balance(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let address = word_to_address(frame.stack.pop1()?);
        let rev = frame.revision;

        let address_was_cold =
            rev >= Revision::Berlin && self.host.access_account(address) == AccessStatus::Cold;
        frame.increase_consumed_gas(gas_cost::balance(rev, address_was_cold))?;

        let balance = self.host.get_balance(address);
        self.context.current_frame()?.stack.push(balance)?;

        Ok(OpcodeResult::Continue)
    }

    // ORIGIN operation
    pub fn op_origin(&mut self) -> Result<OpcodeResult, VMError> {
        let origin = self.host.tx_context().origin;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::ORIGIN)?;

        frame.stack.push(address_to_word(origin))?;

        Ok(OpcodeResult::Continue)
    }

    // CALLER operation
    pub fn op_caller(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::CALLER)?;

        let caller = frame.msg.sender;
        frame.stack.push(address_to_word(caller))?;

        Ok(OpcodeResult::Continue)
    }

    // CALLVALUE operation
    pub fn op_callvalue(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::CALLVALUE)?;

        let callvalue = frame.msg.value;
        frame.stack.push(callvalue)?;

        Ok(OpcodeResult::Continue)
    }

    // CALLDATALOAD operation
    #[inline]
    pub fn op_calldataload(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::CALLDATALOAD)?;

        let calldata_size: U256 = frame.msg.input.len().into();
        let offset = frame.stack.pop1()?;

        // Reads past the end of the calldata are zero. Note the boundary:
        // an offset equal to the length still goes through the copy path
        // and reads zero bytes.
        if offset > calldata_size {
            frame.stack.push_zero()?;
            return Ok(OpcodeResult::Continue);
        }
        let offset: usize = offset
            .try_into()
            .map_err(|_| InternalError::TypeConversion)?;

        let mut data = [0u8; 32];
        if offset < frame.msg.input.len() {
            let remaining = frame.msg.input.len().wrapping_sub(offset);
            let copy_size = 32usize.min(remaining);
            let end = offset.wrapping_add(copy_size);
            data.get_mut(..copy_size)
                .ok_or(InternalError::Underflow)?
                .copy_from_slice(
                    frame
                        .msg
                        .input
                        .get(offset..end)
                        .ok_or(InternalError::Underflow)?,
                );
        }

        frame.stack.push(U256::from_big_endian(&data))?;

        Ok(OpcodeResult::Continue)
    }

    // CALLDATASIZE operation
    pub fn op_calldatasize(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::CALLDATASIZE)?;

        let calldata_size = U256::from(frame.msg.input.len());
        frame.stack.push(calldata_size)?;

        Ok(OpcodeResult::Continue)
    }

    // CALLDATACOPY operation
    pub fn op_calldatacopy(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [dest_offset, calldata_offset, size] = *frame.stack.pop()?;
        let (size, dest_offset) = size_offset_to_usize(size, dest_offset)?;
        let calldata_offset = u256_to_usize(calldata_offset).unwrap_or(usize::MAX);

        let new_memory_size = calculate_memory_size(dest_offset, size)?;
        frame.increase_consumed_gas(gas_cost::calldatacopy(
            new_memory_size,
            frame.memory.len(),
            size,
        )?)?;

        if size == 0 {
            return Ok(OpcodeResult::Continue);
        }

        let calldata_len = frame.msg.input.len();
        let slice = if calldata_offset < calldata_len {
            let available = calldata_len.wrapping_sub(calldata_offset);
            let copy_size = size.min(available);
            frame
                .msg
                .input
                .get(calldata_offset..calldata_offset.wrapping_add(copy_size))
                .ok_or(InternalError::Underflow)?
        } else {
            &[]
        };
        // The input aliases the frame, so it is copied out before writing.
        let slice = slice.to_vec();
        frame
            .memory
            .store_data_zero_padded(dest_offset, &slice, size)?;

        Ok(OpcodeResult::Continue)
    }

    // CODESIZE operation
    pub fn op_codesize(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::CODESIZE)?;

        let code_size = U256::from(frame.code.len());
        frame.stack.push(code_size)?;

        Ok(OpcodeResult::Continue)
    }

    // CODECOPY operation
    pub fn op_codecopy(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [dest_offset, code_offset, size] = *frame.stack.pop()?;
        let (size, dest_offset) = size_offset_to_usize(size, dest_offset)?;
        let code_offset = u256_to_usize(code_offset).unwrap_or(usize::MAX);

        let new_memory_size = calculate_memory_size(dest_offset, size)?;
        frame.increase_consumed_gas(gas_cost::codecopy(
            new_memory_size,
            frame.memory.len(),
            size,
        )?)?;

        if size == 0 {
            return Ok(OpcodeResult::Continue);
        }

        let code_len = frame.code.len();
        let slice = if code_offset < code_len {
            let available = code_len.wrapping_sub(code_offset);
            let copy_size = size.min(available);
            frame
                .code
                .get(code_offset..code_offset.wrapping_add(copy_size))
                .ok_or(InternalError::Underflow)?
        } else {
            &[]
        };
        let slice = slice.to_vec();
        frame
            .memory
            .store_data_zero_padded(dest_offset, &slice, size)?;

        Ok(OpcodeResult::Continue)
    }

    // GASPRICE operation
    pub fn op_gasprice(&mut self) -> Result<OpcodeResult, VMError> {
        let gas_price = self.host.tx_context().gas_price;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::GASPRICE)?;

        frame.stack.push(gas_price)?;

        Ok(OpcodeResult::Continue)
    }

    // EXTCODESIZE operation
    pub fn op_extcodesize(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let address = word_to_address(frame.stack.pop1()?);
        let rev = frame.revision;

        let address_was_cold =
            rev >= Revision::Berlin && self.host.access_account(address) == AccessStatus::Cold;
        frame.increase_consumed_gas(gas_cost::extcodesize(rev, address_was_cold))?;

        let code_size = U256::from(self.host.get_code_size(address));
        self.context.current_frame()?.stack.push(code_size)?;

        Ok(OpcodeResult::Continue)
    }

    // EXTCODECOPY operation
    pub fn op_extcodecopy(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [address, dest_offset, code_offset, size] = *frame.stack.pop()?;

        let address = word_to_address(address);
        let (size, dest_offset) = size_offset_to_usize(size, dest_offset)?;
        let code_offset = u256_to_usize(code_offset).unwrap_or(usize::MAX);
        let rev = frame.revision;

        let address_was_cold =
            rev >= Revision::Berlin && self.host.access_account(address) == AccessStatus::Cold;

        let new_memory_size = calculate_memory_size(dest_offset, size)?;
        frame.increase_consumed_gas(gas_cost::extcodecopy(
            size,
            new_memory_size,
            frame.memory.len(),
            address_was_cold,
            rev,
        )?)?;

        if size == 0 {
            return Ok(OpcodeResult::Continue);
        }

        // The host copies what exists; the remainder stays zero.
        let mut buffer = vec![0u8; size];
        if code_offset != usize::MAX {
            self.host.copy_code(address, code_offset, &mut buffer);
        }
        self.context
            .current_frame()?
            .memory
            .store_data(dest_offset, &buffer)?;

        Ok(OpcodeResult::Continue)
    }

    // RETURNDATASIZE operation
    pub fn op_returndatasize(&mut self) -> Result<OpcodeResult, VMError> {
        let return_data_size = U256::from(self.context.return_data().len());
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::RETURNDATASIZE)?;

        frame.stack.push(return_data_size)?;

        Ok(OpcodeResult::Continue)
    }

    // RETURNDATACOPY operation
    pub fn op_returndatacopy(&mut self) -> Result<OpcodeResult, VMError> {
        let return_data = self.context.return_data().clone();
        let frame = self.context.current_frame()?;
        let [dest_offset, returndata_offset, size] = *frame.stack.pop()?;
        let (size, dest_offset) = size_offset_to_usize(size, dest_offset)?;
        let returndata_offset = u256_to_usize(returndata_offset).unwrap_or(usize::MAX);

        let new_memory_size = calculate_memory_size(dest_offset, size)?;
        frame.increase_consumed_gas(gas_cost::returndatacopy(
            new_memory_size,
            frame.memory.len(),
            size,
        )?)?;

        if size == 0 {
            return Ok(OpcodeResult::Continue);
        }

        // Reads past the end of the buffer are zero-filled.
        let slice = if returndata_offset < return_data.len() {
            let available = return_data.len().wrapping_sub(returndata_offset);
            let copy_size = size.min(available);
            return_data
                .get(returndata_offset..returndata_offset.wrapping_add(copy_size))
                .ok_or(InternalError::Underflow)?
        } else {
            &[]
        };
        frame
            .memory
            .store_data_zero_padded(dest_offset, slice, size)?;

        Ok(OpcodeResult::Continue)
    }

    // EXTCODEHASH operation
    pub fn op_extcodehash(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let address = word_to_address(frame.stack.pop1()?);
        let rev = frame.revision;

        let address_was_cold =
            rev >= Revision::Berlin && self.host.access_account(address) == AccessStatus::Cold;
        frame.increase_consumed_gas(gas_cost::extcodehash(rev, address_was_cold))?;

        let code_hash = h256_to_u256(self.host.get_code_hash(address));
        self.context.current_frame()?.stack.push(code_hash)?;

        Ok(OpcodeResult::Continue)
    }
}
