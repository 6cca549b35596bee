use ethereum_types::U256;

use crate::{
    errors::{ExceptionalHalt, InternalError, OpcodeResult, VMError},
    gas_cost,
    host::AccessStatus,
    memory::calculate_memory_size,
    opcodes::Opcode,
    revision::Revision,
    utils::{h256_to_u256, size_offset_to_usize, u256_to_h256, u256_to_usize},
    vm::Vm,
};

// Stack, Memory, Storage and Flow Operations (15 + DUP/SWAP families)
// Opcodes: POP, MLOAD, MSTORE, MSTORE8, SLOAD, SSTORE, JUMP, JUMPI, PC,
// MSIZE, GAS, JUMPDEST, TLOAD, TSTORE, MCOPY, DUP1-16, SWAP1-16

impl<'a> Vm<'a> {
    // POP operation
    #[inline]
    pub fn op_pop(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::POP)?;
        frame.stack.pop1()?;

        Ok(OpcodeResult::Continue)
    }

    // MLOAD operation
    #[inline]
    pub fn op_mload(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let offset = u256_to_usize(frame.stack.pop1()?)?;

        let new_memory_size = calculate_memory_size(offset, 32)?;
        frame.increase_consumed_gas(gas_cost::mload(new_memory_size, frame.memory.len())?)?;

        let value = frame.memory.load_word(offset)?;
        frame.stack.push(value)?;

        Ok(OpcodeResult::Continue)
    }

    // MSTORE operation
    #[inline]
    pub fn op_mstore(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [offset, value] = *frame.stack.pop()?;
        let offset = u256_to_usize(offset)?;

        let new_memory_size = calculate_memory_size(offset, 32)?;
        frame.increase_consumed_gas(gas_cost::mstore(new_memory_size, frame.memory.len())?)?;

        frame.memory.store_word(offset, value)?;

        Ok(OpcodeResult::Continue)
    }

    // MSTORE8 operation
    pub fn op_mstore8(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [offset, value] = *frame.stack.pop()?;
        let offset = u256_to_usize(offset)?;

        let new_memory_size = calculate_memory_size(offset, 1)?;
        frame.increase_consumed_gas(gas_cost::mstore8(new_memory_size, frame.memory.len())?)?;

        frame.memory.store_data(offset, &[value.byte(0)])?;

        Ok(OpcodeResult::Continue)
    }

    // SLOAD operation
    pub fn op_sload(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let key = u256_to_h256(frame.stack.pop1()?);
        let address = frame.msg.recipient;
        let rev = frame.revision;

        let slot_was_cold = rev >= Revision::Berlin
            && self.host.access_storage(address, key) == AccessStatus::Cold;
        frame.increase_consumed_gas(gas_cost::sload(rev, slot_was_cold))?;

        let value = h256_to_u256(self.host.get_storage(address, key));
        self.context.current_frame()?.stack.push(value)?;

        Ok(OpcodeResult::Continue)
    }

    // SSTORE operation
    pub fn op_sstore(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        if frame.is_static() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }

        let [key, value] = *frame.stack.pop()?;
        let key = u256_to_h256(key);
        let value = u256_to_h256(value);
        let address = frame.msg.recipient;
        let rev = frame.revision;

        let slot_was_cold = rev >= Revision::Berlin
            && self.host.access_storage(address, key) == AccessStatus::Cold;

        // The host journals, so the write happens before the charge; an
        // out-of-gas discards the whole frame anyway.
        let status = self.host.set_storage(address, key, value);
        let (cost, refund) = gas_cost::sstore(rev, slot_was_cold, status);

        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(cost)?;
        frame.gas_refund = frame.gas_refund.saturating_add(refund);

        Ok(OpcodeResult::Continue)
    }

    // JUMP operation
    pub fn op_jump(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::JUMP)?;

        let destination = frame.stack.pop1()?;
        Self::jump_to(frame, destination)?;
        self.context.is_jump = true;

        Ok(OpcodeResult::Continue)
    }

    // JUMPI operation
    pub fn op_jumpi(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::JUMPI)?;

        let [destination, condition] = *frame.stack.pop()?;
        if !condition.is_zero() {
            Self::jump_to(frame, destination)?;
            self.context.is_jump = true;
        }

        Ok(OpcodeResult::Continue)
    }

    // JUMPDEST operation
    pub fn op_jumpdest(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::JUMPDEST)?;
        Ok(OpcodeResult::Continue)
    }

    // PC operation
    pub fn op_pc(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::PC)?;

        let pc = U256::from(frame.pc);
        frame.stack.push(pc)?;

        Ok(OpcodeResult::Continue)
    }

    // MSIZE operation
    pub fn op_msize(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::MSIZE)?;

        let memory_size = U256::from(frame.memory.len());
        frame.stack.push(memory_size)?;

        Ok(OpcodeResult::Continue)
    }

    // GAS operation
    pub fn op_gas(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::GAS)?;

        // What is left after paying for GAS itself.
        let remaining =
            u64::try_from(frame.gas_remaining.max(0)).map_err(|_| InternalError::TypeConversion)?;
        frame.stack.push(U256::from(remaining))?;

        Ok(OpcodeResult::Continue)
    }

    // TLOAD operation
    pub fn op_tload(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::TLOAD)?;

        let key = u256_to_h256(frame.stack.pop1()?);
        let address = frame.msg.recipient;
        let value = h256_to_u256(self.host.get_transient_storage(address, key));
        self.context.current_frame()?.stack.push(value)?;

        Ok(OpcodeResult::Continue)
    }

    // TSTORE operation
    pub fn op_tstore(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::TSTORE)?;
        if frame.is_static() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }

        let [key, value] = *frame.stack.pop()?;
        let address = frame.msg.recipient;
        self.host
            .set_transient_storage(address, u256_to_h256(key), u256_to_h256(value));

        Ok(OpcodeResult::Continue)
    }

    // MCOPY operation
    pub fn op_mcopy(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [dest_offset, src_offset, size] = *frame.stack.pop()?;
        let (size, dest_offset) = size_offset_to_usize(size, dest_offset)?;
        let src_offset = if size == 0 {
            0
        } else {
            u256_to_usize(src_offset)?
        };

        // Both the source and the destination range must be paid for.
        let new_memory_size = calculate_memory_size(dest_offset.max(src_offset), size)?;
        frame.increase_consumed_gas(gas_cost::mcopy(new_memory_size, frame.memory.len(), size)?)?;

        frame.memory.copy_within(src_offset, dest_offset, size)?;

        Ok(OpcodeResult::Continue)
    }

    // Generic DUP operation; N is the zero-based depth of the duplicated
    // value, so DUP1 is `op_dup::<0>`.
    #[inline]
    pub fn op_dup<const N: usize>(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::DUPN)?;

        let value = frame.stack.peek(N)?;
        frame.stack.push(value)?;

        Ok(OpcodeResult::Continue)
    }

    // Generic SWAP operation; N is the depth swapped with the top.
    #[inline]
    pub fn op_swap<const N: usize>(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SWAPN)?;

        frame.stack.swap(N)?;

        Ok(OpcodeResult::Continue)
    }

    /// Validate and take a jump. The target must be a JUMPDEST byte inside
    /// the code.
    fn jump_to(
        frame: &mut crate::call_frame::CallFrame,
        destination: U256,
    ) -> Result<(), VMError> {
        let destination = usize::try_from(destination).map_err(|_| ExceptionalHalt::InvalidJump)?;
        if frame.code.get(destination).copied() != Some(u8::from(Opcode::JUMPDEST)) {
            return Err(ExceptionalHalt::InvalidJump.into());
        }
        frame.pc = destination;
        Ok(())
    }
}
