use ethereum_types::U256;

use crate::{
    errors::{ExceptionalHalt, InternalError, OpcodeResult, VMError},
    gas_cost,
    vm::Vm,
};

// Push Operations
// Opcodes: PUSH0, PUSH1 ... PUSH32

impl<'a> Vm<'a> {
    // Generic PUSH operation, monomorphized for each N.
    #[inline]
    pub fn op_push<const N: usize>(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::PUSHN)?;

        // The immediate bytes follow the opcode. Code that ends inside the
        // immediate is malformed and halts the frame.
        let data_start = frame.pc.checked_add(1).ok_or(InternalError::Overflow)?;
        let data_end = data_start.checked_add(N).ok_or(InternalError::Overflow)?;
        let immediate = frame
            .code
            .get(data_start..data_end)
            .ok_or(ExceptionalHalt::UnexpectedEnd)?;

        frame.stack.push(U256::from_big_endian(immediate))?;

        // Skip the immediate; the driver advances over the opcode itself.
        frame.pc = frame.pc.checked_add(N).ok_or(InternalError::Overflow)?;

        Ok(OpcodeResult::Continue)
    }

    // PUSH0
    #[inline]
    pub fn op_push0(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::PUSH0)?;
        frame.stack.push_zero()?;
        Ok(OpcodeResult::Continue)
    }
}
