use ethereum_types::H256;

use crate::{
    errors::{ExceptionalHalt, OpcodeResult, VMError},
    gas_cost,
    memory::calculate_memory_size,
    utils::{size_offset_to_usize, u256_to_h256},
    vm::Vm,
};

// Logging Operations (5)
// Opcodes: LOG0 ... LOG4

impl<'a> Vm<'a> {
    // Generic LOG operation; N is the number of topics.
    pub fn op_log<const N: usize>(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        if frame.is_static() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }

        let [offset, size] = *frame.stack.pop()?;
        let (size, offset) = size_offset_to_usize(size, offset)?;

        let mut topics = [H256::zero(); N];
        for topic in &mut topics {
            *topic = u256_to_h256(frame.stack.pop1()?);
        }

        let new_memory_size = calculate_memory_size(offset, size)?;
        frame.increase_consumed_gas(gas_cost::log(
            new_memory_size,
            frame.memory.len(),
            size,
            N,
        )?)?;

        let data = frame.memory.load_range(offset, size)?;
        let address = frame.msg.recipient;
        self.host.emit_log(address, &data, &topics);

        Ok(OpcodeResult::Continue)
    }
}
