use crate::{
    errors::{OpcodeResult, VMError},
    gas_cost,
    memory::calculate_memory_size,
    utils::{h256_to_u256, keccak, size_offset_to_usize},
    vm::Vm,
};

// KECCAK256 (1)

impl<'a> Vm<'a> {
    // KECCAK256 operation
    pub fn op_keccak256(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        let [offset, size] = *frame.stack.pop()?;
        let (size, offset) = size_offset_to_usize(size, offset)?;

        let new_memory_size = calculate_memory_size(offset, size)?;
        frame.increase_consumed_gas(gas_cost::keccak256(
            new_memory_size,
            frame.memory.len(),
            size,
        )?)?;

        let data = frame.memory.load_range(offset, size)?;
        frame.stack.push(h256_to_u256(keccak(&data)))?;

        Ok(OpcodeResult::Continue)
    }
}
