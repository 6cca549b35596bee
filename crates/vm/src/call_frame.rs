use bytes::Bytes;
use ethereum_types::U256;

use crate::{
    constants::STACK_LIMIT,
    errors::{ExceptionalHalt, VMError},
    host::Message,
    memory::Memory,
    revision::Revision,
};

/// The evaluation stack: at most [`STACK_LIMIT`] words.
///
/// Values live in a fixed buffer that grows downward; the top of the stack
/// sits at `values[offset]`. This keeps `pop` of several operands a single
/// bounds check and lets handlers destructure them in popped order:
///
/// ```ignore
/// let [first_popped, second_popped] = *stack.pop()?;
/// ```
#[derive(Debug, Clone)]
pub struct Stack {
    values: Box<[U256; STACK_LIMIT]>,
    offset: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            values: Box::new([U256::zero(); STACK_LIMIT]),
            offset: STACK_LIMIT,
        }
    }
}

impl Stack {
    #[inline]
    pub fn len(&self) -> usize {
        STACK_LIMIT.wrapping_sub(self.offset)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset == STACK_LIMIT
    }

    #[inline]
    pub fn push(&mut self, value: U256) -> Result<(), ExceptionalHalt> {
        let offset = self
            .offset
            .checked_sub(1)
            .ok_or(ExceptionalHalt::StackOverflow)?;
        self.values[offset] = value;
        self.offset = offset;
        Ok(())
    }

    #[inline]
    pub fn push_zero(&mut self) -> Result<(), ExceptionalHalt> {
        self.push(U256::zero())
    }

    /// Pop `N` values at once. `result[0]` is the value that was on top.
    #[inline]
    pub fn pop<const N: usize>(&mut self) -> Result<&[U256; N], ExceptionalHalt> {
        let end = self
            .offset
            .checked_add(N)
            .filter(|end| *end <= STACK_LIMIT)
            .ok_or(ExceptionalHalt::StackUnderflow)?;
        let values: &[U256; N] = self.values[self.offset..end]
            .try_into()
            .map_err(|_| ExceptionalHalt::StackUnderflow)?;
        self.offset = end;
        Ok(values)
    }

    #[inline]
    pub fn pop1(&mut self) -> Result<U256, ExceptionalHalt> {
        let [value] = *self.pop::<1>()?;
        Ok(value)
    }

    /// Value `depth` positions below the top (0 is the top itself).
    #[inline]
    pub fn peek(&self, depth: usize) -> Result<U256, ExceptionalHalt> {
        self.values
            .get(self.offset.wrapping_add(depth))
            .copied()
            .ok_or(ExceptionalHalt::StackUnderflow)
    }

    /// Exchange the top with the value `depth` positions below it.
    #[inline]
    pub fn swap(&mut self, depth: usize) -> Result<(), ExceptionalHalt> {
        let other = self.offset.wrapping_add(depth);
        if depth == 0 || other >= STACK_LIMIT || self.is_empty() {
            return Err(ExceptionalHalt::StackUnderflow);
        }
        self.values.swap(self.offset, other);
        Ok(())
    }
}

/// Per-call execution state: the message that entered the frame, its stack,
/// memory, program counter and gas accounting.
///
/// Frames are created by [`crate::context::ExecutionContext::push_frame`] and
/// destroyed when a handler unwinds them on RETURN/REVERT/halt; the leftover
/// gas flows to the parent at that point.
#[derive(Debug)]
pub struct CallFrame {
    pub msg: Message,
    pub stack: Stack,
    pub memory: Memory,
    /// Byte offset of the opcode being executed.
    pub pc: usize,
    pub gas_remaining: i64,
    /// Refund accumulator; merged into the parent on success.
    pub gas_refund: i64,
    pub revision: Revision,
    /// The immutable code this frame executes.
    pub code: Bytes,
}

impl CallFrame {
    pub fn new(msg: Message, code: Bytes, revision: Revision) -> Self {
        let gas_remaining = msg.gas;
        Self {
            msg,
            stack: Stack::default(),
            memory: Memory::new(),
            pc: 0,
            gas_remaining,
            gas_refund: 0,
            revision,
            code,
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.msg.is_static
    }

    /// Subtract `gas` from the remaining budget, or fail with out-of-gas.
    #[inline]
    pub fn increase_consumed_gas(&mut self, gas: u64) -> Result<(), VMError> {
        let gas = i64::try_from(gas).map_err(|_| ExceptionalHalt::OutOfGas)?;
        let remaining = self
            .gas_remaining
            .checked_sub(gas)
            .ok_or(ExceptionalHalt::OutOfGas)?;
        if remaining < 0 {
            return Err(ExceptionalHalt::OutOfGas.into());
        }
        self.gas_remaining = remaining;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_returns_values_in_popped_order() {
        let mut stack = Stack::default();
        stack.push(U256::from(1)).unwrap();
        stack.push(U256::from(2)).unwrap();
        let [top, below] = *stack.pop().unwrap();
        assert_eq!(top, U256::from(2));
        assert_eq!(below, U256::from(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn underflow_is_detected_before_any_pop() {
        let mut stack = Stack::default();
        stack.push(U256::from(7)).unwrap();
        assert_eq!(
            stack.pop::<2>().unwrap_err(),
            ExceptionalHalt::StackUnderflow
        );
        // The single value is still there.
        assert_eq!(stack.pop1().unwrap(), U256::from(7));
    }

    #[test]
    fn push_past_the_limit_overflows() {
        let mut stack = Stack::default();
        for i in 0..STACK_LIMIT {
            stack.push(U256::from(i as u64)).unwrap();
        }
        assert_eq!(
            stack.push(U256::zero()).unwrap_err(),
            ExceptionalHalt::StackOverflow
        );
        assert_eq!(stack.len(), STACK_LIMIT);
    }

    #[test]
    fn peek_and_swap_respect_depth() {
        let mut stack = Stack::default();
        for i in 1..=4u64 {
            stack.push(U256::from(i)).unwrap();
        }
        assert_eq!(stack.peek(0).unwrap(), U256::from(4));
        assert_eq!(stack.peek(3).unwrap(), U256::from(1));
        assert!(stack.peek(4).is_err());

        stack.swap(3).unwrap();
        assert_eq!(stack.peek(0).unwrap(), U256::from(1));
        assert_eq!(stack.peek(3).unwrap(), U256::from(4));
        assert!(stack.swap(4).is_err());
    }
}
