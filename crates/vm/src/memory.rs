use bytes::Bytes;
use ethereum_types::U256;

use crate::{
    constants::{
        MAX_MEMORY_SIZE, MEMORY_EXPANSION_QUOTIENT, WORD_SIZE_IN_BYTES_U64,
        WORD_SIZE_IN_BYTES_USIZE,
    },
    errors::{ExceptionalHalt, InternalError, VMError},
};
use ExceptionalHalt::OutOfBounds;

/// A frame's linear memory: byte-addressed, zero-initialized, grown in
/// 32-byte steps.
///
/// Growth is never charged here. Handlers compute the required size with
/// [`calculate_memory_size`], charge [`expansion_cost`] and only then resize.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    buffer: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Grows the memory to fit `new_memory_size`, rounded up to the next
    /// 32-byte multiple. Shrinking never happens.
    #[inline]
    pub fn resize(&mut self, new_memory_size: usize) -> Result<(), VMError> {
        if new_memory_size == 0 {
            return Ok(());
        }

        let new_memory_size = new_memory_size
            .checked_next_multiple_of(WORD_SIZE_IN_BYTES_USIZE)
            .ok_or(OutOfBounds)?;

        if new_memory_size > MAX_MEMORY_SIZE {
            return Err(OutOfBounds.into());
        }

        if new_memory_size > self.buffer.len() {
            self.buffer.resize(new_memory_size, 0);
        }

        Ok(())
    }

    /// Load `size` bytes starting at `offset`, growing if the range reaches
    /// past the current length.
    pub fn load_range(&mut self, offset: usize, size: usize) -> Result<Bytes, VMError> {
        if size == 0 {
            return Ok(Bytes::new());
        }

        let new_size = offset.checked_add(size).ok_or(OutOfBounds)?;
        self.resize(new_size)?;

        let slice = self
            .buffer
            .get(offset..new_size)
            .ok_or(InternalError::Underflow)?;
        Ok(Bytes::copy_from_slice(slice))
    }

    /// Load a 32-byte big-endian word at `offset`.
    pub fn load_word(&mut self, offset: usize) -> Result<U256, VMError> {
        let new_size = offset
            .checked_add(WORD_SIZE_IN_BYTES_USIZE)
            .ok_or(OutOfBounds)?;
        self.resize(new_size)?;

        let slice = self
            .buffer
            .get(offset..new_size)
            .ok_or(InternalError::Underflow)?;
        Ok(U256::from_big_endian(slice))
    }

    /// Store `data` at `offset`, growing as needed.
    pub fn store_data(&mut self, offset: usize, data: &[u8]) -> Result<(), VMError> {
        if data.is_empty() {
            return Ok(());
        }
        let new_size = offset.checked_add(data.len()).ok_or(OutOfBounds)?;
        self.resize(new_size)?;

        self.buffer
            .get_mut(offset..new_size)
            .ok_or(InternalError::Underflow)?
            .copy_from_slice(data);
        Ok(())
    }

    /// Store `data` at `offset` and zero-fill up to `total_size` bytes.
    pub fn store_data_zero_padded(
        &mut self,
        offset: usize,
        data: &[u8],
        total_size: usize,
    ) -> Result<(), VMError> {
        if total_size == 0 {
            return Ok(());
        }

        let new_size = offset.checked_add(total_size).ok_or(OutOfBounds)?;
        self.resize(new_size)?;

        let copy_size = data.len().min(total_size);
        let target = self
            .buffer
            .get_mut(offset..new_size)
            .ok_or(InternalError::Underflow)?;
        target
            .get_mut(..copy_size)
            .ok_or(InternalError::Underflow)?
            .copy_from_slice(data.get(..copy_size).ok_or(InternalError::Underflow)?);
        target
            .get_mut(copy_size..)
            .ok_or(InternalError::Underflow)?
            .fill(0);
        Ok(())
    }

    /// Store a word big-endian at `offset`.
    pub fn store_word(&mut self, offset: usize, word: U256) -> Result<(), VMError> {
        self.store_data(offset, &word.to_big_endian())
    }

    /// Copy `size` bytes from `from_offset` to `to_offset` with memmove
    /// semantics; the ranges may overlap.
    pub fn copy_within(
        &mut self,
        from_offset: usize,
        to_offset: usize,
        size: usize,
    ) -> Result<(), VMError> {
        if size == 0 {
            return Ok(());
        }

        let new_size = from_offset
            .max(to_offset)
            .checked_add(size)
            .ok_or(OutOfBounds)?;
        self.resize(new_size)?;

        let from_end = from_offset
            .checked_add(size)
            .ok_or(InternalError::Overflow)?;
        self.buffer.copy_within(from_offset..from_end, to_offset);
        Ok(())
    }
}

/// Cost of growing from `current_memory_size` to `new_memory_size`; only the
/// additional words are paid for.
#[inline]
pub fn expansion_cost(new_memory_size: usize, current_memory_size: usize) -> Result<u64, VMError> {
    let cost = if new_memory_size <= current_memory_size {
        0
    } else {
        // cost(x) > cost(y) for x > y, so the subtraction cannot underflow.
        cost(new_memory_size)?.wrapping_sub(cost(current_memory_size)?)
    };
    Ok(cost)
}

/// Total cost of a memory of the given byte size.
#[inline]
fn cost(memory_size: usize) -> Result<u64, VMError> {
    let memory_size = u64::try_from(memory_size).map_err(|_| InternalError::TypeConversion)?;

    let words = memory_size.div_ceil(WORD_SIZE_IN_BYTES_U64);

    // cost(words) = words^2 / 512 + 3 * words. Memory is bounded well below
    // the sizes where this could overflow a u64.
    #[expect(clippy::arithmetic_side_effects)]
    let gas_cost = words * words / MEMORY_EXPANSION_QUOTIENT + 3 * words;

    Ok(gas_cost)
}

/// Word-aligned memory size an access of `size` bytes at `offset` requires.
/// A zero size requires nothing, whatever the offset.
#[inline]
pub fn calculate_memory_size(offset: usize, size: usize) -> Result<usize, VMError> {
    if size == 0 {
        return Ok(0);
    }

    let new_size = offset
        .checked_add(size)
        .and_then(|sum| sum.checked_next_multiple_of(WORD_SIZE_IN_BYTES_USIZE))
        .ok_or(ExceptionalHalt::VeryLargeNumber)?;

    if new_size > MAX_MEMORY_SIZE {
        return Err(OutOfBounds.into());
    }

    Ok(new_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn expansion_cost_first_word() {
        // C(1 word) - C(0) = 1/512 + 3 = 3
        assert_eq!(expansion_cost(32, 0).unwrap(), 3);
        assert_eq!(expansion_cost(64, 32).unwrap(), 3);
    }

    #[test]
    fn expansion_cost_quadratic_term() {
        // 1024 words: 1024^2/512 + 3*1024 = 2048 + 3072
        assert_eq!(expansion_cost(32768, 0).unwrap(), 5120);
    }

    #[test]
    fn no_cost_without_growth() {
        assert_eq!(expansion_cost(32, 32).unwrap(), 0);
        assert_eq!(expansion_cost(0, 0).unwrap(), 0);
        assert_eq!(expansion_cost(16, 32).unwrap(), 0);
    }

    #[test]
    fn zero_size_access_requires_nothing() {
        assert_eq!(calculate_memory_size(usize::MAX, 0).unwrap(), 0);
    }

    #[test]
    fn memory_size_rounds_to_words() {
        assert_eq!(calculate_memory_size(0, 1).unwrap(), 32);
        assert_eq!(calculate_memory_size(10, 30).unwrap(), 64);
    }

    #[test]
    fn memory_size_faults_past_the_cap() {
        assert!(calculate_memory_size(MAX_MEMORY_SIZE, 1).is_err());
        assert!(calculate_memory_size(usize::MAX, 2).is_err());
    }

    #[test]
    fn loads_are_zero_filled() {
        let mut memory = Memory::new();
        let data = memory.load_range(100, 10).unwrap();
        assert_eq!(data.as_ref(), &[0u8; 10]);
        assert_eq!(memory.len(), 128);
    }

    #[test]
    fn store_then_load_round_trips() {
        let mut memory = Memory::new();
        memory.store_word(32, U256::from(0xdeadbeefu64)).unwrap();
        assert_eq!(memory.load_word(32).unwrap(), U256::from(0xdeadbeefu64));
        assert_eq!(memory.len(), 64);
    }

    #[test]
    fn copy_within_overlapping_ranges() {
        let mut memory = Memory::new();
        memory.store_data(0, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        memory.copy_within(0, 4, 8).unwrap();
        let data = memory.load_range(0, 12).unwrap();
        assert_eq!(data.as_ref(), &[1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    proptest! {
        /// The expansion cost is monotonic non-decreasing in the target size.
        #[test]
        fn expansion_cost_is_monotonic(current in 0usize..1 << 20, a in 0usize..1 << 20, b in 0usize..1 << 20) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                expansion_cost(small, current).unwrap() <= expansion_cost(large, current).unwrap()
            );
        }

        /// Growing in two steps costs the same as growing in one.
        #[test]
        fn expansion_cost_composes(a in 0usize..1 << 20, b in 0usize..1 << 20, c in 0usize..1 << 20) {
            let mut sizes = [a, b, c];
            sizes.sort_unstable();
            let [low, mid, high] = sizes;
            let two_steps = expansion_cost(mid, low).unwrap() + expansion_cost(high, mid).unwrap();
            prop_assert_eq!(expansion_cost(high, low).unwrap(), two_steps);
        }
    }
}
