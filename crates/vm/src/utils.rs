use ethereum_types::{Address, H256, U256};
use sha3::{Digest, Keccak256};

use crate::errors::{ExceptionalHalt, VMError};

/// Keccak-256 of `data`.
pub fn keccak(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_slice(&hasher.finalize())
}

/// Truncate a word to its low 20 bytes (big-endian).
pub fn word_to_address(word: U256) -> Address {
    let bytes = word.to_big_endian();
    Address::from_slice(&bytes[12..])
}

/// Widen an address into a word, zero-filling the high 96 bits.
pub fn address_to_word(address: Address) -> U256 {
    U256::from_big_endian(address.as_bytes())
}

pub fn u256_to_h256(value: U256) -> H256 {
    H256(value.to_big_endian())
}

pub fn h256_to_u256(value: H256) -> U256 {
    U256::from_big_endian(value.as_bytes())
}

pub fn u256_to_usize(value: U256) -> Result<usize, ExceptionalHalt> {
    usize::try_from(value).map_err(|_| ExceptionalHalt::VeryLargeNumber)
}

/// Narrow a (size, offset) pair popped off the stack.
///
/// A zero size never touches memory, so the offset is irrelevant and forced
/// to zero instead of faulting on huge values.
pub fn size_offset_to_usize(size: U256, offset: U256) -> Result<(usize, usize), VMError> {
    let size = u256_to_usize(size)?;
    if size == 0 {
        return Ok((0, 0));
    }
    let offset = u256_to_usize(offset)?;
    Ok((size, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_big_endian_round_trip() {
        let value = U256::from(0x1122334455667788u64);
        let bytes = value.to_big_endian();
        assert_eq!(U256::from_big_endian(&bytes), value);
        assert_eq!(bytes[31], 0x88);
        assert_eq!(bytes[24], 0x11);
    }

    #[test]
    fn address_round_trip_masks_high_bits() {
        let word = U256::MAX;
        let address = word_to_address(word);
        assert_eq!(address, Address::from_slice(&[0xff; 20]));
        // Widening back keeps only the low 20 bytes.
        let widened = address_to_word(address);
        assert_eq!(widened, U256::MAX >> 96);
        assert_eq!(word_to_address(widened), address);
    }

    #[test]
    fn size_zero_ignores_offset() {
        let (size, offset) = size_offset_to_usize(U256::zero(), U256::MAX).unwrap();
        assert_eq!((size, offset), (0, 0));
    }

    #[test]
    fn oversized_offset_faults() {
        assert!(size_offset_to_usize(U256::one(), U256::MAX).is_err());
    }

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            keccak(&[]),
            H256::from_slice(
                &hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
                    .unwrap()
            )
        );
    }
}
