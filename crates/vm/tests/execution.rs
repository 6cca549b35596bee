//! Single-frame execution tests: arithmetic, memory, control flow, gas.

mod common;

use bytes::Bytes;
use common::{
    bytecode, call_message, contract_address, run_code, run_code_with, run_message_with, TestHost,
};
use embervm::{revision::Revision, utils::keccak, StatusCode};
use ethereum_types::{H256, U256};

/// Run `code` and return its 32-byte output as a word.
fn run_and_return_word(code: &str) -> U256 {
    let report = run_code(&bytecode(code), 1_000_000);
    assert_eq!(report.status, StatusCode::Success, "{report:?}");
    assert_eq!(report.output.len(), 32);
    U256::from_big_endian(&report.output)
}

#[test]
fn simple_add_consumes_nine_gas() {
    // PUSH1 3, PUSH1 4, ADD, STOP
    let report = run_code(&bytecode("6003600401 00"), 100);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 91);
    assert!(report.output.is_empty());
}

#[test]
fn mstore_expands_one_word() {
    // PUSH1 0x20, PUSH1 0, MSTORE: 3 + 3 + (3 static + 3 expansion)
    let report = run_code(&bytecode("6020600052"), 100);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 88);
}

#[test]
fn mstore_writes_big_endian() {
    let report = run_code(&bytecode("6020600052 60206000f3"), 100);
    assert!(report.is_success());
    let mut expected = [0u8; 32];
    expected[31] = 0x20;
    assert_eq!(report.output.as_ref(), &expected);
    // PUSH*4 + MSTORE(3+3) + RETURN(0 expansion)
    assert_eq!(report.gas_left, 100 - 18);
}

#[test]
fn sdiv_min_by_minus_one_wraps() {
    // -1, then i256::MIN on top, SDIV: MIN / -1 stays MIN.
    let min = format!("7f80{}", "00".repeat(31));
    let minus_one = format!("7f{}", "ff".repeat(32));
    let code = format!("{minus_one}{min}05 600052 60206000f3");
    let result = run_and_return_word(&code);
    assert_eq!(result, U256::one() << 255);
}

#[test]
fn div_by_zero_is_zero() {
    // PUSH1 0, PUSH1 5, DIV
    assert_eq!(
        run_and_return_word("60006005 04 600052 60206000f3"),
        U256::zero()
    );
}

#[test]
fn addmod_wide_intermediate() {
    // (5 + 3) % 7 = 1
    assert_eq!(
        run_and_return_word("600760036005 08 600052 60206000f3"),
        U256::one()
    );
    // (MAX + MAX) % MAX = 0; the sum must not wrap at 256 bits.
    let max = format!("7f{}", "ff".repeat(32));
    assert_eq!(
        run_and_return_word(&format!("{max}{max}{max} 08 600052 60206000f3")),
        U256::zero()
    );
}

#[test]
fn mulmod_wide_intermediate() {
    // (MAX * MAX) % 12
    let max = format!("7f{}", "ff".repeat(32));
    let expected = {
        let max = U256::MAX.full_mul(U256::MAX);
        U256::try_from(max % ethereum_types::U512::from(12)).unwrap()
    };
    assert_eq!(
        run_and_return_word(&format!("600c{max}{max} 09 600052 60206000f3")),
        expected
    );
}

#[test]
fn exp_charges_for_exponent_bytes() {
    // PUSH1 2 (exponent), PUSH1 10 (base), EXP
    let report = run_code(&bytecode("6002600a0a 600052 60206000f3"), 1_000);
    assert!(report.is_success());
    assert_eq!(U256::from_big_endian(&report.output), U256::from(100));
    // 3 + 3 + (10 + 50) + 3 + (3 + 3) + 3 + 3
    assert_eq!(report.gas_left, 1_000 - 81);
}

#[test]
fn signextend_from_byte_zero() {
    // x = 0xff, i = 0: the sign bit of byte 0 fills the word.
    assert_eq!(
        run_and_return_word("60ff6000 0b 600052 60206000f3"),
        U256::MAX
    );
    // i >= 31 leaves the value untouched.
    assert_eq!(
        run_and_return_word("60ff601f 0b 600052 60206000f3"),
        U256::from(0xff)
    );
}

#[test]
fn byte_indexes_big_endian() {
    // BYTE(31, 0xff) is the least significant byte.
    assert_eq!(
        run_and_return_word("60ff601f 1a 600052 60206000f3"),
        U256::from(0xff)
    );
    // Out-of-range index yields zero.
    assert_eq!(
        run_and_return_word("60ff6020 1a 600052 60206000f3"),
        U256::zero()
    );
}

#[test]
fn sar_fills_with_sign() {
    // value = -1, shift = 4: stays all ones.
    let minus_one = format!("7f{}", "ff".repeat(32));
    assert_eq!(
        run_and_return_word(&format!("{minus_one}6004 1d 600052 60206000f3")),
        U256::MAX
    );
    // Shift of 256+ on a negative value saturates to all ones.
    assert_eq!(
        run_and_return_word(&format!("{minus_one}610100 1d 600052 60206000f3")),
        U256::MAX
    );
    // And to zero on a non-negative one.
    assert_eq!(
        run_and_return_word("6001610100 1d 600052 60206000f3"),
        U256::zero()
    );
}

#[test]
fn shl_shr_clamp_at_256() {
    assert_eq!(
        run_and_return_word("6001610100 1b 600052 60206000f3"),
        U256::zero()
    );
    assert_eq!(
        run_and_return_word("600160ff 1b 600052 60206000f3"),
        U256::one() << 255
    );
}

#[test]
fn push_then_pop_is_stack_noop() {
    // PUSH1 5, POP, STOP: 3 + 2 gas.
    let report = run_code(&bytecode("600550 00"), 100);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 95);
}

#[test]
fn push_past_end_of_code_halts() {
    let report = run_code(&bytecode("60"), 100);
    assert_eq!(report.status, StatusCode::UnexpectedEnd);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn implicit_stop_on_empty_code() {
    let report = run_code(&[], 50);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 50);
}

#[test]
fn invalid_opcode_consumes_all_gas() {
    let report = run_code(&bytecode("fe"), 100);
    assert_eq!(report.status, StatusCode::InvalidOpcode);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn undefined_opcode_is_invalid() {
    // 0x5f is only PUSH0 from Shanghai; before that it is undefined.
    let mut host = TestHost::new(Revision::London);
    let report = run_code_with(&mut host, &bytecode("5f"), 100);
    assert_eq!(report.status, StatusCode::InvalidOpcode);

    let report = run_code(&bytecode("5f 00"), 100);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 98);
}

#[test]
fn stack_underflow_halts() {
    let report = run_code(&bytecode("01"), 100);
    assert_eq!(report.status, StatusCode::StackUnderflow);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn stack_overflow_halts() {
    // 1025 PUSH0s cannot fit.
    let code = vec![0x5f; 1025];
    let report = run_code(&code, 10_000);
    assert_eq!(report.status, StatusCode::StackOverflow);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn out_of_gas_mid_program() {
    let report = run_code(&bytecode("6001"), 2);
    assert_eq!(report.status, StatusCode::OutOfGas);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn jump_to_non_jumpdest_fails() {
    // PUSH1 5, JUMP; code[5] is not JUMPDEST.
    let report = run_code(&bytecode("600556000000"), 100);
    assert_eq!(report.status, StatusCode::InvalidJump);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn jump_to_jumpdest_succeeds() {
    // 0: PUSH1 4, 2: JUMP, 3: INVALID, 4: JUMPDEST, then return 1.
    let report = run_code(&bytecode("600456 fe 5b 6001600052 60206000f3"), 100);
    assert!(report.is_success());
    assert_eq!(U256::from_big_endian(&report.output), U256::one());
    // 3 + 8 + 1 + 3 + 3 + 6 + 3 + 3
    assert_eq!(report.gas_left, 100 - 30);
}

#[test]
fn jumpi_falls_through_on_zero() {
    // cond 0, dest 6 (not a JUMPDEST); not taken, so no fault.
    let report = run_code(&bytecode("60006006 57 00"), 100);
    assert!(report.is_success());
    // 3 + 3 + 10
    assert_eq!(report.gas_left, 84);
}

#[test]
fn jumpi_takes_branch_on_nonzero() {
    // 0: PUSH1 1, 2: PUSH1 6, 4: JUMPI, 5: INVALID, 6: JUMPDEST, 7: STOP
    let report = run_code(&bytecode("60016006 57 fe 5b 00"), 100);
    assert!(report.is_success());
}

#[test]
fn pc_pushes_opcode_position() {
    // 0: JUMPDEST, 1: PC
    assert_eq!(
        run_and_return_word("5b 58 600052 60206000f3"),
        U256::one()
    );
}

#[test]
fn msize_reports_word_aligned_length() {
    // MLOAD at 0 expands to one word.
    assert_eq!(
        run_and_return_word("600051 50 59 600052 60206000f3"),
        U256::from(32)
    );
}

#[test]
fn gas_opcode_reports_remaining_gas() {
    let report = run_code(&bytecode("5a 600052 60206000f3"), 100);
    assert!(report.is_success());
    // GAS itself costs 2.
    assert_eq!(U256::from_big_endian(&report.output), U256::from(98));
}

#[test]
fn zero_size_memory_access_is_free() {
    // KECCAK256(0, 0) expands nothing: 30 gas only.
    let report = run_code(&bytecode("60006000 20 00"), 100);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 100 - 3 - 3 - 30);
}

#[test]
fn keccak256_of_empty_slice() {
    let expected = U256::from_big_endian(keccak(&[]).as_bytes());
    assert_eq!(run_and_return_word("60006000 20 600052 60206000f3"), expected);
}

#[test]
fn calldataload_pads_and_bounds() {
    let mut host = TestHost::default();
    let mut msg = call_message(100_000);
    msg.input = Bytes::from_static(&[1, 2, 3, 4]);

    // Offset 0: the four bytes land at the big end of the word.
    let code = bytecode("600035 600052 60206000f3");
    let report = run_message_with(&mut host, &code, msg.clone());
    let mut expected = [0u8; 32];
    expected[..4].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(report.output.as_ref(), &expected);

    // Offset == input length reads zero.
    let code = bytecode("600435 600052 60206000f3");
    let report = run_message_with(&mut host, &code, msg);
    assert_eq!(U256::from_big_endian(&report.output), U256::zero());
}

#[test]
fn calldatacopy_zero_pads() {
    let mut host = TestHost::default();
    let mut msg = call_message(100_000);
    msg.input = Bytes::from_static(&[1, 2, 3, 4]);

    // Copy a full word out of four bytes of calldata.
    let code = bytecode("6020 6000 6000 37 60206000f3");
    let report = run_message_with(&mut host, &code, msg);
    let mut expected = [0u8; 32];
    expected[..4].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(report.output.as_ref(), &expected);
}

#[test]
fn codecopy_zero_pads_past_code_end() {
    // Copies its own 12 bytes of code plus one zero-padded byte.
    let code = bytecode("600d60006000 39 600d6000f3");
    let report = run_code(&code, 100_000);
    assert!(report.is_success());
    let mut expected = code.clone();
    expected.push(0);
    assert_eq!(report.output.as_ref(), expected.as_slice());
}

#[test]
fn mcopy_handles_overlap() {
    let pattern = format!("7f0102030405060708{}", "00".repeat(24));
    // MCOPY(dest=4, src=0, size=8) over the stored pattern.
    let code = format!("{pattern}600052 6008600060045e 600c6000f3");
    let report = run_code(&bytecode(&code), 100_000);
    assert!(report.is_success());
    assert_eq!(
        report.output.as_ref(),
        &[1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8]
    );
}

#[test]
fn transient_storage_round_trips() {
    // TSTORE(key 1, 0x42), TLOAD(1)
    let report = run_code(&bytecode("604260015d 60015c 600052 60206000f3"), 100_000);
    assert!(report.is_success());
    assert_eq!(U256::from_big_endian(&report.output), U256::from(0x42));
}

#[test]
fn tstore_in_static_frame_faults() {
    let mut host = TestHost::default();
    let mut msg = call_message(100_000);
    msg.is_static = true;
    let report = run_message_with(&mut host, &bytecode("604260015d"), msg);
    assert_eq!(report.status, StatusCode::StaticModeViolation);
    assert_eq!(report.gas_left, 0);
}

#[test]
fn blockhash_window_is_256_blocks() {
    let mut host = TestHost::default();
    host.tx.block_number = 1_000;
    let known = H256::repeat_byte(0xaa);
    host.block_hashes.insert(999, known);
    host.block_hashes.insert(744, known);

    // Previous block is inside the window.
    let code = bytecode("6103e7 40 600052 60206000f3");
    let report = run_code_with(&mut host, &code, 100_000);
    assert_eq!(report.output.as_ref(), known.as_bytes());

    // Exactly 256 back is still inside.
    let code = bytecode("6102e8 40 600052 60206000f3");
    let report = run_code_with(&mut host, &code, 100_000);
    assert_eq!(report.output.as_ref(), known.as_bytes());

    // The current block is not.
    let code = bytecode("6103e8 40 600052 60206000f3");
    let report = run_code_with(&mut host, &code, 100_000);
    assert_eq!(U256::from_big_endian(&report.output), U256::zero());

    // Neither is 257 back.
    let code = bytecode("6102e7 40 600052 60206000f3");
    let report = run_code_with(&mut host, &code, 100_000);
    assert_eq!(U256::from_big_endian(&report.output), U256::zero());
}

#[test]
fn balance_warms_up_the_account() {
    let mut host = TestHost::default();
    host.accounts
        .entry(contract_address())
        .or_default()
        .balance = U256::from(123);

    // ADDRESS BALANCE POP ADDRESS BALANCE POP STOP: first access cold,
    // second warm: 2 + 2600 + 2 + 2 + 100 + 2.
    let report = run_code_with(&mut host, &bytecode("303150 303150 00"), 10_000);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 10_000 - 2_708);
}

#[test]
fn sstore_delete_accumulates_refund() {
    let mut host = TestHost::default();
    host.set_storage_slot(
        contract_address(),
        H256::zero(),
        H256::from_low_u64_be(1),
    );

    // PUSH1 0 (value), PUSH1 0 (key), SSTORE
    let report = run_code_with(&mut host, &bytecode("6000600055 00"), 20_000);
    assert!(report.is_success());
    assert_eq!(report.gas_refund, 4_800);
    // 3 + 3 + (2100 cold + 2900 reset)
    assert_eq!(report.gas_left, 20_000 - 5_006);
    assert_eq!(
        host.storage_value(contract_address(), H256::zero()),
        H256::zero()
    );
}

#[test]
fn sstore_in_static_frame_faults_before_writing() {
    let mut host = TestHost::default();
    let mut msg = call_message(100_000);
    msg.is_static = true;
    let report = run_message_with(&mut host, &bytecode("6001600055"), msg);
    assert_eq!(report.status, StatusCode::StaticModeViolation);
    assert_eq!(report.gas_left, 0);
    assert_eq!(
        host.storage_value(contract_address(), H256::zero()),
        H256::zero()
    );
}

#[test]
fn sload_reads_what_sstore_wrote() {
    let mut host = TestHost::default();
    let code = bytecode("6042600055 600054 600052 60206000f3");
    let report = run_code_with(&mut host, &code, 100_000);
    assert!(report.is_success());
    assert_eq!(U256::from_big_endian(&report.output), U256::from(0x42));
}

#[test]
fn pre_spurious_dragon_exp_is_cheaper() {
    let mut host = TestHost::new(Revision::Homestead);
    // PUSH1 2, PUSH1 10, EXP, STOP: 3 + 3 + (10 + 10)
    let report = run_code_with(&mut host, &bytecode("6002600a0a 00"), 1_000);
    assert!(report.is_success());
    assert_eq!(report.gas_left, 1_000 - 26);
}
