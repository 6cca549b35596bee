//! Shared test host and run helpers.
//!
//! `TestHost` keeps a flat in-memory world view and executes sub-calls by
//! re-entering a nested `Vm`, so CALL/CREATE tests exercise the real
//! frame-unwinding protocol. State is not journaled: tests that revert only
//! assert what the parent frame observes.

// Each integration test binary compiles its own copy of this module and
// uses a different subset of it.
#![allow(dead_code)]

use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use rustc_hash::{FxHashMap, FxHashSet};

use embervm::{
    errors::ExecutionReport,
    host::{AccessStatus, CallKind, CallOutcome, Host, Message, StorageStatus, TxContext},
    revision::Revision,
    utils::keccak,
    vm::Vm,
};

/// Address running the code under test.
pub const CONTRACT_ADDR: u64 = 0x42;
/// Transaction sender.
pub const SENDER_ADDR: u64 = 0x100;

pub fn contract_address() -> Address {
    Address::from_low_u64_be(CONTRACT_ADDR)
}

pub fn sender_address() -> Address {
    Address::from_low_u64_be(SENDER_ADDR)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StorageSlot {
    pub original: H256,
    pub current: H256,
}

#[derive(Debug, Clone, Default)]
pub struct TestAccount {
    pub balance: U256,
    pub code: Bytes,
    pub storage: FxHashMap<H256, StorageSlot>,
}

impl TestAccount {
    pub fn with_code(code: &[u8]) -> Self {
        Self {
            code: Bytes::copy_from_slice(code),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmittedLog {
    pub address: Address,
    pub data: Vec<u8>,
    pub topics: Vec<H256>,
}

pub struct TestHost {
    pub revision: Revision,
    pub accounts: FxHashMap<Address, TestAccount>,
    pub tx: TxContext,
    pub accessed_addresses: FxHashSet<Address>,
    pub accessed_slots: FxHashSet<(Address, H256)>,
    pub transient: FxHashMap<(Address, H256), H256>,
    pub logs: Vec<EmittedLog>,
    pub selfdestructs: Vec<(Address, Address)>,
    pub block_hashes: FxHashMap<u64, H256>,
    /// Gas each sub-message arrived with, in call order.
    pub recorded_call_gas: Vec<i64>,
    next_create_nonce: u64,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new(Revision::Cancun)
    }
}

impl TestHost {
    pub fn new(revision: Revision) -> Self {
        let mut accounts = FxHashMap::default();
        accounts.insert(
            sender_address(),
            TestAccount {
                balance: U256::MAX,
                ..Default::default()
            },
        );
        accounts.insert(contract_address(), TestAccount::default());
        Self {
            revision,
            accounts,
            tx: TxContext {
                origin: sender_address(),
                chain_id: U256::one(),
                block_number: 1_000,
                block_gas_limit: 30_000_000,
                ..Default::default()
            },
            accessed_addresses: FxHashSet::default(),
            accessed_slots: FxHashSet::default(),
            transient: FxHashMap::default(),
            logs: Vec::new(),
            selfdestructs: Vec::new(),
            block_hashes: FxHashMap::default(),
            recorded_call_gas: Vec::new(),
            next_create_nonce: 0,
        }
    }

    pub fn insert_account(&mut self, address: Address, account: TestAccount) {
        self.accounts.insert(address, account);
    }

    pub fn set_storage_slot(&mut self, address: Address, key: H256, value: H256) {
        self.accounts.entry(address).or_default().storage.insert(
            key,
            StorageSlot {
                original: value,
                current: value,
            },
        );
    }

    pub fn storage_value(&self, address: Address, key: H256) -> H256 {
        self.accounts
            .get(&address)
            .and_then(|account| account.storage.get(&key))
            .map(|slot| slot.current)
            .unwrap_or_default()
    }
}

impl Host for TestHost {
    fn access_account(&mut self, address: Address) -> AccessStatus {
        if self.accessed_addresses.insert(address) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    fn access_storage(&mut self, address: Address, key: H256) -> AccessStatus {
        if self.accessed_slots.insert((address, key)) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    fn account_exists(&mut self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    fn get_balance(&mut self, address: Address) -> U256 {
        self.accounts
            .get(&address)
            .map(|account| account.balance)
            .unwrap_or_default()
    }

    fn get_code_size(&mut self, address: Address) -> usize {
        self.accounts
            .get(&address)
            .map(|account| account.code.len())
            .unwrap_or_default()
    }

    fn get_code_hash(&mut self, address: Address) -> H256 {
        self.accounts
            .get(&address)
            .map(|account| keccak(&account.code))
            .unwrap_or_default()
    }

    fn copy_code(&mut self, address: Address, offset: usize, dest: &mut [u8]) -> usize {
        let Some(account) = self.accounts.get(&address) else {
            return 0;
        };
        if offset >= account.code.len() {
            return 0;
        }
        let copy_size = dest.len().min(account.code.len() - offset);
        dest[..copy_size].copy_from_slice(&account.code[offset..offset + copy_size]);
        copy_size
    }

    fn get_storage(&mut self, address: Address, key: H256) -> H256 {
        self.storage_value(address, key)
    }

    fn set_storage(&mut self, address: Address, key: H256, value: H256) -> StorageStatus {
        let slot = self
            .accounts
            .entry(address)
            .or_default()
            .storage
            .entry(key)
            .or_default();
        let original = slot.original;
        let current = slot.current;
        slot.current = value;

        // EIP-2200 transition classification.
        if current == value {
            return StorageStatus::Unchanged;
        }
        if original == current {
            return if original.is_zero() {
                StorageStatus::Added
            } else if value.is_zero() {
                StorageStatus::Deleted
            } else {
                StorageStatus::Modified
            };
        }
        // Dirty slot.
        if !original.is_zero() && current.is_zero() {
            if value == original {
                StorageStatus::DeletedRestored
            } else {
                StorageStatus::DeletedAdded
            }
        } else if !original.is_zero() && value.is_zero() {
            StorageStatus::ModifiedDeleted
        } else if original.is_zero() && value.is_zero() {
            StorageStatus::AddedDeleted
        } else if value == original {
            StorageStatus::ModifiedRestored
        } else {
            StorageStatus::Unchanged
        }
    }

    fn get_transient_storage(&mut self, address: Address, key: H256) -> H256 {
        self.transient
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    fn set_transient_storage(&mut self, address: Address, key: H256, value: H256) {
        self.transient.insert((address, key), value);
    }

    fn get_block_hash(&mut self, number: u64) -> H256 {
        self.block_hashes.get(&number).copied().unwrap_or_default()
    }

    fn emit_log(&mut self, address: Address, data: &[u8], topics: &[H256]) {
        self.logs.push(EmittedLog {
            address,
            data: data.to_vec(),
            topics: topics.to_vec(),
        });
    }

    fn selfdestruct(&mut self, address: Address, beneficiary: Address) {
        self.selfdestructs.push((address, beneficiary));
    }

    fn call(&mut self, msg: Message) -> CallOutcome {
        self.recorded_call_gas.push(msg.gas);
        let revision = self.revision;
        let is_create = matches!(msg.kind, CallKind::Create | CallKind::Create2);

        let (code, exec_msg, create_address) = if is_create {
            // Deterministic fresh address; good enough for a mock.
            self.next_create_nonce += 1;
            let created = Address::from_low_u64_be(0xc0de_0000 + self.next_create_nonce);
            self.accounts.insert(created, TestAccount::default());
            let exec_msg = Message {
                recipient: created,
                code_address: created,
                input: Bytes::new(),
                ..msg.clone()
            };
            (msg.input.clone(), exec_msg, Some(created))
        } else {
            let code = self
                .accounts
                .get(&msg.code_address)
                .map(|account| account.code.clone())
                .unwrap_or_default();
            (code, msg.clone(), None)
        };

        // Value transfer, simplified: the caller's balance was already
        // checked by the opcode handler.
        if !msg.value.is_zero() && msg.kind != CallKind::DelegateCall {
            let sender = msg.sender;
            let recipient = exec_msg.recipient;
            if let Some(account) = self.accounts.get_mut(&sender) {
                account.balance = account.balance.saturating_sub(msg.value);
            }
            let recipient_account = self.accounts.entry(recipient).or_default();
            recipient_account.balance = recipient_account.balance.saturating_add(msg.value);
        }

        if code.is_empty() {
            return CallOutcome {
                status: embervm::StatusCode::Success,
                gas_left: msg.gas,
                gas_refund: 0,
                output: Bytes::new(),
                create_address,
            };
        }

        let mut vm = Vm::new(self, revision);
        let report = match vm.execute_message(exec_msg, code) {
            Ok(report) => report,
            Err(error) => panic!("nested execution failed: {error}"),
        };

        let is_success = report.is_success();
        CallOutcome {
            status: report.status,
            gas_left: i64::try_from(report.gas_left).expect("gas fits"),
            gas_refund: report.gas_refund,
            output: report.output,
            create_address: create_address.filter(|_| is_success),
        }
    }

    fn tx_context(&self) -> TxContext {
        self.tx.clone()
    }
}

/// Build the standard top-level message for `code` at the test contract.
pub fn call_message(gas: i64) -> Message {
    Message {
        kind: CallKind::Call,
        is_static: false,
        depth: 0,
        gas,
        recipient: contract_address(),
        sender: sender_address(),
        value: U256::zero(),
        input: Bytes::new(),
        code_address: contract_address(),
        salt: None,
    }
}

/// Run `code` against a fresh Cancun host.
pub fn run_code(code: &[u8], gas: i64) -> ExecutionReport {
    let mut host = TestHost::default();
    run_code_with(&mut host, code, gas)
}

/// Run `code` against the given host.
pub fn run_code_with(host: &mut TestHost, code: &[u8], gas: i64) -> ExecutionReport {
    run_message_with(host, code, call_message(gas))
}

/// Run `code` under a fully custom message.
pub fn run_message_with(host: &mut TestHost, code: &[u8], msg: Message) -> ExecutionReport {
    let revision = host.revision;
    let mut vm = Vm::new(host, revision);
    vm.execute_message(msg, Bytes::copy_from_slice(code))
        .expect("execution must not error internally")
}

/// Decode a hex bytecode literal.
pub fn bytecode(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str.replace(' ', "")).expect("valid hex")
}
