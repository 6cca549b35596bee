use bytes::Bytes;
use ethereum_types::{Address, H256, U256};

use crate::errors::StatusCode;

/// How a sub-context was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
    Create,
    Create2,
}

/// [EIP-2929] access-list state of an account or storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Cold,
    Warm,
}

/// Effect of a storage write, as reported by the host.
///
/// The composite variants only occur under net gas metering, when a slot is
/// written more than once inside one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStatus {
    /// The new value equals the current one.
    Unchanged,
    /// Zero slot set to a non-zero value.
    Added,
    /// Non-zero slot set to zero.
    Deleted,
    /// Non-zero slot set to a different non-zero value.
    Modified,
    /// Slot deleted earlier in the transaction, now set again.
    DeletedAdded,
    /// Slot modified earlier in the transaction, now deleted.
    ModifiedDeleted,
    /// Slot deleted earlier in the transaction, original value restored.
    DeletedRestored,
    /// Slot added earlier in the transaction, now deleted again.
    AddedDeleted,
    /// Slot modified earlier in the transaction, original value restored.
    ModifiedRestored,
}

/// The message that enters a call or create sub-context.
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: CallKind,
    pub is_static: bool,
    pub depth: u32,
    /// Gas available to the sub-context. Signed so unwinding arithmetic can
    /// be checked, but never negative while a frame runs.
    pub gas: i64,
    pub recipient: Address,
    pub sender: Address,
    pub value: U256,
    pub input: Bytes,
    /// Account whose code runs. Differs from `recipient` for CALLCODE and
    /// DELEGATECALL.
    pub code_address: Address,
    /// CREATE2 salt.
    pub salt: Option<U256>,
}

/// Completed result of a sub-call dispatched through [`Host::call`].
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub status: StatusCode,
    pub gas_left: i64,
    pub gas_refund: i64,
    pub output: Bytes,
    pub create_address: Option<Address>,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Block and transaction context, immutable for the whole execution.
#[derive(Debug, Clone, Default)]
pub struct TxContext {
    pub origin: Address,
    pub gas_price: U256,
    pub coinbase: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub block_gas_limit: u64,
    pub prev_randao: H256,
    pub chain_id: U256,
    pub base_fee: U256,
    pub blob_hashes: Vec<H256>,
    pub blob_base_fee: U256,
}

/// World-state interface consumed by the opcode handlers.
///
/// The host owns all observable state: accounts, storage, transient storage,
/// logs and the block view. It is also responsible for executing sub-calls
/// ([`Host::call`] returns a completed outcome) and for journaling, so a
/// reverted sub-context leaves no trace in its view.
pub trait Host {
    fn access_account(&mut self, address: Address) -> AccessStatus;
    fn access_storage(&mut self, address: Address, key: H256) -> AccessStatus;
    fn account_exists(&mut self, address: Address) -> bool;
    fn get_balance(&mut self, address: Address) -> U256;
    fn get_code_size(&mut self, address: Address) -> usize;
    fn get_code_hash(&mut self, address: Address) -> H256;
    /// Copy code of `address` starting at `offset` into `dest`, returning
    /// the number of bytes actually copied.
    fn copy_code(&mut self, address: Address, offset: usize, dest: &mut [u8]) -> usize;
    fn get_storage(&mut self, address: Address, key: H256) -> H256;
    fn set_storage(&mut self, address: Address, key: H256, value: H256) -> StorageStatus;
    fn get_transient_storage(&mut self, address: Address, key: H256) -> H256;
    fn set_transient_storage(&mut self, address: Address, key: H256, value: H256);
    fn get_block_hash(&mut self, number: u64) -> H256;
    fn emit_log(&mut self, address: Address, data: &[u8], topics: &[H256]);
    fn selfdestruct(&mut self, address: Address, beneficiary: Address);
    /// Execute a sub-context to completion.
    fn call(&mut self, msg: Message) -> CallOutcome;
    fn tx_context(&self) -> TxContext;
}
