//! # embervm
//!
//! An embeddable Ethereum Virtual Machine execution core.
//!
//! The crate executes a single contract frame at a time: it dispatches
//! 256-bit opcodes against an evaluation stack and a byte-addressed memory,
//! meters gas to consensus semantics, and delegates every world-state effect
//! (storage, balances, sub-calls, logs, self-destruct) to an external
//! [`host::Host`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           Vm                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  CallFrame  │  │   Memory    │  │       Stack         │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │                                                             │
//! │  ┌─────────────────────┐  ┌─────────────────────────────┐   │
//! │  │  ExecutionContext   │  │   Opcode dispatch table     │   │
//! │  └─────────────────────┘  └─────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           Host                              │
//! │        (accounts, storage, sub-calls, logs, block data)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key components
//!
//! - [`vm::Vm`]: fetch/dispatch loop and frame unwinding
//! - [`call_frame::CallFrame`]: per-call stack, memory, pc and gas
//! - [`context::ExecutionContext`]: call chain, return-data buffer, status
//! - [`host::Host`]: world-state interface consumed by the handlers
//! - [`gas_cost`]: static and dynamic gas schedules per revision
//!
//! ## Supported revisions
//!
//! Frontier through Cancun. Every revision-dependent cost or behavior is
//! gated on an explicit [`revision::Revision`] comparison.
//!
//! ## Usage
//!
//! ```ignore
//! use embervm::{host::Message, revision::Revision, vm::Vm};
//!
//! let mut vm = Vm::new(&mut host, Revision::Cancun);
//! let report = vm.execute_message(msg, code)?;
//! if report.is_success() {
//!     println!("gas left: {}", report.gas_left);
//! }
//! ```

pub mod call_frame;
pub mod constants;
pub mod context;
pub mod errors;
pub mod gas_cost;
pub mod host;
pub mod memory;
pub mod opcode_handlers;
pub mod opcodes;
pub mod revision;
pub mod utils;
pub mod vm;

pub use errors::{ExecutionReport, StatusCode, VMError};
pub use host::Host;
pub use revision::Revision;
pub use vm::Vm;
