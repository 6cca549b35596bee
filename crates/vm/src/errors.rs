use bytes::Bytes;
use thiserror::Error;

/// Faults that terminate the current frame and consume its remaining gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExceptionalHalt {
    #[error("Out Of Gas")]
    OutOfGas,
    #[error("Stack Underflow")]
    StackUnderflow,
    #[error("Stack Overflow")]
    StackOverflow,
    #[error("Invalid Opcode")]
    InvalidOpcode,
    #[error("Opcode Not Allowed In Static Context")]
    OpcodeNotAllowedInStaticContext,
    #[error("Invalid Jump")]
    InvalidJump,
    #[error("Unexpected End Of Code")]
    UnexpectedEnd,
    #[error("Very Large Number")]
    VeryLargeNumber,
    #[error("Out Of Bounds")]
    OutOfBounds,
}

/// Invariant violations. These never occur on well-formed input and are not
/// part of consensus semantics; surfacing one means a bug in the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("Overflow")]
    Overflow,
    #[error("Underflow")]
    Underflow,
    #[error("Type Conversion Error")]
    TypeConversion,
    #[error("No active call frame")]
    NoActiveFrame,
    #[error("Execution finished without a frame result")]
    MissingFrameResult,
    #[error("{0}")]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VMError {
    #[error("{0}")]
    ExceptionalHalt(#[from] ExceptionalHalt),
    #[error("Internal error: {0}")]
    Internal(#[from] InternalError),
    /// REVERT is not a fault: it terminates the frame but returns unused gas.
    #[error("Revert opcode")]
    RevertOpcode,
}

impl VMError {
    pub fn is_revert_opcode(&self) -> bool {
        matches!(self, VMError::RevertOpcode)
    }
}

/// What the dispatch loop should do after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeResult {
    Continue,
    Halt,
}

/// Terminal status of a frame, as surfaced to the embedder and to parent
/// frames through [`crate::host::CallOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCode {
    #[default]
    Success,
    Revert,
    OutOfGas,
    InvalidOpcode,
    StaticModeViolation,
    InvalidJump,
    StackUnderflow,
    StackOverflow,
    UnexpectedEnd,
    IntegerOverflow,
    MemoryOverflow,
}

impl StatusCode {
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl From<ExceptionalHalt> for StatusCode {
    fn from(halt: ExceptionalHalt) -> Self {
        match halt {
            ExceptionalHalt::OutOfGas => StatusCode::OutOfGas,
            ExceptionalHalt::StackUnderflow => StatusCode::StackUnderflow,
            ExceptionalHalt::StackOverflow => StatusCode::StackOverflow,
            ExceptionalHalt::InvalidOpcode => StatusCode::InvalidOpcode,
            ExceptionalHalt::OpcodeNotAllowedInStaticContext => StatusCode::StaticModeViolation,
            ExceptionalHalt::InvalidJump => StatusCode::InvalidJump,
            ExceptionalHalt::UnexpectedEnd => StatusCode::UnexpectedEnd,
            ExceptionalHalt::VeryLargeNumber => StatusCode::IntegerOverflow,
            ExceptionalHalt::OutOfBounds => StatusCode::MemoryOverflow,
        }
    }
}

/// Result of executing a whole message against a [`crate::vm::Vm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub status: StatusCode,
    pub gas_left: u64,
    pub gas_refund: i64,
    pub output: Bytes,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Gas consumed by the frame, relative to the gas it was given.
    pub fn gas_used(&self, gas_limit: u64) -> u64 {
        gas_limit.saturating_sub(self.gas_left)
    }
}
