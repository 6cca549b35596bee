use bytes::Bytes;
use tracing::trace;

use crate::{
    call_frame::CallFrame,
    context::{ExecutionContext, FrameExit},
    errors::{ExecutionReport, InternalError, OpcodeResult, StatusCode, VMError},
    host::{Host, Message},
    opcodes::OpCodeFn,
    revision::Revision,
};

/// The execution core: a fetch/dispatch loop over the current frame.
///
/// The `Vm` owns no world state. Handlers mutate the current
/// [`CallFrame`] and reach the outside world exclusively through the
/// [`Host`]; sub-calls are executed by the host and come back as completed
/// outcomes.
pub struct Vm<'a> {
    pub context: ExecutionContext,
    pub host: &'a mut dyn Host,
    pub revision: Revision,
    /// Opcode dispatch table, built once per revision.
    pub(crate) opcode_table: [OpCodeFn<'a>; 256],
}

impl<'a> Vm<'a> {
    pub fn new(host: &'a mut dyn Host, revision: Revision) -> Self {
        Self {
            context: ExecutionContext::new(),
            host,
            revision,
            opcode_table: Self::build_opcode_table(revision),
        }
    }

    /// Execute `code` under `msg`, running until the frame (and any frame
    /// the embedder stacked below it) has terminated.
    pub fn execute_message(&mut self, msg: Message, code: Bytes) -> Result<ExecutionReport, VMError> {
        trace!(kind = ?msg.kind, depth = msg.depth, gas = msg.gas, "frame enter");
        self.context
            .push_frame(CallFrame::new(msg, code, self.revision));
        self.run()
    }

    fn run(&mut self) -> Result<ExecutionReport, VMError> {
        loop {
            let opcode = {
                let Some(frame) = self.context.current_frame_opt() else {
                    break;
                };
                // Falling off the end of the code is an implicit STOP.
                frame.code.get(frame.pc).copied().unwrap_or(0x00)
            };

            let handler = self.opcode_table[usize::from(opcode)];
            match handler.call(self) {
                Ok(OpcodeResult::Continue) => {
                    if self.context.is_jump {
                        self.context.is_jump = false;
                    } else {
                        let frame = self.context.current_frame()?;
                        frame.pc = frame.pc.checked_add(1).ok_or(InternalError::Overflow)?;
                    }
                }
                // The handler already unwound its frame.
                Ok(OpcodeResult::Halt) => {}
                Err(error) => self.handle_opcode_error(error)?,
            }
        }

        let exit = self
            .context
            .last_exit()
            .ok_or(InternalError::MissingFrameResult)?;
        let status = self.context.status();
        trace!(?status, gas_left = exit.gas_left, "frame exit");

        Ok(ExecutionReport {
            status,
            gas_left: u64::try_from(exit.gas_left).map_err(|_| InternalError::TypeConversion)?,
            // Refunds only survive a successful frame.
            gas_refund: if status.is_success() {
                exit.gas_refund
            } else {
                0
            },
            output: self.context.return_data().clone(),
        })
    }

    /// Translate a handler error into a terminal frame transition.
    fn handle_opcode_error(&mut self, error: VMError) -> Result<(), VMError> {
        match error {
            // REVERT keeps its output and returns unused gas.
            VMError::RevertOpcode => self.exit_frame(StatusCode::Revert),
            VMError::ExceptionalHalt(halt) => {
                let frame = self.context.current_frame()?;
                frame.gas_remaining = 0;
                self.context.set_return_data(Bytes::new());
                self.exit_frame(StatusCode::from(halt))
            }
            VMError::Internal(error) => Err(error.into()),
        }
    }

    /// Terminal transition of the current frame: set the status, pop the
    /// frame and credit the leftover gas (and, on success, the refund
    /// accumulator) to the parent. The ordering matters; return data was
    /// already snapshotted by the handler.
    pub(crate) fn exit_frame(&mut self, status: StatusCode) -> Result<(), VMError> {
        self.context.set_status(status);
        let frame = self.context.pop_frame()?;
        let gas_left = frame.gas_remaining.max(0);

        if let Some(parent) = self.context.current_frame_opt() {
            parent.gas_remaining = parent
                .gas_remaining
                .checked_add(gas_left)
                .ok_or(InternalError::Overflow)?;
            if status.is_success() {
                parent.gas_refund = parent
                    .gas_refund
                    .checked_add(frame.gas_refund)
                    .ok_or(InternalError::Overflow)?;
            }
        }

        self.context.record_exit(FrameExit {
            gas_left,
            gas_refund: frame.gas_refund,
        });
        Ok(())
    }
}
