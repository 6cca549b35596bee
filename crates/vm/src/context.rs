use bytes::Bytes;

use crate::{
    call_frame::CallFrame,
    errors::{InternalError, StatusCode},
};

/// Gas accounting of a frame that finished, kept so the driver can report it
/// for the outermost frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameExit {
    pub gas_left: i64,
    pub gas_refund: i64,
}

/// Holder of the call chain and of cross-frame results.
///
/// The innermost (running) frame sits at the top of `call_frames`. At most
/// one frame is current; handlers only ever touch that one. `return_data`
/// reflects the most recently completed sub-context, so a parent can serve
/// RETURNDATASIZE/RETURNDATACOPY after its child returned.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    call_frames: Vec<CallFrame>,
    return_data: Bytes,
    status: StatusCode,
    /// Set by JUMP/JUMPI so the driver skips its default pc advance.
    pub is_jump: bool,
    last_exit: Option<FrameExit>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_frame(&mut self) -> Result<&mut CallFrame, InternalError> {
        self.call_frames
            .last_mut()
            .ok_or(InternalError::NoActiveFrame)
    }

    pub fn current_frame_opt(&mut self) -> Option<&mut CallFrame> {
        self.call_frames.last_mut()
    }

    pub fn call_depth(&self) -> usize {
        self.call_frames.len()
    }

    pub fn push_frame(&mut self, frame: CallFrame) {
        self.call_frames.push(frame);
    }

    /// Remove the current frame. Gas and refund transfer to the parent is
    /// the caller's job; see [`crate::vm::Vm::exit_frame`].
    pub fn pop_frame(&mut self) -> Result<CallFrame, InternalError> {
        self.call_frames.pop().ok_or(InternalError::NoActiveFrame)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn return_data(&self) -> &Bytes {
        &self.return_data
    }

    pub fn set_return_data(&mut self, data: Bytes) {
        self.return_data = data;
    }

    pub fn record_exit(&mut self, exit: FrameExit) {
        self.last_exit = Some(exit);
    }

    pub fn last_exit(&self) -> Option<FrameExit> {
        self.last_exit
    }
}
