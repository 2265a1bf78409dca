//! Structured logging
//!
//! [`init`] installs the process-wide subscriber once, at startup. Operation
//! boundaries are logged with [`log_op_start!`](crate::log_op_start),
//! [`log_op_end!`](crate::log_op_end) and
//! [`log_op_error!`](crate::log_op_error), which always emit the
//! `component`, `op` and `event` fields. Tests record events in memory with
//! [`init_test_capture`].

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
