//! # provisioning
//!
//! Turns a `useractions` document into directory calls, one row at a time,
//! and records what happened to every row in a CSV audit.
//!
//! Rows run strictly in input order. A failing row is reported in its own
//! result column and never stops the batch; only an unreadable input or an
//! unwritable output aborts the run.
pub mod action;
pub mod batch;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod result;

pub use action::{ActionKind, UserAction};
pub use batch::{BatchRunner, BatchSummary};
pub use config::Config as LicenseConfig;
pub use dispatcher::Dispatcher;
pub use error::{ActionError, ActionOutcome, ActionSuccess};
pub use result::ActionResult;
