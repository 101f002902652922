pub mod api;
pub mod config;
pub mod decoder;
pub mod error;
pub mod evaluator;
pub mod layout;
pub mod record;
pub mod report;
pub mod session;
// reports (terminal rendering) is a module of the binary crate.

pub use error::{DecodeError, KeyTraceError, KtResult};
pub use evaluator::Evaluator;
pub use record::{EventKind, Record, Timestamp};
