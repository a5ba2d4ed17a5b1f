//! Runtime for in-progress calls
//!
//! Owns the session registry and runs each inbound call event as one turn
//! through the pure state machine.

mod executor;
pub mod registry;


pub use executor::{DialogEngine, RecordOutcome};
pub use registry::{SessionError, SessionRegistry, SessionSnapshot};
