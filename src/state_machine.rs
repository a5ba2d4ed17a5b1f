//! Dialog state machine
//!
//! Pure transitions from (state, event) to (next state, actions). The runtime
//! owns sessions and I/O; everything here is deterministic apart from the
//! fresh operation IDs stamped on actions.

mod action;
pub mod event;
pub mod intent;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use action::{Action, ActionList};
pub use event::Event;
pub use state::{CallContext, DialogState, RecordingFormat};
pub use transition::{transition, TransitionError, TransitionResult};
