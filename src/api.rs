//! HTTP API for the telephony transport
//!
//! The transport posts call events here and performs the returned actions.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::runtime::DialogEngine;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DialogEngine>,
}

impl AppState {
    pub fn new(engine: DialogEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
