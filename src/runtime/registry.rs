//! Call session registry
//!
//! One live session per call ID. The map lock is only held long enough to
//! look up, insert, or remove a handle; each session has its own mutex that a
//! turn holds from start to finish, so turns for one call never overlap while
//! different calls never wait on each other.

use crate::state_machine::{CallContext, DialogState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Registry errors surfaced to the transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("call {0} already has an active session")]
    Duplicate(String),
    #[error("no active session for call {0}")]
    NotFound(String),
    /// The recording answers a question the call has already moved past
    #[error("recording for call {call_id} is tagged {tag} but the call is in {state}")]
    StaleRecording {
        call_id: String,
        tag: DialogState,
        state: DialogState,
    },
}

/// Conversational state of one call
#[derive(Debug)]
pub struct CallSession {
    pub context: CallContext,
    pub state: DialogState,
    /// Consecutive topic-choice re-asks
    pub topic_retries: u32,
    pub turns: u32,
    pub started_at: DateTime<Utc>,
}

impl CallSession {
    fn new(context: CallContext) -> Self {
        Self {
            context,
            state: DialogState::AwaitingTopicChoice,
            topic_retries: 0,
            turns: 0,
            started_at: Utc::now(),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.context.call_id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            call_id: self.context.call_id.clone(),
            state: self.state,
            topic_retries: self.topic_retries,
            turns: self.turns,
            started_at: self.started_at,
        }
    }
}

/// Read-only view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub call_id: String,
    pub state: DialogState,
    pub topic_retries: u32,
    pub turns: u32,
    pub started_at: DateTime<Utc>,
}

/// Shared handle to one session
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<CallSession>>,
    /// Cancelled when the call ends; observed by in-flight turns
    ended: CancellationToken,
}

impl SessionHandle {
    fn new(context: CallContext) -> Self {
        Self {
            session: Arc::new(Mutex::new(CallSession::new(context))),
            ended: CancellationToken::new(),
        }
    }

    /// Wait for exclusive access for one turn
    pub async fn lock(&self) -> MutexGuard<'_, CallSession> {
        self.session.lock().await
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_cancelled()
    }

    /// Resolves once the call has been removed from the registry
    pub fn ended(&self) -> WaitForCancellationFuture<'_> {
        self.ended.cancelled()
    }

    fn is_same(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }
}

/// Registry of active call sessions keyed by call ID
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session, failing if the call already has one
    pub async fn create(&self, context: CallContext) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&context.call_id) {
            return Err(SessionError::Duplicate(context.call_id));
        }
        let call_id = context.call_id.clone();
        let handle = SessionHandle::new(context);
        sessions.insert(call_id, handle.clone());
        Ok(handle)
    }

    /// Return the live session for `context.call_id`, creating one if absent
    #[allow(dead_code)] // Transports that don't send an explicit start event
    pub async fn get_or_create(&self, context: CallContext) -> SessionHandle {
        if let Ok(handle) = self.get(&context.call_id).await {
            return handle;
        }
        self.sessions
            .write()
            .await
            .entry(context.call_id.clone())
            .or_insert_with(|| SessionHandle::new(context))
            .clone()
    }

    pub async fn get(&self, call_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(call_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(call_id.to_string()))
    }

    /// Remove a session and signal any in-flight turn that the call is over.
    /// Returns whether a session was present.
    pub async fn remove(&self, call_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(call_id);
        match removed {
            Some(handle) => {
                handle.ended.cancel();
                true
            }
            None => false,
        }
    }

    /// Remove `handle` only if it is still the live session for `call_id`.
    ///
    /// A call ID can be reused once its session is gone; this keeps a late
    /// cleanup from tearing down the newer session.
    pub async fn remove_handle(&self, call_id: &str, handle: &SessionHandle) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.get(call_id).is_some_and(|live| live.is_same(handle)) {
            sessions.remove(call_id);
            handle.ended.cancel();
            true
        } else {
            false
        }
    }

    pub async fn snapshot(&self, call_id: &str) -> Result<SessionSnapshot, SessionError> {
        let handle = self.get(call_id).await?;
        let session = handle.lock().await;
        Ok(session.snapshot())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[allow(dead_code)] // API completeness
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
