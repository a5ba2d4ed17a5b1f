//! Dialog engine: one turn per inbound call event

use super::registry::{CallSession, SessionError, SessionHandle, SessionRegistry};
use crate::config::IvrConfig;
use crate::speech::TranscriptionGateway;
use crate::state_machine::transition::{internal_failure, retries_exhausted};
use crate::state_machine::{
    transition, Action, ActionList, DialogState, Event, TransitionError, TransitionResult,
};
use std::sync::Arc;

/// Result of one recording as reported by the transport
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    Success { audio: Vec<u8> },
    Failure { reason: String },
}

/// Drives every active call through the dialog state machine
pub struct DialogEngine {
    registry: Arc<SessionRegistry>,
    gateway: TranscriptionGateway,
    config: IvrConfig,
}

impl DialogEngine {
    pub fn new(registry: Arc<SessionRegistry>, gateway: TranscriptionGateway, config: IvrConfig) -> Self {
        Self {
            registry,
            gateway,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Open a session for a newly answered call and greet the caller
    pub async fn on_call_started(&self, call_id: &str) -> Result<ActionList, SessionError> {
        let handle = self.registry.create(self.config.call_context(call_id)).await?;
        let mut session = handle.lock().await;
        tracing::info!(call_id = %call_id, "Call started");

        let from = session.state;
        let result = transition(from, &session.context, Event::CallStarted);
        Ok(self.finish_turn(&handle, &mut session, from, result).await)
    }

    /// Interpret one finished recording and decide what happens next.
    ///
    /// `tag` is the state echoed back from the `Record` action that produced
    /// the recording; `None` means the transport did not echo one. A tag that
    /// no longer matches the session is rejected before any transcription and
    /// leaves the session untouched.
    pub async fn on_recording_completed(
        &self,
        call_id: &str,
        outcome: RecordOutcome,
        tag: Option<DialogState>,
    ) -> Result<ActionList, SessionError> {
        let handle = self.registry.get(call_id).await?;
        let mut session = handle.lock().await;
        if handle.is_ended() {
            return Err(SessionError::NotFound(call_id.to_string()));
        }

        let from = session.state;
        if let Some(tag) = tag.filter(|tag| *tag != from) {
            tracing::warn!(call_id = %call_id, tag = %tag, state = %from, "Dropping stale recording");
            return Err(SessionError::StaleRecording {
                call_id: call_id.to_string(),
                tag,
                state: from,
            });
        }

        let event = match outcome {
            RecordOutcome::Failure { reason } => Event::RecordingFailed { reason },
            RecordOutcome::Success { audio } => {
                let result = tokio::select! {
                    () = handle.ended() => None,
                    result = self.gateway.transcribe(&audio) => Some(result),
                };
                // on_call_ended never waits for the turn lock, so the call may
                // have ended after the transcription resolved
                let Some(result) = result.filter(|_| !handle.is_ended()) else {
                    tracing::debug!(call_id = %call_id, "Call ended during transcription, discarding result");
                    return Err(SessionError::NotFound(call_id.to_string()));
                };
                match result {
                    Ok(utterance) => Event::Transcribed { utterance },
                    Err(e) => Event::TranscriptionFailed { error: e.to_string() },
                }
            }
        };

        match event.detail() {
            Some(detail) => tracing::warn!(call_id = %call_id, event = event.kind(), detail = %detail, "Turn input failed"),
            None => tracing::debug!(call_id = %call_id, event = event.kind(), "Applying event"),
        }
        let result = transition(from, &session.context, event);
        Ok(self.finish_turn(&handle, &mut session, from, result).await)
    }

    /// Discard the call's session; unknown call IDs are ignored
    pub async fn on_call_ended(&self, call_id: &str) {
        if self.registry.remove(call_id).await {
            tracing::info!(call_id = %call_id, "Call ended");
        } else {
            tracing::debug!(call_id = %call_id, "Call ended with no active session");
        }
    }

    /// Apply a transition outcome to the session and return the actions.
    ///
    /// Transition errors become an apology plus hangup so the caller is never
    /// left on a silent line.
    async fn finish_turn(
        &self,
        handle: &SessionHandle,
        session: &mut CallSession,
        from: DialogState,
        result: Result<TransitionResult, TransitionError>,
    ) -> ActionList {
        let result = match result {
            Ok(result) => apply_retry_bound(session, from, result),
            Err(e) => {
                tracing::error!(call_id = %session.call_id(), state = %from, error = %e, "Turn failed");
                internal_failure()
            }
        };

        session.state = result.new_state;
        session.turns += 1;
        tracing::info!(
            call_id = %session.call_id(),
            from = %from,
            to = %result.new_state,
            operations = ?result.actions.iter().map(Action::operation_id).collect::<Vec<_>>(),
            "Turn completed"
        );

        if result.new_state.is_terminal() {
            let call_id = session.call_id().to_string();
            self.registry.remove_handle(&call_id, handle).await;
        }

        result.actions
    }
}

/// Track consecutive topic-choice re-asks and give up once the configured
/// bound is passed
fn apply_retry_bound(session: &mut CallSession, from: DialogState, result: TransitionResult) -> TransitionResult {
    if result.new_state != DialogState::AwaitingTopicChoice {
        session.topic_retries = 0;
        return result;
    }
    // The greeting turn asks the topic question for the first time
    if session.turns == 0 || !result.is_topic_retry(from) {
        return result;
    }

    session.topic_retries += 1;
    match session.context.max_topic_retries {
        Some(max) if session.topic_retries > max => {
            tracing::warn!(
                call_id = %session.call_id(),
                retries = session.topic_retries,
                "Topic choice retries exhausted"
            );
            retries_exhausted()
        }
        _ => result,
    }
}
