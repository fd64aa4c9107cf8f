//! Message dispatcher
//!
//! Sends one user message to the [`ChatBackend`] and folds the outcome
//! into the message store and the session:
//!
//! - the user message is appended before the request is issued
//! - on success the AI reply is appended and the session gains the
//!   reply's tokens, its response time and an AI message count
//! - on failure a system error message is appended; nothing is retried
//!
//! The request races a [`CancellationToken`]; a cancelled send appends
//! nothing after the user message. The loading flag is cleared on every
//! path, including when the send future itself is dropped.

use crate::api::{ChatBackend, ChatRequest};
use crate::chat::agent::Agent;
use crate::chat::message::{system_text, MessageKind, MessageStore, NewMessage, Sender};
use crate::chat::metrics::RequestMetrics;
use crate::chat::session::{SessionTracker, SessionUpdate};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Where a send is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    Sending,
}

/// How a send ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply was appended
    Delivered,
    /// A system error message was appended
    Failed,
    /// The owner shut down before a reply arrived
    Cancelled,
}

/// Resets the dispatch state to idle when dropped
struct SendingGuard<'a> {
    state: &'a watch::Sender<DispatchState>,
}

impl<'a> SendingGuard<'a> {
    fn enter(state: &'a watch::Sender<DispatchState>) -> Self {
        state.send_replace(DispatchState::Sending);
        Self { state }
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(DispatchState::Idle);
    }
}

/// Submits user messages to the chat backend
pub struct MessageDispatcher {
    backend: Arc<dyn ChatBackend>,
    state: watch::Sender<DispatchState>,
}

impl MessageDispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (state, _) = watch::channel(DispatchState::Idle);
        Self { backend, state }
    }

    pub fn state(&self) -> DispatchState {
        *self.state.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.state() == DispatchState::Sending
    }

    /// Watch the dispatch state from outside the send
    pub fn subscribe(&self) -> watch::Receiver<DispatchState> {
        self.state.subscribe()
    }

    /// Send `text` on behalf of `agent`'s conversation
    ///
    /// If `cancel` is already triggered nothing is appended at all.
    pub async fn send_message(
        &mut self,
        text: &str,
        agent: &Agent,
        messages: &mut MessageStore,
        session: &mut SessionTracker,
        cancel: &CancellationToken,
    ) -> SendOutcome {
        if cancel.is_cancelled() {
            tracing::debug!("Dispatcher cancelled before send, dropping message");
            return SendOutcome::Cancelled;
        }

        let backend = Arc::clone(&self.backend);
        let _sending = SendingGuard::enter(&self.state);

        messages.add_message(NewMessage::user(text));
        session.record_message(Sender::User);

        let request = ChatRequest {
            message: text.to_string(),
            agent_id: agent.id.clone().unwrap_or_default(),
            session_id: session.session().id.clone(),
        };

        let metrics = RequestMetrics::start();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Chat request cancelled for session {}", request.session_id);
                metrics.record_failure("cancelled");
                return SendOutcome::Cancelled;
            }
            result = backend.send_chat(&request) => result,
        };

        match result {
            Ok(reply) => {
                let tokens = reply.tokens_used.unwrap_or(0);
                let response_time = metrics.response_time_secs();
                metrics.record_success(tokens);

                let current = session.session();
                let mut response_times = current.response_times.clone();
                response_times.push(response_time);
                let update = SessionUpdate {
                    tokens_used: Some(current.tokens_used.saturating_add(tokens)),
                    response_times: Some(response_times),
                    message_stats: Some(current.message_stats.record(Sender::Ai)),
                };
                session.update_session(update);

                messages.add_message(NewMessage::ai(reply.response));
                tracing::info!(
                    "Reply received in {}s using {} tokens",
                    response_time,
                    tokens
                );
                SendOutcome::Delivered
            }
            Err(e) => {
                tracing::error!("Error sending message: {:#}", e);
                metrics.record_failure("network");
                messages.add_system_message(system_text::NETWORK_ERROR, MessageKind::Error);
                SendOutcome::Failed
            }
        }
    }
}
