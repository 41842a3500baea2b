//! Message pipeline orchestrator.
//!
//! Each session runs its own small state machine:
//!
//! ```text
//! Idle -> Sending -> (CrisisOverride | ProviderCall) -> PostProcess -> Idle
//! ```
//!
//! Crisis messages and the bare "help" command never reach the completion
//! provider. Provider failures fall back to a canned reply, so every accepted
//! submission ends with an assistant message appended to the store.

use crate::context_builder::ContextBuilder;
use crate::post_processor::ResponsePostProcessor;
use crate::responses::{CRISIS_RESPONSE, HELP_TEXT, fallback_text, is_help_command, rotation_text};
use crate::session_store::{Mutation, PersistenceFailure, SessionStore};
use solace_core::TopicKey;
use solace_core::config::PipelineSettings;
use solace_core::provider::CompletionProvider;
use solace_core::safety::{CrisisClassifier, ResourceMatcher};
use solace_core::session::{Message, Session};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use thiserror::Error;
use tokio::sync::Mutex;

/// Where a submission currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum PipelineState {
    Idle,
    Sending,
    CrisisOverride,
    ProviderCall,
    PostProcess,
}

/// Which branch produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ReplyRoute {
    Crisis,
    Help,
    Provider,
    Fallback,
}

/// Non-fatal problems the UI may show as a transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ProviderUnavailable { message: String },
    PersistenceFailed { message: String },
}

impl From<PersistenceFailure> for Notice {
    fn from(failure: PersistenceFailure) -> Self {
        Notice::PersistenceFailed {
            message: failure.message,
        }
    }
}

/// A completed submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub session_id: String,
    pub user_message: Message,
    pub reply: Message,
    pub route: ReplyRoute,
    pub notices: Vec<Notice>,
}

/// An assistant message added without a user turn ("another resource").
#[derive(Debug, Clone, PartialEq)]
pub struct RotateOutcome {
    pub session_id: String,
    pub reply: Message,
    pub notices: Vec<Notice>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Session '{0}' is already waiting for a reply")]
    AlreadySending(String),

    #[error("Session '{0}' does not exist")]
    UnknownSession(String),

    /// The session was deleted while its reply was in flight; nothing was stored.
    #[error("Session '{0}' was deleted before the reply arrived")]
    SessionGone(String),
}

type StateMap = StdMutex<HashMap<String, PipelineState>>;

/// Holds a session's slot in the state map; the session returns to `Idle`
/// when dropped, including when the submit future is cancelled.
struct InFlight<'a> {
    states: &'a StateMap,
    session_id: String,
}

impl<'a> InFlight<'a> {
    fn begin(states: &'a StateMap, session_id: &str) -> Result<Self, SubmitRejection> {
        let mut map = states.lock().unwrap_or_else(|e| e.into_inner());
        if map.contains_key(session_id) {
            return Err(SubmitRejection::AlreadySending(session_id.to_string()));
        }
        map.insert(session_id.to_string(), PipelineState::Sending);
        Ok(Self {
            states,
            session_id: session_id.to_string(),
        })
    }

    fn advance(&self, state: PipelineState) {
        let mut map = self.states.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(self.session_id.clone(), state);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.states.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&self.session_id);
    }
}

pub struct PipelineOrchestrator {
    store: Mutex<SessionStore>,
    provider: Arc<dyn CompletionProvider>,
    classifier: CrisisClassifier,
    matcher: ResourceMatcher,
    context_builder: ContextBuilder,
    post_processor: ResponsePostProcessor,
    /// Sessions not listed are `Idle`.
    states: StateMap,
}

impl PipelineOrchestrator {
    pub fn new(store: SessionStore, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            store: Mutex::new(store),
            provider,
            classifier: CrisisClassifier::new(),
            matcher: ResourceMatcher::new(),
            context_builder: ContextBuilder::default(),
            post_processor: ResponsePostProcessor::new(),
            states: StdMutex::new(HashMap::new()),
        }
    }

    pub fn with_settings(mut self, settings: &PipelineSettings) -> Self {
        self.context_builder = ContextBuilder::new(settings.history_window);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn state_of(&self, session_id: &str) -> PipelineState {
        let map = self.states.lock().unwrap_or_else(|e| e.into_inner());
        map.get(session_id).copied().unwrap_or(PipelineState::Idle)
    }

    /// Submits to the active session.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, SubmitRejection> {
        let session_id = self.store.lock().await.active_id().to_string();
        self.submit_to(&session_id, text).await
    }

    pub async fn submit_to(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<SubmitOutcome, SubmitRejection> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitRejection::EmptyMessage);
        }

        // Claim the session before snapshotting it, so the snapshot includes
        // any exchange that finished just before this submit
        let in_flight = InFlight::begin(&self.states, session_id)?;

        // The store lock is not held across the provider call
        let session = self
            .store
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SubmitRejection::UnknownSession(session_id.to_string()))?;
        let mut notices = Vec::new();

        let (reply_text, topic, route) = if self.classifier.classify(text) {
            in_flight.advance(PipelineState::CrisisOverride);
            // Never log the text itself
            tracing::info!(
                "[Pipeline] Crisis route for session {} ({} chars)",
                session_id,
                text.chars().count()
            );
            (CRISIS_RESPONSE.to_string(), TopicKey::Crisis, ReplyRoute::Crisis)
        } else if is_help_command(text) {
            in_flight.advance(PipelineState::CrisisOverride);
            tracing::info!("[Pipeline] Help command in session {}", session_id);
            (
                HELP_TEXT.to_string(),
                TopicKey::GeneralResources,
                ReplyRoute::Help,
            )
        } else {
            in_flight.advance(PipelineState::ProviderCall);
            let topic = self.matcher.match_topic(text);
            let request = self.context_builder.build(&session, text);
            tracing::debug!(
                "[Pipeline] Calling {} with {} turns (topic: {})",
                self.provider.name(),
                request.turns.len(),
                topic
            );
            match self.provider.complete(&request).await {
                Ok(reply) => (reply, topic, ReplyRoute::Provider),
                Err(e) => {
                    tracing::warn!(
                        "[Pipeline] {} failed, using fallback: {}",
                        self.provider.name(),
                        e
                    );
                    notices.push(Notice::ProviderUnavailable {
                        message: e.to_string(),
                    });
                    (fallback_text(topic), topic, ReplyRoute::Fallback)
                }
            }
        };

        in_flight.advance(PipelineState::PostProcess);
        let mut store = self.store.lock().await;
        let Some(current) = store.get(session_id) else {
            tracing::info!(
                "[Pipeline] Session {} deleted while waiting, discarding reply",
                session_id
            );
            return Err(SubmitRejection::SessionGone(session_id.to_string()));
        };

        let reply = match route {
            ReplyRoute::Provider => {
                self.post_processor
                    .process_provider_text(&reply_text, current, topic)
            }
            _ => self.post_processor.process_canned_text(&reply_text, topic),
        };
        let user_message = Message::user(text);

        let appended =
            store.append_messages(session_id, vec![user_message.clone(), reply.clone()]);
        notices.extend(appended.persistence.map(Notice::from));
        drop(store);
        drop(in_flight);

        tracing::info!(
            "[Pipeline] Replied in session {} via {} (topic: {})",
            session_id,
            route,
            topic
        );

        Ok(SubmitOutcome {
            session_id: session_id.to_string(),
            user_message,
            reply,
            route,
            notices,
        })
    }

    /// Appends an assistant message citing the topic after `current` in the
    /// rotation order, in the active session. Never calls the provider.
    pub async fn rotate_resource(
        &self,
        current: TopicKey,
    ) -> Result<RotateOutcome, SubmitRejection> {
        let mut store = self.store.lock().await;
        let session_id = store.active_id().to_string();
        if self.state_of(&session_id) != PipelineState::Idle {
            return Err(SubmitRejection::AlreadySending(session_id));
        }

        let next = current.next_in_rotation();
        let reply = self
            .post_processor
            .process_canned_text(&rotation_text(next), next);
        let appended = store.append_messages(&session_id, vec![reply.clone()]);
        tracing::debug!("[Pipeline] Rotated resource {} -> {}", current, next);

        Ok(RotateOutcome {
            session_id,
            reply,
            notices: appended.persistence.map(Notice::from).into_iter().collect(),
        })
    }

    pub async fn create_session(&self) -> Mutation<Session> {
        self.store.lock().await.create_session()
    }

    pub async fn rename_session(&self, session_id: &str, title: &str) -> Mutation<bool> {
        self.store.lock().await.rename_session(session_id, title)
    }

    pub async fn delete_session(&self, session_id: &str) -> Mutation<bool> {
        self.store.lock().await.delete_session(session_id)
    }

    pub async fn select_session(&self, session_id: &str) -> Mutation<bool> {
        self.store.lock().await.set_active(session_id)
    }

    /// Sessions for display, most recently active first.
    pub async fn sessions(&self) -> Vec<Session> {
        self.store.lock().await.list().into_iter().cloned().collect()
    }

    pub async fn active_session(&self) -> Session {
        self.store.lock().await.active().clone()
    }

    pub async fn session(&self, session_id: &str) -> Option<Session> {
        self.store.lock().await.get(session_id).cloned()
    }
}
