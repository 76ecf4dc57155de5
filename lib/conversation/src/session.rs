//! Chat session runtime.
//!
//! A [`ChatSession`] ties the conversation state, the responder and the
//! escalation state machine together, runs delayed replies on a
//! [`DelayScheduler`], and publishes every appended message on a
//! [`MessageFeed`] for the presentation layer to render.
//!
//! State lives behind a mutex that is never held across an await. Delayed
//! jobs re-check the `closed` flag under that mutex before touching state,
//! so nothing is appended once [`ChatSession::close`] has started.
//!
//! Delayed work is booked before any state is committed. If booking fails
//! the operation returns [`SessionError::Scheduling`] and the session is
//! exactly as it was.

use crate::agent::{AgentSession, LiveAgentConnector};
use crate::callback;
use crate::config::ChatConfig;
use crate::error::{EscalationError, SessionError};
use crate::escalation::{self, EscalationEffect, EscalationEvent, EscalationState};
use crate::message::Message;
use crate::responder::Responder;
use crate::script;
use crate::state::{self, ConversationState};
use helpdesk_core::{Result, SessionId};
use helpdesk_scheduler::{DelayScheduler, ScheduleError, ScheduledTask, ShutdownReport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What a live-agent request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// A connection attempt was started.
    Connecting,
    /// A connection attempt is already under way; nothing changed.
    AlreadyConnecting,
    /// A live agent is already connected; nothing changed.
    AlreadyConnected,
}

/// Stream of messages appended to a session, in transcript order.
#[derive(Debug)]
pub struct MessageFeed {
    rx: mpsc::UnboundedReceiver<Message>,
}

impl MessageFeed {
    /// Waits for the next message. Returns `None` once the session and all
    /// of its delayed tasks are gone.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Returns the next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }
}

/// A single user's support conversation.
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: SessionId,
    config: ChatConfig,
    responder: Responder,
    connector: Arc<dyn LiveAgentConnector>,
    scheduler: DelayScheduler,
    feed: mpsc::UnboundedSender<Message>,
    shared: Mutex<Shared>,
}

struct Shared {
    state: ConversationState,
    escalation: EscalationState,
    agent: Option<AgentSession>,
    closed: bool,
}

impl ChatSession {
    /// Starts a session for `user_name` and appends the welcome message.
    #[must_use]
    pub fn start(
        user_name: impl Into<String>,
        config: ChatConfig,
        connector: Arc<dyn LiveAgentConnector>,
    ) -> (Self, MessageFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state =
            ConversationState::new(user_name).with_support_name(config.support_name.clone());
        let inner = SessionInner {
            id: SessionId::new(),
            responder: Responder::helpdesk(config.agent_reply_delay()),
            config,
            connector,
            scheduler: DelayScheduler::new(),
            feed: tx,
            shared: Mutex::new(Shared {
                state,
                escalation: EscalationState::Bot,
                agent: None,
                closed: false,
            }),
        };

        {
            let mut shared = inner.lock();
            info!(session = %inner.id, user = shared.state.user_name(), "chat session started");
            inner.append_system(&mut shared, script::WELCOME);
        }

        (
            Self {
                inner: Arc::new(inner),
            },
            MessageFeed { rx },
        )
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    /// Handles a message typed by the user.
    ///
    /// Returns the messages appended right away: the user's entry followed
    /// by any immediate replies. Deferred replies arrive later on the feed.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::Input`] for blank text,
    /// [`SessionError::Scheduling`] if a deferred reply cannot be booked and
    /// [`SessionError::Closed`] after [`Self::close`]. Nothing is appended
    /// on failure.
    pub fn submit(&self, text: &str) -> Result<Vec<Message>, SessionError> {
        let inner = &self.inner;
        let mut shared = inner.lock_open()?;
        let body = state::user_message_body(text).map_err(SessionError::from)?;

        let replies = inner.responder.respond(body, &shared.state);
        let mut booked: Vec<ScheduledTask> = Vec::new();
        for reply in &replies {
            let Some(delay) = reply.delay else { continue };
            match inner.schedule_reply(reply.text.clone(), delay) {
                Ok(task) => booked.push(task),
                Err(e) => {
                    for task in &booked {
                        debug!(
                            session = %inner.id,
                            task = %task.id(),
                            label = task.label(),
                            "withdrawing booked reply"
                        );
                        task.cancel();
                    }
                    return Err(SessionError::from(e).into());
                }
            }
        }

        let user_message = shared
            .state
            .append_user_message(body)
            .map_err(SessionError::from)?;
        inner.publish(&user_message);
        let mut appended = vec![user_message];
        for reply in replies.into_iter().filter(|r| r.delay.is_none()) {
            appended.push(inner.append_system(&mut shared, reply.text));
        }
        Ok(appended)
    }

    /// Asks for a live agent.
    ///
    /// Only the first request starts a connection; repeats while connecting
    /// or connected are reported and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::Scheduling`] if the connection attempt
    /// cannot be booked, leaving the state at `Bot`, and with
    /// [`SessionError::Closed`] after [`Self::close`].
    pub fn request_live_agent(&self) -> Result<EscalationOutcome, SessionError> {
        let inner = &self.inner;
        let mut shared = inner.lock_open()?;

        let transition = match escalation::transition(
            shared.escalation,
            EscalationEvent::AgentRequested,
            inner.config.connect_delay(),
        ) {
            Ok(t) => t,
            Err(EscalationError::AlreadyConnecting) => {
                debug!(session = %inner.id, "live agent already connecting");
                return Ok(EscalationOutcome::AlreadyConnecting);
            }
            Err(EscalationError::AlreadyConnected) => {
                debug!(session = %inner.id, "live agent already connected");
                return Ok(EscalationOutcome::AlreadyConnected);
            }
            Err(e) => return Err(SessionError::from(e).into()),
        };

        Arc::clone(inner).apply(&mut shared, transition)?;
        Ok(EscalationOutcome::Connecting)
    }

    /// Records a callback request.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::Input`] for a blank number and
    /// [`SessionError::Closed`] after [`Self::close`].
    pub fn request_callback(&self, phone_number: &str) -> Result<Message, SessionError> {
        let inner = &self.inner;
        let mut shared = inner.lock_open()?;
        let message =
            callback::request_callback(&mut shared.state, phone_number).map_err(SessionError::from)?;
        inner.publish(&message);
        info!(session = %inner.id, "callback requested");
        Ok(message)
    }

    /// Display name of the user.
    #[must_use]
    pub fn user_name(&self) -> String {
        self.inner.lock().state.user_name().to_string()
    }

    /// Returns true once a live agent has connected.
    #[must_use]
    pub fn is_escalated(&self) -> bool {
        self.inner.lock().state.is_escalated()
    }

    /// Current escalation state.
    #[must_use]
    pub fn escalation_state(&self) -> EscalationState {
        self.inner.lock().escalation
    }

    /// The connected agent session, if any.
    #[must_use]
    pub fn agent_session(&self) -> Option<AgentSession> {
        self.inner.lock().agent.clone()
    }

    /// A copy of the transcript so far.
    #[must_use]
    pub fn transcript(&self) -> Vec<Message> {
        self.inner.lock().state.transcript().to_vec()
    }

    /// Returns true after [`Self::close`].
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Ends the session: refuses further input, cancels every pending
    /// delayed reply or connection, and waits for them to finish.
    pub async fn close(&self) -> ShutdownReport {
        {
            let mut shared = self.inner.lock();
            if !shared.closed {
                shared.closed = true;
                info!(
                    session = %self.inner.id,
                    messages = shared.state.len(),
                    "chat session closed"
                );
            }
        }
        self.inner.scheduler.shutdown().await
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.inner.lock().closed = true;
        self.inner.scheduler.cancel_all();
    }
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_open(&self) -> Result<MutexGuard<'_, Shared>, SessionError> {
        let shared = self.lock();
        if shared.closed {
            return Err(SessionError::Closed { id: self.id }.into());
        }
        Ok(shared)
    }

    fn publish(&self, message: &Message) {
        if self.feed.send(message.clone()).is_err() {
            debug!(session = %self.id, "message feed receiver dropped");
        }
    }

    fn append_system(&self, shared: &mut Shared, text: impl Into<String>) -> Message {
        let message = shared.state.append_system_message(text);
        self.publish(&message);
        message
    }

    fn schedule_reply(
        self: &Arc<Self>,
        text: String,
        delay: Duration,
    ) -> std::result::Result<ScheduledTask, ScheduleError> {
        let inner = Arc::clone(self);
        self.scheduler.schedule("agent_reply", delay, async move {
            let mut shared = inner.lock();
            if shared.closed {
                debug!(session = %inner.id, "session closed, dropping delayed reply");
                return;
            }
            inner.append_system(&mut shared, text);
        })
    }

    fn apply(
        self: Arc<Self>,
        shared: &mut Shared,
        transition: escalation::Transition,
    ) -> Result<(), SessionError> {
        // The caller holds the state lock, so a booked connect cannot run
        // before the transition below is committed.
        for effect in &transition.effects {
            if let EscalationEffect::ScheduleConnect { delay } = effect {
                let inner = Arc::clone(&self);
                self.scheduler
                    .schedule("live_agent_connect", *delay, async move {
                        inner.connect().await;
                    })
                    .map_err(SessionError::from)?;
            }
        }

        debug!(
            session = %self.id,
            from = %shared.escalation,
            to = %transition.new_state,
            "escalation transition"
        );
        shared.escalation = transition.new_state;

        for effect in transition.effects {
            match effect {
                EscalationEffect::Notify { text } => {
                    self.append_system(shared, text);
                }
                EscalationEffect::MarkEscalated => {
                    shared.state.escalate();
                }
                EscalationEffect::ScheduleConnect { .. } => {}
            }
        }
        Ok(())
    }

    async fn connect(self: Arc<Self>) {
        let (event, agent) = match self.connector.connect().await {
            Ok(agent) => (EscalationEvent::Connected, Some(agent)),
            Err(e) => {
                warn!(session = %self.id, error = %e, "live agent connection failed");
                (EscalationEvent::ConnectFailed { reason: e.to_string() }, None)
            }
        };

        let mut shared = self.lock();
        if shared.closed {
            debug!(session = %self.id, "session closed, dropping connection result");
            return;
        }
        let transition = match escalation::transition(
            shared.escalation,
            event,
            self.config.connect_delay(),
        ) {
            Ok(t) => t,
            Err(e) => {
                warn!(session = %self.id, error = %e, "unexpected escalation event");
                return;
            }
        };
        if transition.new_state == EscalationState::LiveAgent {
            shared.agent = agent;
            info!(session = %self.id, "live agent connected");
        }
        if let Err(e) = Arc::clone(&self).apply(&mut shared, transition) {
            warn!(session = %self.id, error = %e, "failed to apply escalation effects");
        }
    }
}
