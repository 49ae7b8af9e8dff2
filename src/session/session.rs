use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::score::Score;
use super::state::{Phase, SessionKind, SessionState};
use crate::error::{ClientError, Result};
use crate::socket::{ServerEvent, SocketTransport, TurnMessage};

/// Everything needed to bring a session up after REST creation.
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub session_id: String,
    pub kind: SessionKind,
    /// The server's opening prompt, seeded as the first assistant turn.
    pub opening_prompt: String,
    /// Initial stage label (system-design sessions).
    pub stage: Option<String>,
}

/// A live interview session: one transcript, one socket.
///
/// Server events are pumped from the transport into the state reducer by a
/// background task; the operator-facing operations are `submit_turn`,
/// the end/score transitions, and `dispose`. All state mutation funnels
/// through the reducer behind a single lock, so event application stays
/// serialized in arrival order.
pub struct InterviewSession {
    session_id: String,
    kind: SessionKind,

    /// Reducer state shared with the event pump task.
    state: Arc<Mutex<SessionState>>,

    /// The session's one socket.
    transport: Arc<Mutex<Box<dyn SocketTransport>>>,

    /// Handle for the event pump task.
    pump_task: Mutex<Option<JoinHandle<()>>>,

    /// Set once by `dispose`; a disposed session drops all further events.
    disposed: Arc<AtomicBool>,

    /// Applied events, re-broadcast for display layers.
    updates: broadcast::Sender<ServerEvent>,

    /// Flipped to true when the inbound event channel ends.
    socket_gone: watch::Receiver<bool>,
}

impl InterviewSession {
    /// Open the socket for a freshly created session and start pumping
    /// events into the reducer.
    pub async fn open(seed: SessionSeed, mut transport: Box<dyn SocketTransport>) -> Result<Self> {
        info!(
            "Opening {} session {} over {}",
            seed.kind.as_path(),
            seed.session_id,
            transport.name()
        );

        let mut event_rx = transport.open().await?;

        let mut state = SessionState::new(seed.session_id.clone(), seed.kind, seed.opening_prompt);
        if let Some(stage) = seed.stage {
            state = state.with_stage(stage);
        }

        let state = Arc::new(Mutex::new(state));
        let transport = Arc::new(Mutex::new(transport));
        let disposed = Arc::new(AtomicBool::new(false));
        let (updates_tx, _) = broadcast::channel(256);
        let (gone_tx, gone_rx) = watch::channel(false);

        let pump_state = Arc::clone(&state);
        let pump_transport = Arc::clone(&transport);
        let pump_disposed = Arc::clone(&disposed);
        let pump_updates = updates_tx.clone();

        let pump = tokio::spawn(async move {
            info!("Session event task started");

            while let Some(event) = event_rx.recv().await {
                if pump_disposed.load(Ordering::SeqCst) {
                    break;
                }

                let ended = {
                    let mut state = pump_state.lock().await;
                    state.apply(event.clone());
                    state.phase == Phase::Ended
                };

                // Subscribers observe the event only after it took effect.
                let _ = pump_updates.send(event);

                if ended {
                    // The socket is meaningless once the session ended.
                    if let Err(e) = pump_transport.lock().await.close().await {
                        warn!("Failed to close socket after session end: {}", e);
                    }
                    break;
                }
            }

            if !pump_disposed.load(Ordering::SeqCst) {
                pump_state.lock().await.transport_lost();
            }
            let _ = gone_tx.send(true);

            info!("Session event task stopped");
        });

        Ok(Self {
            session_id: seed.session_id,
            kind: seed.kind,
            state,
            transport,
            pump_task: Mutex::new(Some(pump)),
            disposed,
            updates: updates_tx,
            socket_gone: gone_rx,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Subscribe to events as they are applied. Display layers use this to
    /// render streaming chunks live.
    pub fn updates(&self) -> broadcast::Receiver<ServerEvent> {
        self.updates.subscribe()
    }

    /// A point-in-time copy of the session state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Submit an operator turn with an optional code attachment.
    ///
    /// Returns `Ok(false)` without sending anything when a turn cannot be
    /// accepted right now: an assistant turn is still streaming, the input
    /// is blank, or the session already ended.
    pub async fn submit_turn(&self, text: &str, code: Option<String>) -> Result<bool> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(ClientError::Disposed);
        }

        {
            let mut state = self.state.lock().await;
            if !state.can_submit(text) {
                warn!(
                    session_id = %self.session_id,
                    "turn rejected (streaming, blank input, or session over)"
                );
                return Ok(false);
            }
            state.push_user_turn(text);
        }

        let turn = TurnMessage {
            content: text.to_string(),
            code,
        };
        self.transport.lock().await.send_turn(&turn).await?;

        Ok(true)
    }

    /// Terminate over the socket (workplace sessions): send the end frame,
    /// then wait for the server's evaluation to land in the reducer.
    ///
    /// Idempotent after success. If the socket dies before the evaluation
    /// arrives the session keeps no score and the call fails; the operator
    /// may retry.
    pub async fn end_via_socket(&self) -> Result<Score> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(ClientError::Disposed);
        }

        if let Some(score) = self.state.lock().await.score.clone() {
            return Ok(score);
        }

        // Subscribe before sending so the evaluation cannot slip past us.
        let mut updates = self.updates.subscribe();
        let mut socket_gone = self.socket_gone.clone();

        self.transport.lock().await.send_end().await?;

        loop {
            if *socket_gone.borrow() {
                return Err(ClientError::Transport(
                    "socket closed before the evaluation arrived".to_string(),
                ));
            }

            tokio::select! {
                event = updates.recv() => match event {
                    Ok(ServerEvent::SessionComplete { .. }) => break,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Missed {} session events while waiting for evaluation", skipped);
                        // The evaluation may be among the skipped; check state.
                        if self.state.lock().await.score.is_some() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(ClientError::Transport(
                            "session closed before the evaluation arrived".to_string(),
                        ));
                    }
                },
                _ = socket_gone.changed() => continue,
            }
        }

        self.state.lock().await.score.clone().ok_or_else(|| {
            ClientError::Termination("evaluation payload could not be decoded".to_string())
        })
    }

    /// Attach a score obtained out of band (the REST end endpoint) and
    /// transition to ended. The first score sticks; later calls get the
    /// stored one back. Closes the socket either way.
    pub async fn finish_with(&self, score: Score) -> Score {
        let stored = {
            let mut state = self.state.lock().await;
            if state.score.is_none() {
                state.set_score(score.clone());
            }
            state.score.clone().unwrap_or(score)
        };

        if let Err(e) = self.transport.lock().await.close().await {
            warn!("Failed to close socket after scoring: {}", e);
        }

        stored
    }

    /// Current score, if the session has been evaluated.
    pub async fn score(&self) -> Option<Score> {
        self.state.lock().await.score.clone()
    }

    /// Close the socket and discard the session. Idempotent; any socket
    /// events still in flight are silently dropped.
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Disposing session {}", self.session_id);

        if let Err(e) = self.transport.lock().await.close().await {
            warn!("Failed to close socket on dispose: {}", e);
        }

        // The transport close may be asynchronous; stop the pump rather
        // than wait for the channel to drain so late events are dropped.
        let task = self.pump_task.lock().await.take();
        if let Some(task) = task {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Session event task panicked: {}", e);
                }
            }
        }
    }
}
