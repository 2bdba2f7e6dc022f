//! The interpreter session: one engine, its readiness, and the background
//! listener that drains the engine's message stream.

use std::sync::Arc;

use lesson_core::model::CANVAS_SIZE;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::engine::{Engine, EngineMessage};
use crate::error::EngineError;
use crate::harness::{Evaluation, wrap_source};

/// Readiness of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Starting,
    Ready,
    /// Initialization gave up. The session stays unusable.
    Failed(String),
}

impl SessionStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionStatus::Ready)
    }
}

/// Long-lived handle to the engine.
pub struct InterpreterSession {
    engine: Arc<dyn Engine>,
    config: SessionConfig,
    runtime: Handle,
    status: watch::Sender<SessionStatus>,
}

impl InterpreterSession {
    /// `runtime` is where the listener and detached evaluations run.
    #[must_use]
    pub fn new(engine: Arc<dyn Engine>, config: SessionConfig, runtime: Handle) -> Self {
        let (status, _) = watch::channel(SessionStatus::Starting);
        Self {
            engine,
            config,
            runtime,
            status,
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.borrow().is_ready()
    }

    /// Receiver that observes every status change.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Bootstrap the engine, retrying up to `init_attempts` times.
    ///
    /// Calling this on a ready session is a no-op; on a failed session it
    /// returns the original failure without touching the engine again.
    ///
    /// # Errors
    ///
    /// Returns the last `EngineError` once every attempt has failed.
    pub async fn initialize(&self) -> Result<(), EngineError> {
        match self.status() {
            SessionStatus::Ready => return Ok(()),
            SessionStatus::Failed(reason) => return Err(EngineError::Init(reason)),
            SessionStatus::Starting => {}
        }

        let attempts = self.config.init_attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.engine.init().await {
                Ok(()) => {
                    tracing::info!(attempt, "interpreter session ready");
                    self.status.send_replace(SessionStatus::Ready);
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!(attempt, attempts, error = %err, "engine init failed");
                    last_error = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.init_backoff).await;
                    }
                }
            }
        }

        let err = last_error.unwrap_or_else(|| EngineError::Init("no init attempt made".into()));
        tracing::error!(error = %err, "interpreter session unavailable");
        self.status.send_replace(SessionStatus::Failed(err.to_string()));
        Err(err)
    }

    /// Run `initialize` on the session runtime.
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<Result<(), EngineError>> {
        let session = Arc::clone(self);
        self.runtime.spawn(async move { session.initialize().await })
    }

    /// Evaluate learner code: open the canvas, run the harness-wrapped code,
    /// then close the canvas whether or not the evaluation succeeded.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotReady` before a successful `initialize`,
    /// `EngineError::TimedOut` when `eval_timeout` elapses, or the engine's
    /// own fault.
    pub async fn evaluate(&self, code: &str) -> Result<Evaluation, EngineError> {
        if !self.is_ready() {
            return Err(EngineError::NotReady);
        }

        let Some(limit) = self.config.eval_timeout else {
            return self.evaluate_on_canvas(code).await;
        };

        match tokio::time::timeout(limit, self.evaluate_on_canvas(code)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_secs = limit.as_secs(), "evaluation timed out");
                // The evaluation future was dropped before its teardown ran.
                if let Ok(Err(err)) = tokio::time::timeout(limit, self.engine.close_canvas()).await
                {
                    tracing::warn!(error = %err, "closing canvas after timeout failed");
                }
                Err(EngineError::TimedOut(limit))
            }
        }
    }

    /// Run `evaluate` on the session runtime.
    pub fn spawn_evaluate(
        self: &Arc<Self>,
        code: String,
    ) -> JoinHandle<Result<Evaluation, EngineError>> {
        let session = Arc::clone(self);
        self.runtime.spawn(async move { session.evaluate(&code).await })
    }

    async fn evaluate_on_canvas(&self, code: &str) -> Result<Evaluation, EngineError> {
        self.engine.open_canvas(CANVAS_SIZE, CANVAS_SIZE).await?;
        let result = self.engine.eval(&wrap_source(code)).await;
        if let Err(err) = self.engine.close_canvas().await {
            tracing::warn!(error = %err, "closing canvas failed");
        }
        result.map(|value| Evaluation::new(value.into_text()))
    }

    /// Start the background listener. Messages arrive on the returned
    /// receiver until the handle is shut down (or dropped) or the engine's
    /// stream ends.
    #[must_use]
    pub fn spawn_listener(&self) -> (ListenerHandle, mpsc::UnboundedReceiver<EngineMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let engine = Arc::clone(&self.engine);
        let task = self.runtime.spawn(listen(engine, tx, stop_rx));
        (
            ListenerHandle {
                stop: stop_tx,
                task,
            },
            rx,
        )
    }
}

async fn listen(
    engine: Arc<dyn Engine>,
    tx: mpsc::UnboundedSender<EngineMessage>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut stop => {
                tracing::debug!("listener stopped");
                break;
            }
            message = engine.read() => match message {
                Some(message) => {
                    if tx.send(message).is_err() {
                        tracing::debug!("listener receiver dropped");
                        break;
                    }
                }
                None => {
                    tracing::debug!("engine message stream ended");
                    break;
                }
            }
        }
    }
}

/// Shutdown hook for the background listener. Dropping the handle also
/// stops the listener.
pub struct ListenerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Stop the listener and wait for it to exit.
    pub async fn shutdown(self) {
        let ListenerHandle { stop, task } = self;
        let _ = stop.send(());
        if let Err(err) = task.await {
            tracing::warn!(error = %err, "listener task ended abnormally");
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
