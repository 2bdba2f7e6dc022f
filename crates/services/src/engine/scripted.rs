use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Engine, EngineMessage, EvalValue};
use crate::error::EngineError;

/// A call recorded by `ScriptedEngine`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCall {
    Init,
    OpenCanvas { width: u32, height: u32 },
    Eval(String),
    CloseCanvas,
}

/// Deterministic engine for tests and prototyping.
///
/// Evaluations pop queued responses in order; with an empty queue they
/// return an empty string. Messages pushed with `emit` come out of `read`.
pub struct ScriptedEngine {
    init_failures: AtomicU32,
    responses: Mutex<VecDeque<Result<EvalValue, EngineError>>>,
    canvas_failure: Mutex<Option<EngineError>>,
    calls: Mutex<Vec<EngineCall>>,
    eval_delay: Option<Duration>,
    sender: Mutex<Option<mpsc::UnboundedSender<EngineMessage>>>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<EngineMessage>>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            init_failures: AtomicU32::new(0),
            responses: Mutex::new(VecDeque::new()),
            canvas_failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            eval_delay: None,
            sender: Mutex::new(Some(sender)),
            receiver: tokio::sync::Mutex::new(receiver),
        }
    }

    /// Fail the first `count` calls to `init`.
    #[must_use]
    pub fn with_init_failures(self, count: u32) -> Self {
        self.init_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Sleep this long inside every `eval`.
    #[must_use]
    pub fn with_eval_delay(mut self, delay: Duration) -> Self {
        self.eval_delay = Some(delay);
        self
    }

    /// Queue the text the next harness evaluation returns.
    pub fn respond_with(&self, text: impl Into<String>) {
        self.push_response(Ok(EvalValue::text(text)));
    }

    pub fn push_response(&self, response: Result<EvalValue, EngineError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Make the next `open_canvas` fail with `error`.
    pub fn fail_canvas_with(&self, error: EngineError) {
        if let Ok(mut slot) = self.canvas_failure.lock() {
            *slot = Some(error);
        }
    }

    /// Push an out-of-band message. Ignored once the stream is closed.
    pub fn emit(&self, message: EngineMessage) {
        if let Ok(guard) = self.sender.lock() {
            if let Some(sender) = guard.as_ref() {
                let _ = sender.send(message);
            }
        }
    }

    /// Close the message stream; `read` returns `None` once drained.
    pub fn close_stream(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: EngineCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn init(&self) -> Result<(), EngineError> {
        self.record(EngineCall::Init);
        let remaining = self.init_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.init_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(EngineError::Init("scripted init failure".into()));
        }
        Ok(())
    }

    async fn eval(&self, code: &str) -> Result<EvalValue, EngineError> {
        self.record(EngineCall::Eval(code.to_string()));
        if let Some(delay) = self.eval_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        next.unwrap_or_else(|| Ok(EvalValue::text("")))
    }

    async fn open_canvas(&self, width: u32, height: u32) -> Result<(), EngineError> {
        self.record(EngineCall::OpenCanvas { width, height });
        let failure = self.canvas_failure.lock().ok().and_then(|mut slot| slot.take());
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn close_canvas(&self) -> Result<(), EngineError> {
        self.record(EngineCall::CloseCanvas);
        Ok(())
    }

    async fn read(&self) -> Option<EngineMessage> {
        self.receiver.lock().await.recv().await
    }
}
