//! The boundary to the external R engine.

use async_trait::async_trait;
use lesson_core::model::Bitmap;

use crate::error::EngineError;

mod rprocess;
mod scripted;

pub use rprocess::RProcessEngine;
pub use scripted::{EngineCall, ScriptedEngine};

/// Structured value returned by `Engine::eval`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalValue {
    Character(Vec<String>),
    Null,
}

impl EvalValue {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Character(vec![text.into()])
    }

    /// First element of a character result, or an empty string.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            EvalValue::Character(values) => values.into_iter().next().unwrap_or_default(),
            EvalValue::Null => String::new(),
        }
    }
}

/// Graphics device notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasEvent {
    NewPage,
    ImageReady(Bitmap),
}

/// Out-of-band messages the engine emits independently of `eval`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineMessage {
    Stdout(String),
    Stderr(String),
    Canvas(CanvasEvent),
}

/// An R engine. Implementations must tolerate `read` being awaited
/// concurrently with the other methods.
#[async_trait]
pub trait Engine: Send + Sync {
    /// One-time bootstrap. May be called again after a failure.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Init` if the engine cannot start.
    async fn init(&self) -> Result<(), EngineError>;

    /// Evaluate R source and return its value.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` for engine faults. Errors raised by the code
    /// itself also surface here unless the code traps them.
    async fn eval(&self, code: &str) -> Result<EvalValue, EngineError>;

    /// Open a graphics surface of the given size for the next evaluation.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the device cannot be opened.
    async fn open_canvas(&self, width: u32, height: u32) -> Result<(), EngineError>;

    /// Close the surface opened by `open_canvas`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the device cannot be closed.
    async fn close_canvas(&self) -> Result<(), EngineError>;

    /// Wait for the next out-of-band message. `None` once the stream is closed.
    async fn read(&self) -> Option<EngineMessage>;
}
