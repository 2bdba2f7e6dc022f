#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod engine;
pub mod error;
pub mod harness;
pub mod orchestrator;
pub mod progress_store;
pub mod session;
pub mod workflow;

pub use lesson_core::Clock;

pub use app_services::AppServices;
pub use config::SessionConfig;
pub use engine::{CanvasEvent, Engine, EngineMessage, EvalValue};
pub use error::{AppServicesError, EngineError};
pub use harness::Evaluation;
pub use orchestrator::{Orchestrator, RunOutcome, RunReport, RunTicket};
pub use progress_store::ProgressStore;
pub use session::{InterpreterSession, ListenerHandle, SessionStatus};
