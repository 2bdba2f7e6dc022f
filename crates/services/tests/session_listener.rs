use std::sync::Arc;
use std::time::Duration;

use lesson_core::model::{Bitmap, LogKind, Progress};
use lesson_core::model::curriculum::r_basics;
use lesson_core::time::fixed_clock;
use services::engine::{EngineCall, ScriptedEngine};
use services::{
    CanvasEvent, EngineError, EngineMessage, InterpreterSession, Orchestrator, SessionConfig,
    SessionStatus,
};
use tokio::runtime::Handle;

fn session(engine: Arc<ScriptedEngine>, config: SessionConfig) -> Arc<InterpreterSession> {
    Arc::new(InterpreterSession::new(engine, config, Handle::current()))
}

#[tokio::test(start_paused = true)]
async fn init_retries_then_becomes_ready() {
    let engine = Arc::new(ScriptedEngine::new().with_init_failures(2));
    let session = session(engine.clone(), SessionConfig::default());
    assert_eq!(session.status(), SessionStatus::Starting);

    session.initialize().await.unwrap();

    assert!(session.is_ready());
    let inits = engine.calls().iter().filter(|c| **c == EngineCall::Init).count();
    assert_eq!(inits, 3);
}

#[tokio::test(start_paused = true)]
async fn init_gives_up_after_configured_attempts() {
    let engine = Arc::new(ScriptedEngine::new().with_init_failures(10));
    let session = session(engine.clone(), SessionConfig::default().with_init_attempts(2));
    let mut status = session.watch_status();

    let err = session.spawn_initialize().await.unwrap().unwrap_err();
    assert!(matches!(err, EngineError::Init(_)));
    assert!(matches!(session.status(), SessionStatus::Failed(_)));
    assert!(status.has_changed().unwrap());
    assert!(matches!(*status.borrow_and_update(), SessionStatus::Failed(_)));

    // A failed session does not retry on its own.
    assert!(session.initialize().await.is_err());
    assert_eq!(engine.calls().len(), 2);
    assert!(matches!(session.evaluate("1").await, Err(EngineError::NotReady)));
}

#[tokio::test]
async fn evaluate_opens_and_closes_the_canvas_around_wrapped_code() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.respond_with("[1] 2");
    let session = session(engine.clone(), SessionConfig::default());
    session.initialize().await.unwrap();

    let evaluation = session.spawn_evaluate("1 + 1".into()).await.unwrap().unwrap();

    assert_eq!(evaluation.text(), "[1] 2");
    let calls = engine.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[1], EngineCall::OpenCanvas { width: 500, height: 500 });
    match &calls[2] {
        EngineCall::Eval(source) => assert!(source.contains(r#"parse(text = "1 + 1")"#)),
        other => panic!("unexpected call {other:?}"),
    }
    assert_eq!(calls[3], EngineCall::CloseCanvas);
}

#[tokio::test]
async fn canvas_open_failure_skips_evaluation() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.fail_canvas_with(EngineError::Evaluation("no device".into()));
    let session = session(engine.clone(), SessionConfig::default());
    session.initialize().await.unwrap();

    let err = session.evaluate("plot(1)").await.unwrap_err();

    assert_eq!(err.to_string(), "no device");
    assert!(!engine.calls().iter().any(|c| matches!(c, EngineCall::Eval(_))));
}

#[tokio::test]
async fn listener_forwards_messages_until_shutdown() {
    let engine = Arc::new(ScriptedEngine::new());
    let session = session(engine.clone(), SessionConfig::default());
    let (handle, mut rx) = session.spawn_listener();

    engine.emit(EngineMessage::Stdout("hello".into()));
    engine.emit(EngineMessage::Stderr("warning".into()));
    assert_eq!(rx.recv().await, Some(EngineMessage::Stdout("hello".into())));
    assert_eq!(rx.recv().await, Some(EngineMessage::Stderr("warning".into())));
    assert!(!handle.is_finished());

    handle.shutdown().await;
    engine.emit(EngineMessage::Stdout("late".into()));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn dropping_the_handle_stops_the_listener() {
    let engine = Arc::new(ScriptedEngine::new());
    let session = session(engine.clone(), SessionConfig::default());
    let (handle, mut rx) = session.spawn_listener();

    drop(handle);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn listener_ends_with_the_engine_stream() {
    let engine = Arc::new(ScriptedEngine::new());
    let session = session(engine.clone(), SessionConfig::default());
    let (handle, mut rx) = session.spawn_listener();

    engine.close_stream();
    assert_eq!(rx.recv().await, None);
    tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
        .await
        .unwrap();
}

#[tokio::test]
async fn listener_messages_land_in_console_and_canvas() {
    let engine = Arc::new(ScriptedEngine::new());
    let session = session(engine.clone(), SessionConfig::default());
    let catalog = Arc::new(r_basics().unwrap());
    let mut orch = Orchestrator::new(catalog, session.clone(), Progress::new(), fixed_clock());
    let (handle, mut rx) = session.spawn_listener();

    engine.emit(EngineMessage::Canvas(CanvasEvent::ImageReady(Bitmap::filled(
        4,
        4,
        [0, 0, 255, 255],
    ))));
    engine.emit(EngineMessage::Stderr("Warning message".into()));
    engine.close_stream();
    while let Some(message) = rx.recv().await {
        orch.apply_message(message);
    }
    assert!(orch.canvas().has_drawing());
    assert_eq!(orch.canvas().surface().pixel(3, 3), Some([0, 0, 255, 255]));
    assert_eq!(orch.transcript().last().unwrap().kind(), LogKind::Error);

    orch.apply_message(EngineMessage::Canvas(CanvasEvent::NewPage));
    assert!(!orch.canvas().has_drawing());
    orch.apply_message(EngineMessage::Stdout("[1] 3".into()));
    assert_eq!(orch.transcript().last().unwrap().kind(), LogKind::Output);

    handle.shutdown().await;
}
