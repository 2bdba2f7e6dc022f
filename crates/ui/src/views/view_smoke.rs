use std::sync::Arc;

use async_trait::async_trait;
use dioxus::prelude::*;
use lesson_core::model::{ActiveView, Bitmap, LessonId, LogEntry, LogKind, Transcript};
use lesson_core::time::fixed_now;
use services::{CanvasEvent, EngineMessage};
use storage::codec::PROGRESS_KEY;
use storage::repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};

use super::test_harness::{HarnessOptions, drive_dom, setup_view_harness};
use super::output::{GraphicsPaneProps, LogViewerProps};
use super::{GraphicsPane, LessonPane, LogViewer};
use crate::vm::{LessonVm, map_log_lines};

const LOADED: &str = "lesson-title";

#[tokio::test(flavor = "current_thread")]
async fn workspace_renders_first_lesson_when_ready() {
    let mut harness = setup_view_harness(HarnessOptions::default()).await;
    harness.rebuild();
    let html = harness.drive_until(|html| html.contains(LOADED)).await;

    assert!(html.contains("Variables"), "missing lesson title in {html}");
    assert!(html.contains("R engine ready"), "missing badge in {html}");
    assert!(html.contains("0 / 20 lessons"), "missing progress in {html}");
    assert!(html.contains("# Write your R code here..."), "missing placeholder in {html}");
    assert!(html.contains("Reset progress"), "missing reset in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn workspace_resumes_after_saved_progress() {
    let storage = Storage::in_memory();
    storage.kv.set(PROGRESS_KEY, "[1,2]").await.unwrap();
    let mut harness = setup_view_harness(HarnessOptions {
        storage,
        ..HarnessOptions::default()
    })
    .await;
    harness.rebuild();
    let html = harness.drive_until(|html| html.contains(LOADED)).await;

    assert!(html.contains("Arithmetic"), "missing lesson 3 in {html}");
    assert!(html.contains("10%"), "missing percent in {html}");
    assert!(html.contains("nav-row nav-completed"), "missing completed rows in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn workspace_shows_loading_badge_before_engine_is_ready() {
    let mut harness = setup_view_harness(HarnessOptions {
        initialize: false,
        ..HarnessOptions::default()
    })
    .await;
    harness.rebuild();
    let html = harness.drive_until(|html| html.contains(LOADED)).await;

    assert!(html.contains("Loading R engine..."), "missing loading badge in {html}");
}

struct FailingProgressRepo;

#[async_trait]
impl ProgressRepository for FailingProgressRepo {
    async fn load_completed(&self) -> Result<Option<Vec<LessonId>>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn save_completed(&self, _ids: &[LessonId]) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn clear_completed(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn workspace_survives_storage_failure() {
    let storage = Storage {
        kv: Arc::new(InMemoryRepository::new()),
        progress: Arc::new(FailingProgressRepo),
    };
    let mut harness = setup_view_harness(HarnessOptions {
        storage,
        ..HarnessOptions::default()
    })
    .await;
    harness.rebuild();
    let html = harness.drive_until(|html| html.contains(LOADED)).await;

    assert!(html.contains("Variables"), "missing first lesson in {html}");
    assert!(html.contains("0%"), "missing percent in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn correct_run_celebrates_and_persists() {
    let mut harness = setup_view_harness(HarnessOptions::default()).await;
    harness.engine.respond_with("[1] \"R-Master\"\n[1] 4.2");
    harness.rebuild();
    harness.drive_until(|html| html.contains(LOADED)).await;

    let handles = harness.handles.clone();
    harness.dom.in_runtime(|| {
        let mut orchestrator = handles.orchestrator();
        if let Some(orch) = orchestrator.write().as_mut() {
            orch.set_code("name <- \"R-Master\"\nversion <- 4.2\nname\nversion");
        }
        handles.run().call(());
    });
    let html = harness
        .drive_until(|html| html.contains("Lesson complete!"))
        .await;

    assert!(html.contains("Lesson complete!"), "missing celebration in {html}");
    assert!(html.contains("log-line log-output"), "missing output line in {html}");
    assert!(html.contains("1 / 20 lessons"), "missing progress in {html}");
    assert_eq!(
        harness.storage.kv.get(PROGRESS_KEY).await.unwrap().as_deref(),
        Some("[1]")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn reset_progress_clears_storage_and_logs_notice() {
    let storage = Storage::in_memory();
    storage.kv.set(PROGRESS_KEY, "[1,2,3]").await.unwrap();
    let mut harness = setup_view_harness(HarnessOptions {
        storage,
        ..HarnessOptions::default()
    })
    .await;
    harness.rebuild();
    harness.drive_until(|html| html.contains(LOADED)).await;

    let handles = harness.handles.clone();
    harness.dom.in_runtime(|| handles.reset().call(()));
    let html = harness
        .drive_until(|html| html.contains("Progress has been reset."))
        .await;

    assert!(html.contains("Variables"), "missing first lesson in {html}");
    assert!(html.contains("0 / 20 lessons"), "missing progress in {html}");
    for _ in 0..5 {
        harness.drive_async().await;
    }
    assert!(harness.storage.kv.get(PROGRESS_KEY).await.unwrap().is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn graphics_image_follows_canvas_changes() {
    let mut harness = setup_view_harness(HarnessOptions::default()).await;
    harness.rebuild();
    harness.drive_until(|html| html.contains(LOADED)).await;

    let handles = harness.handles.clone();
    let apply = |dom: &VirtualDom, message: Option<EngineMessage>| {
        dom.in_runtime(|| {
            let mut orchestrator = handles.orchestrator();
            if let Some(orch) = orchestrator.write().as_mut() {
                orch.set_view(ActiveView::Graphics);
                match message {
                    Some(message) => orch.apply_message(message),
                    None => orch.set_code("plot(1:10)"),
                }
            }
        });
    };

    let blue = Bitmap::filled(8, 8, [0, 0, 255, 255]);
    apply(
        &harness.dom,
        Some(EngineMessage::Canvas(CanvasEvent::ImageReady(blue))),
    );
    let html = harness
        .drive_until(|html| html.contains("data:image/png;base64,"))
        .await;
    assert!(html.contains("graphics-canvas"), "missing plot in {html}");

    apply(&harness.dom, None);
    let html = harness.drive_until(|html| html.contains("plot(1:10)")).await;
    assert!(html.contains("data:image/png;base64,"), "plot lost on edit in {html}");

    apply(&harness.dom, Some(EngineMessage::Canvas(CanvasEvent::NewPage)));
    let html = harness
        .drive_until(|html| html.contains("Plots you draw will appear here."))
        .await;
    assert!(!html.contains("data:image/png;base64,"), "stale plot in {html}");
}

#[component]
fn LessonHarness(vm: LessonVm) -> Element {
    rsx! { LessonPane { vm, on_toggle_hint: |()| {} } }
}

#[test]
fn lesson_pane_shows_hint_only_when_visible() {
    let vm = LessonVm {
        id: 1,
        module: "Getting started".into(),
        title: "Variables".into(),
        scenario_html: "<p>R prefers <code>&lt;-</code>.</p>".into(),
        task_html: "<p>Create a variable.</p>".into(),
        hint_code: "x <- 1".into(),
        hint_visible: false,
    };

    let mut dom = VirtualDom::new_with_props(LessonHarness, LessonHarnessProps { vm: vm.clone() });
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("Show answer"), "{html}");
    assert!(html.contains("<code>&lt;-</code>"), "{html}");
    assert!(!html.contains("x &lt;- 1"), "{html}");

    let mut dom = VirtualDom::new_with_props(
        LessonHarness,
        LessonHarnessProps {
            vm: LessonVm {
                hint_visible: true,
                ..vm
            },
        },
    );
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("Hide answer"), "{html}");
    assert!(html.contains("x &lt;- 1"), "{html}");
}

#[test]
fn log_viewer_styles_each_kind() {
    let mut transcript = Transcript::new();
    transcript.push(LogEntry::new(LogKind::Input, "1 + 1", fixed_now()));
    transcript.push(LogEntry::new(LogKind::Output, "[1] 2", fixed_now()));
    transcript.push(LogEntry::new(LogKind::System, "Progress has been reset.", fixed_now()));

    let mut dom = VirtualDom::new_with_props(
        LogViewer,
        LogViewerProps {
            lines: map_log_lines(&transcript),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("log-line log-input"), "{html}");
    assert!(html.contains("[1] 2"), "{html}");
    assert!(html.contains("log-line log-system"), "{html}");
    assert!(!html.contains("Run some code"), "{html}");
}

#[test]
fn graphics_pane_renders_image_or_placeholder() {
    let mut dom = VirtualDom::new_with_props(GraphicsPane, GraphicsPaneProps { image_url: None });
    dom.rebuild_in_place();
    assert!(dioxus_ssr::render(&dom).contains("Plots you draw will appear here."));

    let url = "data:image/png;base64,AAAA".to_string();
    let mut dom = VirtualDom::new_with_props(
        GraphicsPane,
        GraphicsPaneProps {
            image_url: Some(url.clone()),
        },
    );
    dom.rebuild_in_place();
    assert!(dioxus_ssr::render(&dom).contains(&url));
}
