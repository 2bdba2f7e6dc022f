use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use lesson_core::model::Catalog;
use lesson_core::time::fixed_clock;
use services::engine::ScriptedEngine;
use services::{AppServices, Clock, InterpreterSession, ProgressStore, SessionConfig};
use storage::repository::Storage;
use tokio::runtime::Handle;

use crate::context::{UiApp, build_app_context};
use crate::views::{WorkspaceTestHandles, WorkspaceView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn catalog(&self) -> Arc<Catalog> {
        self.services.catalog()
    }

    fn session(&self) -> Arc<InterpreterSession> {
        self.services.session()
    }

    fn progress_store(&self) -> ProgressStore {
        self.services.store()
    }

    fn clock(&self) -> Clock {
        fixed_clock()
    }
}

#[derive(Props, Clone)]
struct WorkspaceHarnessProps {
    app: Arc<TestApp>,
    handles: WorkspaceTestHandles,
}

impl PartialEq for WorkspaceHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn WorkspaceHarness(props: WorkspaceHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { WorkspaceView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub engine: Arc<ScriptedEngine>,
    pub handles: WorkspaceTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until `html` satisfies `done`, giving up after a few rounds.
    pub async fn drive_until(&mut self, done: impl Fn(&str) -> bool) -> String {
        for _ in 0..20 {
            let html = self.render();
            if done(&html) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub struct HarnessOptions {
    pub storage: Storage,
    pub engine: ScriptedEngine,
    pub initialize: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            storage: Storage::in_memory(),
            engine: ScriptedEngine::new(),
            initialize: true,
        }
    }
}

pub async fn setup_view_harness(options: HarnessOptions) -> ViewHarness {
    let HarnessOptions {
        storage,
        engine,
        initialize,
    } = options;
    let engine = Arc::new(engine);
    let services = AppServices::new(
        &storage,
        engine.clone(),
        SessionConfig::default(),
        Handle::current(),
    )
    .expect("build services");
    if initialize {
        services.session().initialize().await.expect("initialize session");
    }

    let handles = WorkspaceTestHandles::default();
    let dom = VirtualDom::new_with_props(
        WorkspaceHarness,
        WorkspaceHarnessProps {
            app: Arc::new(TestApp { services }),
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        engine,
        handles,
    }
}
