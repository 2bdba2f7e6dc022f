#[cfg(test)]
use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use lesson_core::model::{ActiveView, LessonId};
use services::workflow::{forget_progress, settle_run};
use services::{EngineError, Orchestrator};

use super::{
    CelebrationDialog, CodeEditor, LessonPane, Navigator, OutputTabs, WorkspaceHeader,
};
use crate::context::AppContext;
use crate::vm::{canvas_data_url, map_lesson, map_log_lines, map_navigator, status_badge};

/// The whole learning screen: navigator, lesson, editor and output.
#[component]
pub fn WorkspaceView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut orchestrator = use_signal(|| None::<Orchestrator>);
    let mut status = use_signal(|| ctx.session().status());

    // Mirror the session's readiness into a signal.
    use_hook({
        let session = ctx.session();
        move || {
            let mut rx = session.watch_status();
            spawn(async move {
                loop {
                    let current = rx.borrow_and_update().clone();
                    status.set(current);
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
            })
        }
    });

    // Drain out-of-band engine messages. The handle lives as long as this view.
    let _listener = use_hook({
        let session = ctx.session();
        move || {
            let (handle, mut rx) = session.spawn_listener();
            spawn(async move {
                while let Some(message) = rx.recv().await {
                    let mut guard = orchestrator.write();
                    match guard.as_mut() {
                        Some(orch) => orch.apply_message(message),
                        None => tracing::debug!(?message, "engine message before lessons loaded"),
                    }
                }
            });
            Rc::new(handle)
        }
    });

    let _loader = use_resource({
        let ctx = ctx.clone();
        move || {
            let ctx = ctx.clone();
            async move {
                let progress = ctx.store().load().await;
                orchestrator.set(Some(Orchestrator::new(
                    ctx.catalog(),
                    ctx.session(),
                    progress,
                    ctx.clock(),
                )));
            }
        }
    });

    // Re-encode the plot only when the canvas itself changed.
    let canvas_revision =
        use_memo(move || orchestrator.read().as_ref().map(|orch| orch.canvas().revision()));
    let image_url = use_memo(move || {
        canvas_revision();
        let guard = orchestrator.peek();
        let canvas = guard.as_ref()?.canvas();
        if canvas.has_drawing() {
            canvas_data_url(canvas.surface())
        } else {
            None
        }
    });

    let on_run = {
        let session = ctx.session();
        let store = ctx.store();
        use_callback(move |()| {
            let Some(ticket) = orchestrator.write().as_mut().and_then(Orchestrator::begin_run)
            else {
                return;
            };
            tracing::debug!(lesson = %ticket.lesson_id(), "run started");
            let session = session.clone();
            let store = store.clone();
            spawn(async move {
                let result = match session.spawn_evaluate(ticket.code().to_string()).await {
                    Ok(result) => result,
                    Err(err) => Err(EngineError::Evaluation(err.to_string())),
                };
                let persist = {
                    let mut guard = orchestrator.write();
                    let Some(orch) = guard.as_mut() else {
                        return;
                    };
                    settle_run(orch, ticket, result).1
                };
                persist.apply(&store).await;
            });
        })
    };

    let on_reset_progress = {
        let store = ctx.store();
        use_callback(move |()| {
            let Some(persist) = orchestrator.write().as_mut().map(forget_progress) else {
                return;
            };
            let store = store.clone();
            spawn(async move { persist.apply(&store).await });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<WorkspaceTestHandles>() {
                handles.register(on_run, on_reset_progress, orchestrator);
            }
        }
    }

    let badge = status_badge(&status.read());
    let guard = orchestrator.read();
    let Some(orch) = guard.as_ref() else {
        return rsx! {
            div { class: "workspace workspace-loading",
                p { "Loading lessons..." }
                span { class: "{badge.class}", "{badge.label}" }
            }
        };
    };

    let ready = status.read().is_ready();
    let navigator = map_navigator(orch);
    let lesson = map_lesson(orch.current_lesson(), orch.hint_visible());
    let lines = map_log_lines(orch.transcript());
    let code = orch.code().to_string();
    let running = orch.is_running();
    let view = orch.view();
    let celebrating = orch.celebrating();
    drop(guard);

    rsx! {
        div { class: "workspace",
            Navigator {
                vm: navigator.clone(),
                on_select: move |id: u32| update(orchestrator, |orch| {
                    orch.select_lesson(LessonId::new(id));
                }),
                on_reset: move |()| on_reset_progress.call(()),
            }
            main { class: "workspace-main",
                WorkspaceHeader { vm: navigator, badge }
                div { class: "workspace-body",
                    LessonPane {
                        vm: lesson,
                        on_toggle_hint: move |()| update(orchestrator, |orch| orch.toggle_hint()),
                    }
                    div { class: "workspace-editor",
                        CodeEditor {
                            code,
                            ready,
                            running,
                            on_change: move |value: String| update(orchestrator, |orch| orch.set_code(value)),
                            on_reset: move |()| update(orchestrator, |orch| orch.reset_code()),
                            on_run: move |()| on_run.call(()),
                        }
                        if celebrating {
                            CelebrationDialog {
                                on_stay: move |()| update(orchestrator, |orch| orch.dismiss_celebration()),
                                on_next: move |()| update(orchestrator, |orch| orch.advance()),
                            }
                        }
                    }
                }
                OutputTabs {
                    view,
                    lines,
                    image_url: image_url(),
                    on_select: move |view: ActiveView| update(orchestrator, |orch| orch.set_view(view)),
                }
            }
        }
    }
}

fn update(mut orchestrator: Signal<Option<Orchestrator>>, apply: impl FnOnce(&mut Orchestrator)) {
    if let Some(orch) = orchestrator.write().as_mut() {
        apply(orch);
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct WorkspaceTestHandles {
    run: Rc<RefCell<Option<Callback<()>>>>,
    reset: Rc<RefCell<Option<Callback<()>>>>,
    orchestrator: Rc<RefCell<Option<Signal<Option<Orchestrator>>>>>,
}

#[cfg(test)]
impl WorkspaceTestHandles {
    pub(crate) fn register(
        &self,
        run: Callback<()>,
        reset: Callback<()>,
        orchestrator: Signal<Option<Orchestrator>>,
    ) {
        *self.run.borrow_mut() = Some(run);
        *self.reset.borrow_mut() = Some(reset);
        *self.orchestrator.borrow_mut() = Some(orchestrator);
    }

    pub(crate) fn run(&self) -> Callback<()> {
        (*self.run.borrow()).expect("run callback registered")
    }

    pub(crate) fn reset(&self) -> Callback<()> {
        (*self.reset.borrow()).expect("reset callback registered")
    }

    pub(crate) fn orchestrator(&self) -> Signal<Option<Orchestrator>> {
        (*self.orchestrator.borrow()).expect("orchestrator registered")
    }
}
