use dioxus::prelude::*;

#[component]
pub fn CodeEditor(
    code: String,
    ready: bool,
    running: bool,
    on_change: EventHandler<String>,
    on_reset: EventHandler<()>,
    on_run: EventHandler<()>,
) -> Element {
    let run_label = if running { "Running..." } else { "Run" };
    rsx! {
        section { class: "editor-pane",
            div { class: "editor-toolbar",
                span { class: "editor-filename", "script.R" }
                button {
                    class: "btn btn-icon",
                    r#type: "button",
                    id: "reset-code",
                    title: "Clear code",
                    onclick: move |_| on_reset.call(()),
                    "↺"
                }
            }
            textarea {
                class: "editor-input",
                id: "code-input",
                spellcheck: false,
                disabled: !ready,
                value: "{code}",
                oninput: move |evt: FormEvent| on_change.call(evt.value()),
            }
            div { class: "editor-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    id: "run-code",
                    disabled: !ready || running,
                    onclick: move |_| on_run.call(()),
                    "{run_label}"
                }
            }
        }
    }
}
