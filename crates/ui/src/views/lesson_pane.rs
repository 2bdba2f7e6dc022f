use dioxus::prelude::*;

use crate::vm::LessonVm;

#[component]
pub fn LessonPane(vm: LessonVm, on_toggle_hint: EventHandler<()>) -> Element {
    let toggle_label = if vm.hint_visible { "Hide answer" } else { "Show answer" };
    rsx! {
        section { class: "lesson-pane",
            div { class: "lesson-heading",
                span { class: "module-badge", "{vm.module}" }
                h2 { class: "lesson-title", "{vm.title}" }
            }
            section { class: "lesson-section",
                h3 { class: "lesson-section-title", "Scenario" }
                div { class: "lesson-scenario", dangerous_inner_html: "{vm.scenario_html}" }
            }
            section { class: "lesson-section",
                h3 { class: "lesson-section-title", "Challenge" }
                div { class: "lesson-task", dangerous_inner_html: "{vm.task_html}" }
            }
            section { class: "lesson-section",
                div { class: "lesson-hint-header",
                    h3 { class: "lesson-section-title", "Hint" }
                    button {
                        class: "btn btn-small",
                        r#type: "button",
                        id: "toggle-hint",
                        onclick: move |_| on_toggle_hint.call(()),
                        "{toggle_label}"
                    }
                }
                if vm.hint_visible {
                    pre { class: "lesson-hint", code { "{vm.hint_code}" } }
                } else {
                    p { class: "lesson-hint-placeholder", "Reveal the reference answer with the button above." }
                }
            }
        }
    }
}
