use dioxus::prelude::*;

use crate::vm::{NavigatorVm, StatusBadgeVm};

#[component]
pub fn Navigator(vm: NavigatorVm, on_select: EventHandler<u32>, on_reset: EventHandler<()>) -> Element {
    let percent = vm.percent;
    rsx! {
        aside { class: "navigator",
            header { class: "navigator-header",
                h1 { class: "navigator-title", "R from zero" }
                div { class: "navigator-progress",
                    span { class: "navigator-progress-label", "{vm.completed} / {vm.total} lessons" }
                    span { class: "navigator-progress-percent", "{percent}%" }
                }
                div { class: "progress-bar",
                    div { class: "progress-bar-fill", style: "width: {percent}%" }
                }
            }
            nav { class: "navigator-list",
                for row in vm.rows {
                    button {
                        key: "{row.id}",
                        class: "{row.class}",
                        r#type: "button",
                        id: "lesson-{row.id}",
                        onclick: move |_| on_select.call(row.id),
                        span { class: "nav-marker", "{row.marker}" }
                        span { class: "nav-text",
                            span { class: "nav-module", "{row.module}" }
                            span { class: "nav-title", "{row.id}. {row.title}" }
                        }
                    }
                }
            }
            footer { class: "navigator-footer",
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    id: "reset-progress",
                    onclick: move |_| on_reset.call(()),
                    "Reset progress"
                }
            }
        }
    }
}

#[component]
pub fn WorkspaceHeader(vm: NavigatorVm, badge: StatusBadgeVm) -> Element {
    rsx! {
        header { class: "workspace-header",
            div { class: "workspace-header-left",
                span { class: "workspace-header-label", "Learning hub" }
                div { class: "progress-dots",
                    for dot in vm.dots {
                        span { key: "{dot.id}", class: "{dot.class}" }
                    }
                }
            }
            span { class: "{badge.class}", "{badge.label}" }
        }
    }
}
