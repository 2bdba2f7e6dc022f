use dioxus::prelude::*;
use lesson_core::model::ActiveView;

use crate::vm::LogLineVm;

#[component]
pub fn OutputTabs(
    view: ActiveView,
    lines: Vec<LogLineVm>,
    image_url: Option<String>,
    on_select: EventHandler<ActiveView>,
) -> Element {
    let tab_class = |tab: ActiveView| {
        if tab == view {
            "output-tab output-tab-active"
        } else {
            "output-tab"
        }
    };
    rsx! {
        section { class: "output-pane",
            div { class: "output-tabs",
                button {
                    class: tab_class(ActiveView::Console),
                    r#type: "button",
                    id: "tab-console",
                    onclick: move |_| on_select.call(ActiveView::Console),
                    "Console"
                }
                button {
                    class: tab_class(ActiveView::Graphics),
                    r#type: "button",
                    id: "tab-graphics",
                    onclick: move |_| on_select.call(ActiveView::Graphics),
                    "Plot graphics"
                }
            }
            div { class: "output-body",
                match view {
                    ActiveView::Console => rsx! { LogViewer { lines } },
                    ActiveView::Graphics => rsx! { GraphicsPane { image_url } },
                }
            }
        }
    }
}

#[component]
pub fn LogViewer(lines: Vec<LogLineVm>) -> Element {
    let count = lines.len();
    use_effect(use_reactive((&count,), |(count,)| {
        if count > 0 {
            let _ = document::eval(
                "document.getElementById('log-end')?.scrollIntoView({ block: 'end' });",
            );
        }
    }));

    rsx! {
        div { class: "log-viewer",
            if lines.is_empty() {
                p { class: "log-empty", "Run some code to see its output here." }
            }
            for (index, line) in lines.into_iter().enumerate() {
                div { key: "{index}", class: "{line.class}",
                    span { class: "log-time", "{line.time}" }
                    span { class: "log-prefix", "{line.prefix}" }
                    pre { class: "log-text", "{line.text}" }
                }
            }
            div { id: "log-end" }
        }
    }
}

#[component]
pub fn GraphicsPane(image_url: Option<String>) -> Element {
    rsx! {
        div { class: "graphics-pane",
            match image_url {
                Some(url) => rsx! {
                    img { class: "graphics-canvas", id: "graphics-canvas", src: "{url}", width: "500", height: "500", alt: "Plot output" }
                },
                None => rsx! {
                    p { class: "graphics-empty", "Plots you draw will appear here." }
                },
            }
        }
    }
}
