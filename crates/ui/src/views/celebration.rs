use dioxus::prelude::*;

#[component]
pub fn CelebrationDialog(on_stay: EventHandler<()>, on_next: EventHandler<()>) -> Element {
    rsx! {
        div { class: "celebration-overlay",
            div { class: "celebration-dialog", role: "dialog",
                div { class: "celebration-icon", "✓" }
                h3 { class: "celebration-title", "Lesson complete!" }
                div { class: "celebration-actions",
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        id: "celebration-stay",
                        onclick: move |_| on_stay.call(()),
                        "Stay here"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        id: "celebration-next",
                        onclick: move |_| on_next.call(()),
                        "Next lesson"
                    }
                }
            }
        }
    }
}
