use dioxus::prelude::*;
use crate::components::view::EntryView;
use crate::state::Notice;

#[component]
pub fn ErrorBanner(notice: Notice, on_dismiss: EventHandler<()>) -> Element {
    let headline = notice.headline();
    rsx! {
        div { class: "error-banner", role: "alert",
            div { class: "flex-1",
                p { class: "font-semibold", "{headline}" }
                p { class: "text-xs", "{notice.detail}" }
            }
            button {
                class: "banner-close",
                r#type: "button",
                onclick: move |_| on_dismiss.call(()),
                "✕"
            }
        }
    }
}

#[component]
pub fn MessageItem(entry: EntryView) -> Element {
    rsx! {
        div { class: "message-item",
            p {
                strong { "From: " }
                "{entry.sender}"
                if let Some(receiver) = &entry.receiver {
                    span { class: "text-muted", " → {receiver}" }
                }
            }
            p {
                strong { "Message: " }
                span { class: "break-words", "{entry.message}" }
            }
            if let Some(ts) = &entry.timestamp {
                p { class: "text-xs text-muted", "{ts}" }
            }
        }
    }
}

#[component]
pub fn StatusBadge(#[props(!optional)] line: Option<String>, loading: bool) -> Element {
    rsx! {
        div { class: "status-badge",
            if loading {
                span { class: "text-muted", "Refreshing…" }
            }
            if let Some(line) = line {
                span { "{line}" }
            }
        }
    }
}

#[component]
pub fn ConfigErrorScreen(reason: String) -> Element {
    rsx! {
        div { class: "page",
            h1 { class: "page-title", "🔐 Quantum Secure Messenger" }
            div { class: "error-banner", role: "alert",
                div { class: "flex-1",
                    p { class: "font-semibold", "Messenger is not configured" }
                    p { class: "text-xs", "{reason}" }
                    p { class: "text-xs",
                        "Set MESSENGER_API_URL (and optionally MESSENGER_REQUEST_TIMEOUT_SECS) and restart."
                    }
                }
            }
        }
    }
}
