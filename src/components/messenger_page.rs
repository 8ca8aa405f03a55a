use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::backend::AppCmd;
use crate::components::common::{ErrorBanner, MessageItem, StatusBadge};
use crate::components::view::{self, MessageListView};
use crate::components::AppState;

#[component]
pub fn MessengerPage() -> Element {
    let app_state = use_context::<AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let mut view_state = app_state.view;

    // Initial load
    let cmd_tx_mount = cmd_tx.clone();
    use_effect(move || {
        let _ = cmd_tx_mount.send(AppCmd::CheckStatus);
        let _ = cmd_tx_mount.send(AppCmd::RetrieveMessages);
    });

    let on_submit = {
        let cmd_tx = cmd_tx.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(text) = view_state.write().begin_submit() else {
                return;
            };
            if let Err(e) = cmd_tx.send(AppCmd::SubmitMessage { text }) {
                error!("Failed to send SubmitMessage command: {:?}", e);
                view_state.write().apply(crate::backend::AppEvent::SubmissionFailed {
                    error: crate::backend::error::SyncError::Network("synchronizer is not running".into()),
                });
            }
        }
    };

    let state = view_state.read();
    let composer = view::composer(&state);
    let list = view::message_list(&state);
    let status = view::status_line(&state);
    let loading = state.is_retrieving();
    let notice = state.notice().cloned();
    let dropped = state.dropped_entries();
    drop(state);
    let ledger_image = app_state.ledger_image.read().clone();

    rsx! {
        div { class: "page",
            header { class: "page-header",
                h1 { class: "page-title", "🔐 Quantum Secure Messenger" }
                StatusBadge { line: status, loading }
            }

            if let Some(notice) = notice {
                ErrorBanner {
                    notice,
                    on_dismiss: move |_| view_state.write().dismiss_notice(),
                }
            }

            form { class: "composer", onsubmit: on_submit,
                input {
                    class: "composer-input",
                    placeholder: "Enter message...",
                    value: "{composer.draft}",
                    required: true,
                    disabled: composer.locked,
                    oninput: move |evt| view_state.write().set_draft(evt.value()),
                }
                button {
                    class: "composer-send",
                    r#type: "submit",
                    disabled: composer.locked,
                    "{composer.button_label}"
                }
            }

            section { class: "message-panel",
                h2 { class: "panel-title", "📦 Blockchain Messages" }
                match list {
                    MessageListView::Placeholder(text) => rsx! {
                        p { class: "text-muted", "{text}" }
                    },
                    MessageListView::Entries(entries) => rsx! {
                        for (i, entry) in entries.into_iter().enumerate() {
                            MessageItem { key: "{i}", entry }
                        }
                    },
                }
                if dropped > 0 {
                    p { class: "text-xs text-muted", "{dropped} unreadable entries hidden" }
                }
            }

            if let Some(url) = ledger_image {
                section { class: "message-panel",
                    h2 { class: "panel-title", "Ledger" }
                    img { class: "ledger-image", src: "{url}", alt: "Blockchain visualization" }
                }
            }
        }
    }
}
