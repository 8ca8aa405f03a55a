//! What the page shows, derived from [`ViewState`] alone.

use crate::backend::message::MessageRecord;
use crate::state::ViewState;

pub const EMPTY_PLACEHOLDER: &str = "No messages yet";

#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub sender: String,
    pub receiver: Option<String>,
    pub message: String,
    pub timestamp: Option<String>,
}

impl From<&MessageRecord> for EntryView {
    fn from(record: &MessageRecord) -> Self {
        let timestamp = match record.sent_at() {
            Some(at) => Some(at.format("%b %e, %Y %H:%M:%S").to_string()),
            None => record.timestamp.clone(),
        };
        Self {
            sender: record.sender.clone(),
            receiver: record.receiver.clone(),
            message: record.message.clone(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageListView {
    Placeholder(&'static str),
    Entries(Vec<EntryView>),
}

pub fn message_list(state: &ViewState) -> MessageListView {
    if state.messages().is_empty() {
        MessageListView::Placeholder(EMPTY_PLACEHOLDER)
    } else {
        MessageListView::Entries(state.messages().iter().map(EntryView::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerView {
    pub draft: String,
    pub locked: bool,
    pub button_label: &'static str,
}

pub fn composer(state: &ViewState) -> ComposerView {
    let locked = state.is_submitting();
    ComposerView {
        draft: state.draft().to_string(),
        locked,
        button_label: if locked { "Sending..." } else { "Send" },
    }
}

pub fn status_line(state: &ViewState) -> Option<String> {
    match state.backend_status()? {
        Ok(status) => Some(status.clone()),
        Err(_) => Some("Backend unreachable".to_string()),
    }
}
