use crate::backend::error::{ErrorKind, SyncError};
use crate::backend::message::MessageRecord;
use crate::backend::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Retrieval,
    Submission,
}

/// Failure banner shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub operation: Operation,
    pub kind: ErrorKind,
    pub detail: String,
}

impl Notice {
    fn from_error(operation: Operation, error: &SyncError) -> Self {
        Self { operation, kind: error.kind(), detail: error.to_string() }
    }

    pub fn headline(&self) -> String {
        let what = match self.operation {
            Operation::Retrieval => "Could not load messages",
            Operation::Submission => "Message not sent",
        };
        format!("{what} ({})", self.kind.label())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    draft: String,
    messages: Vec<MessageRecord>,
    retrieval: Phase,
    submission: Phase,
    latest_generation: u64,
    dropped_entries: usize,
    notice: Option<Notice>,
    backend_status: Option<Result<String, String>>,
}

impl ViewState {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dropped_entries(&self) -> usize {
        self.dropped_entries
    }

    pub fn backend_status(&self) -> Option<&Result<String, String>> {
        self.backend_status.as_ref()
    }

    pub fn is_retrieving(&self) -> bool {
        self.retrieval == Phase::InFlight
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == Phase::InFlight
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn set_message_list(&mut self, list: Vec<MessageRecord>) {
        self.messages = list;
    }

    /// Marks a submission in flight and hands back the text to send. Returns
    /// `None` for a blank draft or while another send is pending.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_submitting() || self.draft.trim().is_empty() {
            return None;
        }
        self.submission = Phase::InFlight;
        Some(self.draft.clone())
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::RetrievalStarted { generation } => {
                self.latest_generation = self.latest_generation.max(generation);
                self.retrieval = Phase::InFlight;
            }
            AppEvent::MessagesRetrieved { generation, messages, dropped } => {
                if generation < self.latest_generation {
                    return;
                }
                self.retrieval = Phase::Idle;
                self.dropped_entries = dropped;
                self.set_message_list(messages);
                if matches!(&self.notice, Some(n) if n.operation == Operation::Retrieval) {
                    self.notice = None;
                }
            }
            AppEvent::RetrievalFailed { generation, error } => {
                if generation < self.latest_generation {
                    return;
                }
                // the previous list stays on screen
                self.retrieval = Phase::Idle;
                self.notice = Some(Notice::from_error(Operation::Retrieval, &error));
            }
            AppEvent::MessageSubmitted => {
                self.submission = Phase::Idle;
                self.draft.clear();
                if matches!(&self.notice, Some(n) if n.operation == Operation::Submission) {
                    self.notice = None;
                }
            }
            AppEvent::SubmissionFailed { error } => {
                self.submission = Phase::Idle;
                self.notice = Some(Notice::from_error(Operation::Submission, &error));
            }
            AppEvent::StatusChecked(result) => {
                self.backend_status = Some(result.map_err(|e| e.to_string()));
            }
        }
    }
}
