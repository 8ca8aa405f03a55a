pub mod api;
pub mod config;
pub mod error;
pub mod message;
#[cfg(test)]
pub(crate) mod mock;

use futures::future::{abortable, AbortHandle};
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use api::MessengerApi;
use error::SyncError;
use message::{MessageRecord, Retrieved};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCmd {
    RetrieveMessages,
    SubmitMessage { text: String },
    CheckStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    RetrievalStarted { generation: u64 },
    MessagesRetrieved { generation: u64, messages: Vec<MessageRecord>, dropped: usize },
    RetrievalFailed { generation: u64, error: SyncError },
    MessageSubmitted,
    SubmissionFailed { error: SyncError },
    StatusChecked(Result<String, SyncError>),
}

/// Results reported back to the loop by the spawned request tasks.
enum Completion {
    Retrieval { generation: u64, result: Result<Retrieved, SyncError> },
    Submission(Result<(), SyncError>),
    Status(Result<String, SyncError>),
}

/// Runs backend requests on behalf of the view and reports their outcome as
/// [`AppEvent`]s.
pub struct Synchronizer {
    api: MessengerApi,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
    generation: u64,
    retrieval: Option<AbortHandle>,
    sending: bool,
}

impl Synchronizer {
    pub fn new(
        api: MessengerApi,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            api,
            cmd_rx,
            event_tx,
            done_tx,
            done_rx,
            generation: 0,
            retrieval: None,
            sending: false,
        }
    }

    pub async fn run(mut self) {
        info!(base_url = %self.api.config().base_url, "synchronizer started");
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(done) = self.done_rx.recv() => {
                    if !self.handle_completion(done) {
                        break;
                    }
                }
            }
        }
        if let Some(handle) = self.retrieval.take() {
            handle.abort();
        }
        info!("synchronizer stopped");
    }

    fn handle_command(&mut self, cmd: AppCmd) {
        debug!(?cmd, "command");
        match cmd {
            AppCmd::RetrieveMessages => self.start_retrieval(),
            AppCmd::SubmitMessage { text } => {
                if self.sending {
                    warn!("send already in flight, ignoring submission");
                    return;
                }
                self.sending = true;
                let api = self.api.clone();
                let done = self.done_tx.clone();
                spawn_task(async move {
                    let result = api.submit_message(&text).await;
                    let _ = done.send(Completion::Submission(result));
                });
            }
            AppCmd::CheckStatus => {
                let api = self.api.clone();
                let done = self.done_tx.clone();
                spawn_task(async move {
                    let result = api.check_status().await;
                    let _ = done.send(Completion::Status(result));
                });
            }
        }
    }

    fn start_retrieval(&mut self) {
        if let Some(previous) = self.retrieval.take() {
            debug!(generation = self.generation, "superseding in-flight retrieval");
            previous.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        if !self.emit(AppEvent::RetrievalStarted { generation }) {
            return;
        }

        let api = self.api.clone();
        let done = self.done_tx.clone();
        let (request, handle) = abortable(async move { api.retrieve_messages().await });
        self.retrieval = Some(handle);
        spawn_task(async move {
            if let Ok(result) = request.await {
                let _ = done.send(Completion::Retrieval { generation, result });
            }
        });
    }

    /// Returns `false` once the view has gone away.
    fn handle_completion(&mut self, done: Completion) -> bool {
        match done {
            Completion::Retrieval { generation, result } => {
                if generation != self.generation {
                    debug!(generation, latest = self.generation, "discarding stale retrieval");
                    return true;
                }
                self.retrieval = None;
                match result {
                    Ok(Retrieved { messages, dropped }) => {
                        info!(count = messages.len(), dropped, "messages retrieved");
                        self.emit(AppEvent::MessagesRetrieved { generation, messages, dropped })
                    }
                    Err(error) => {
                        warn!(%error, "retrieval failed");
                        self.emit(AppEvent::RetrievalFailed { generation, error })
                    }
                }
            }
            Completion::Submission(result) => {
                self.sending = false;
                match result {
                    Ok(()) => {
                        info!("message submitted");
                        if !self.emit(AppEvent::MessageSubmitted) {
                            return false;
                        }
                        self.start_retrieval();
                        true
                    }
                    Err(error) => {
                        warn!(%error, "submission failed");
                        self.emit(AppEvent::SubmissionFailed { error })
                    }
                }
            }
            Completion::Status(result) => {
                if let Err(error) = &result {
                    warn!(%error, "status check failed");
                }
                self.emit(AppEvent::StatusChecked(result))
            }
        }
    }

    fn emit(&self, event: AppEvent) -> bool {
        if self.event_tx.send(event).is_err() {
            warn!("event receiver dropped");
            return false;
        }
        true
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_task<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(fut);
}

#[cfg(target_arch = "wasm32")]
fn spawn_task<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(fut);
}
