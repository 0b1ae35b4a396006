#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::QueryClient;
use super::Render;
use super::UploadOrchestrator;
use super::UploadWorker;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::FileHandle;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::UploadJob;
use crate::domain::models::UploadStatus;
use crate::domain::models::WorkspaceStoreBox;

/// Session state owned by the shell: the workspace binding, the upload list
/// and the latest query result. Anything worth showing the user is queued in
/// `messages` and drained by the caller.
pub struct AppState {
    pub backend: BackendBox,
    pub store: WorkspaceStoreBox,
    pub uploads: UploadOrchestrator,
    pub queries: QueryClient,
    messages: Vec<Message>,
}

impl AppState {
    pub fn new(
        backend: BackendBox,
        store: WorkspaceStoreBox,
        jobs: mpsc::UnboundedSender<UploadJob>,
        events: mpsc::UnboundedSender<Event>,
        top_k: u32,
    ) -> AppState {
        return AppState {
            uploads: UploadOrchestrator::new(store.clone(), jobs),
            queries: QueryClient::new(backend.clone(), store.clone(), events, top_k),
            backend,
            store,
            messages: vec![],
        };
    }

    /// Wires a session together: starts the upload worker and returns the
    /// state along with the event stream it should be fed from.
    pub fn spawn(
        backend: BackendBox,
        store: WorkspaceStoreBox,
        top_k: u32,
    ) -> (
        AppState,
        mpsc::UnboundedReceiver<Event>,
        JoinHandle<Result<()>>,
    ) {
        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<UploadJob>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

        let worker_backend = backend.clone();
        let worker_tx = event_tx.clone();
        let worker = tokio::spawn(async move {
            return UploadWorker::start(worker_backend, worker_tx, &mut job_rx).await;
        });

        let app_state = AppState::new(backend, store, job_tx, event_tx, top_k);
        return (app_state, event_rx, worker);
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn take_messages(&mut self) -> Vec<Message> {
        return std::mem::take(&mut self.messages);
    }

    /// Greets the user with the current binding and warns when the API is
    /// unreachable. Neither blocks the session.
    pub async fn start(&mut self) -> Result<()> {
        match self.store.get().await? {
            Some(workspace) if workspace.is_bound() => {
                self.add_message(Message::new(&format!(
                    "Hey there! You're working in workspace '{workspace}'. Ask a question or upload contracts with `/upload`."
                )));
            }
            _ => {
                self.add_message(Message::new(
                    "Hey there! Set a workspace with `/workspace NAME` to get started. Type `/help` for all commands.",
                ));
            }
        }

        self.health_check().await;

        return Ok(());
    }

    pub async fn health_check(&mut self) -> bool {
        if let Err(err) = self.backend.health_check().await {
            self.add_message(Message::new_with_type(
                MessageType::Error,
                &format!("Hey, it looks like the API isn't reachable. Uploads and questions will fail until it is.\n\nError: {err}"),
            ));
            return false;
        }

        return true;
    }

    pub async fn set_workspace(&mut self, raw: &str) -> Result<()> {
        let workspace = self.store.set(raw).await?;
        if workspace.is_bound() {
            self.add_message(Message::new_with_type(
                MessageType::Success,
                &format!("Workspace set to '{workspace}'."),
            ));
        } else {
            self.add_message(Message::new_with_type(
                MessageType::Error,
                "Workspace names may only contain letters, numbers, '_' and '-'. No workspace is bound.",
            ));
        }

        return Ok(());
    }

    pub async fn clear_workspace(&mut self) -> Result<()> {
        self.store.clear().await?;
        self.add_message(Message::new("Workspace cleared."));
        return Ok(());
    }

    pub async fn show_workspace(&mut self) -> Result<()> {
        match self.store.get().await? {
            Some(workspace) if workspace.is_bound() => {
                self.add_message(Message::new(&format!("Current workspace: '{workspace}'.")));
            }
            _ => {
                self.add_message(Message::new("No workspace is set."));
            }
        }

        return Ok(());
    }

    pub async fn upload(&mut self, files: Vec<FileHandle>) {
        let count = files.len();
        match self.uploads.submit_batch(files).await {
            Ok(()) => {
                if count > 0 {
                    self.add_message(Message::new(&format!("Uploading {count} file(s)...")));
                }
            }
            Err(err) => {
                self.add_message(Message::new_with_type(MessageType::Error, &err.to_string()));
            }
        }
    }

    /// Removes the item shown at `position`, counting from 1.
    pub fn remove(&mut self, position: usize) {
        let idx = position.wrapping_sub(1);
        let pending = self
            .uploads
            .items()
            .get(idx)
            .map(|e| return e.status == UploadStatus::Pending);

        if self.uploads.remove_at(idx) {
            self.add_message(Message::new(&Render::items(self.uploads.items())));
        } else if pending == Some(true) {
            self.add_message(Message::new_with_type(
                MessageType::Error,
                &format!("Item {position} is still uploading and can't be removed yet."),
            ));
        } else {
            self.add_message(Message::new_with_type(
                MessageType::Error,
                &format!("There is no item {position}. Use `/items` to list uploads."),
            ));
        }
    }

    pub fn list_items(&mut self) {
        self.add_message(Message::new(&Render::items(self.uploads.items())));
    }

    pub async fn ask(&mut self, question: &str) {
        if let Err(err) = self.queries.ask(question).await {
            self.add_message(Message::new_with_type(MessageType::Error, &err.to_string()));
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::UploadResolved(file, outcome) => {
                if let Some(idx) = self.uploads.handle_resolved(&file, outcome) {
                    let item = &self.uploads.items()[idx];
                    let mtype = match item.status {
                        UploadStatus::Failed => MessageType::Error,
                        UploadStatus::Success => MessageType::Success,
                        UploadStatus::Pending => MessageType::Normal,
                    };
                    let text = Render::item(idx, item);
                    self.add_message(Message::new_with_type(mtype, &text));
                }
            }
            Event::UploadBatchFinished(summary) => {
                let message = self.uploads.handle_finished(&summary).clone();
                self.add_message(message);
            }
            Event::QueryResolved(seq, res) => {
                if !self.queries.handle_resolved(seq, res) {
                    return;
                }

                if let Some(result) = self.queries.result() {
                    let text = Render::query_result(result);
                    self.add_message(Message::new(&text));
                } else if let Some(err) = self.queries.error() {
                    let text = format!("The query failed: {err}");
                    self.add_message(Message::new_with_type(MessageType::Error, &text));
                }
            }
        }
    }
}
