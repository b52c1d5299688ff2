use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::FeedbackClient;
use crate::console::notify::NoticeSender;
use crate::domain::{Composer, FeedbackMessage};
use crate::error::FeedbackError;
use crate::messages::FeedbackRequest;
use crate::store::{RemoteStore, StoreError};

/// Actor owning the feedback collection and the single reply composer.
///
/// Feedback is created by customers through the bot and mutated here exactly
/// once: the reply. A message is never un-replied and never deleted.
pub struct FeedbackDesk {
    receiver: mpsc::Receiver<FeedbackRequest>,
    store: Arc<dyn RemoteStore>,
    notices: NoticeSender,
    messages: Vec<FeedbackMessage>,
    /// At most one open composer across the whole console.
    composer: Option<Composer>,
}

impl FeedbackDesk {
    pub fn new(
        buffer_size: usize,
        store: Arc<dyn RemoteStore>,
        notices: NoticeSender,
    ) -> (Self, FeedbackClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let desk = Self {
            receiver,
            store,
            notices,
            messages: Vec::new(),
            composer: None,
        };
        (desk, FeedbackClient::new(sender))
    }

    #[instrument(name = "feedback_desk", skip(self))]
    pub async fn run(mut self) {
        info!("Feedback desk starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                FeedbackRequest::Reload { respond_to } => {
                    let _ = respond_to.send(self.handle_reload().await);
                }
                FeedbackRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.messages.clone()));
                }
                FeedbackRequest::OpenComposer {
                    message_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_open_composer(message_id));
                }
                FeedbackRequest::EditDraft { text, respond_to } => {
                    let _ = respond_to.send(self.handle_edit_draft(text));
                }
                FeedbackRequest::ActiveComposer { respond_to } => {
                    let _ = respond_to.send(Ok(self.composer.clone()));
                }
                FeedbackRequest::SendReply { respond_to } => {
                    let _ = respond_to.send(self.handle_send_reply().await);
                }
                FeedbackRequest::Shutdown => {
                    info!("Feedback desk shutting down");
                    break;
                }
            }
        }
        info!("Feedback desk stopped");
    }

    #[instrument(skip(self))]
    async fn handle_reload(&mut self) -> Result<usize, FeedbackError> {
        self.messages = self
            .store
            .list_feedback()
            .await
            .map_err(|e| self.store_failure("load feedback", e))?;
        debug!(count = self.messages.len(), "Feedback collection reloaded");
        Ok(self.messages.len())
    }

    /// Opening a composer on one message abandons any unsent draft on another.
    fn handle_open_composer(&mut self, message_id: i64) -> Result<(), FeedbackError> {
        let message = self
            .messages
            .iter()
            .find(|m| m.id == message_id)
            .ok_or(FeedbackError::NotFound(message_id))?;
        if message.is_replied {
            return Err(FeedbackError::AlreadyReplied(message_id));
        }
        if let Some(old) = self.composer.replace(Composer::open(message_id)) {
            debug!(abandoned = old.message_id, "Abandoning unsent draft");
        }
        Ok(())
    }

    fn handle_edit_draft(&mut self, text: String) -> Result<(), FeedbackError> {
        let composer = self
            .composer
            .as_mut()
            .ok_or(FeedbackError::NoActiveComposer)?;
        composer.draft = text;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_send_reply(&mut self) -> Result<(), FeedbackError> {
        let (message_id, draft) = match &self.composer {
            Some(c) => (c.message_id, c.draft.clone()),
            None => return Err(FeedbackError::NoActiveComposer),
        };
        if draft.trim().is_empty() {
            return Err(FeedbackError::EmptyReply);
        }
        if let Some(message) = self.messages.iter().find(|m| m.id == message_id) {
            if message.is_replied {
                // The poll may have caught a reply sent elsewhere.
                self.composer = None;
                return Err(FeedbackError::AlreadyReplied(message_id));
            }
        }
        info!(message_id, "Sending reply");
        self.store
            .reply_feedback(message_id, &draft)
            .await
            .map_err(|e| self.store_failure("send reply", e))?;
        // The draft was accepted; the composer closes and the reloaded
        // collection carries admin_reply/replied_at from the store.
        self.composer = None;
        self.handle_reload().await?;
        Ok(())
    }

    fn store_failure(&self, what: &str, err: StoreError) -> FeedbackError {
        error!(error = %err, "Remote call failed");
        self.notices.error(format!("Failed to {what}: {err}"));
        FeedbackError::Store(err.to_string())
    }
}
