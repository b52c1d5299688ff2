use tokio::sync::mpsc;

use crate::client_method;
use crate::domain::{Composer, FeedbackMessage};
use crate::error::FeedbackError;
use crate::messages::FeedbackRequest;

/// Client for the feedback desk actor.
#[derive(Clone)]
pub struct FeedbackClient {
    sender: mpsc::Sender<FeedbackRequest>,
}

impl FeedbackClient {
    pub fn new(sender: mpsc::Sender<FeedbackRequest>) -> Self {
        Self { sender }
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(FeedbackRequest::Shutdown).await;
    }
}

client_method!(FeedbackClient => fn reload() -> usize as FeedbackRequest::Reload, Error = FeedbackError);
client_method!(FeedbackClient => fn snapshot() -> Vec<FeedbackMessage> as FeedbackRequest::Snapshot, Error = FeedbackError);
client_method!(FeedbackClient => fn open_composer(message_id: i64) -> () as FeedbackRequest::OpenComposer, Error = FeedbackError);
client_method!(FeedbackClient => fn edit_draft(text: String) -> () as FeedbackRequest::EditDraft, Error = FeedbackError);
client_method!(FeedbackClient => fn active_composer() -> Option<Composer> as FeedbackRequest::ActiveComposer, Error = FeedbackError);
client_method!(FeedbackClient => fn send_reply() -> () as FeedbackRequest::SendReply, Error = FeedbackError);
