use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Invalid admin secret")]
    InvalidSecret,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeedbackError {
    #[error("Feedback message not found: {0}")]
    NotFound(i64),
    #[error("Message already replied: {0}")]
    AlreadyReplied(i64),
    #[error("Reply text must not be empty")]
    EmptyReply,
    #[error("No reply composer is open")]
    NoActiveComposer,
    #[error("Store error: {0}")]
    Store(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("platform rejected registration: HTTP {0}")]
    Rejected(u16),
    #[error("platform declined registration: {0}")]
    Declined(String),
}
