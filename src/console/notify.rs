use tokio::sync::mpsc;
use tracing::debug;

/// A transient, user-visible notice. Notices are never fatal: the console
/// stays interactive and the next action or poll cycle is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Raised once per growth event when polling sees the order count rise.
    NewOrders { count: usize },
    /// A failed remote call (transport failure and remote rejection are
    /// handled identically).
    Error { message: String },
}

/// Sender half of the notice stream. Controllers and the poll scheduler hold
/// clones; the console front end drains the receiver.
#[derive(Clone)]
pub struct NoticeSender {
    sender: mpsc::UnboundedSender<Notice>,
}

impl NoticeSender {
    pub fn channel() -> (NoticeSender, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn new_orders(&self, count: usize) {
        self.push(Notice::NewOrders { count });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notice::Error {
            message: message.into(),
        });
    }

    fn push(&self, notice: Notice) {
        // Nobody listening (e.g. during shutdown) is fine for a transient notice.
        if self.sender.send(notice).is_err() {
            debug!("Notice dropped: receiver closed");
        }
    }
}
