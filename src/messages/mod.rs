//! Typed message enums for actor communication. Each variant includes
//! parameters and a oneshot channel for responses.

use chrono::NaiveDate;
use tokio::sync::oneshot;

use crate::domain::{Composer, ExecutorField, FeedbackMessage, Order, OrderStatus, Product};
use crate::error::{CatalogError, FeedbackError, OrderError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Outcome of the explicit human confirmation step that guards deletes.
/// Declining leaves the collection unchanged and issues no remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug)]
pub enum OrderRequest {
    /// Re-fetch the whole collection; responds with the new order count.
    Reload {
        respond_to: ServiceResponse<usize, OrderError>,
    },
    /// Current view of the collection, with in-progress executor edits
    /// echoed into the rows.
    Snapshot {
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    SetStatus {
        order_id: i64,
        status: OrderStatus,
        respond_to: ServiceResponse<(), OrderError>,
    },
    /// Keystroke-level executor edit: local echo only, no remote call.
    EditExecutor {
        order_id: i64,
        text: String,
        respond_to: ServiceResponse<(), OrderError>,
    },
    /// Blur: push the displayed executor value to the store. On failure the
    /// field reverts to the confirmed value and the error is returned.
    CommitExecutor {
        order_id: i64,
        respond_to: ServiceResponse<String, OrderError>,
    },
    ExecutorField {
        order_id: i64,
        respond_to: ServiceResponse<ExecutorField, OrderError>,
    },
    SetEndDate {
        order_id: i64,
        date: NaiveDate,
        respond_to: ServiceResponse<(), OrderError>,
    },
    /// Responds with `true` when the order was deleted, `false` when the
    /// confirmation was declined.
    Delete {
        order_id: i64,
        confirmation: Confirmation,
        respond_to: ServiceResponse<bool, OrderError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum CatalogRequest {
    Reload {
        respond_to: ServiceResponse<usize, CatalogError>,
    },
    Snapshot {
        respond_to: ServiceResponse<Vec<Product>, CatalogError>,
    },
    /// Create (id == 0) or update (id != 0); responds with the product's id.
    Save {
        product: Product,
        respond_to: ServiceResponse<i64, CatalogError>,
    },
    Delete {
        product_id: i64,
        confirmation: Confirmation,
        respond_to: ServiceResponse<bool, CatalogError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum FeedbackRequest {
    Reload {
        respond_to: ServiceResponse<usize, FeedbackError>,
    },
    Snapshot {
        respond_to: ServiceResponse<Vec<FeedbackMessage>, FeedbackError>,
    },
    /// Opens a reply composer on one message, abandoning any other draft.
    OpenComposer {
        message_id: i64,
        respond_to: ServiceResponse<(), FeedbackError>,
    },
    EditDraft {
        text: String,
        respond_to: ServiceResponse<(), FeedbackError>,
    },
    ActiveComposer {
        respond_to: ServiceResponse<Option<Composer>, FeedbackError>,
    },
    /// Sends the open composer's draft and, on success, closes it.
    SendReply {
        respond_to: ServiceResponse<(), FeedbackError>,
    },
    Shutdown,
}
