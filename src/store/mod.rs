//! The remote store: the HTTP admin API that owns all durable state.
//!
//! The console is only a client of this store. Every mutation a controller
//! makes goes through the [`RemoteStore`] trait, and tests substitute an
//! in-memory implementation behind the same seam.

mod http;

pub use http::HttpStore;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::{FeedbackMessage, Order, OrderStatus, Product};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the admin secret was rejected")]
    Unauthorized,
    #[error("remote rejected the request: HTTP {0}")]
    Rejected(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A single-field order patch. The admin API dispatches on which key is
/// present in the body, so exactly one field travels per call.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderUpdate {
    Status(OrderStatus),
    Executor(String),
    EndDate(DateTime<Utc>),
}

impl OrderUpdate {
    /// The JSON body for a PUT against the order collection. Timestamps go
    /// out as full RFC 3339 with milliseconds (`...T00:00:00.000Z`).
    pub fn into_body(self, order_id: i64) -> Value {
        match self {
            OrderUpdate::Status(status) => json!({
                "order_id": order_id,
                "status": status,
            }),
            OrderUpdate::Executor(executor) => json!({
                "order_id": order_id,
                "executor": executor,
            }),
            OrderUpdate::EndDate(ts) => json!({
                "order_id": order_id,
                "end_date": ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
        }
    }
}

/// Contract consumed from the remote admin API. Each list call returns the
/// full current collection; there is no pagination or incremental fetch.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn list_feedback(&self) -> Result<Vec<FeedbackMessage>, StoreError>;

    async fn update_order(&self, order_id: i64, update: OrderUpdate) -> Result<(), StoreError>;
    async fn delete_order(&self, order_id: i64) -> Result<(), StoreError>;

    /// Creates a product (the draft's id is ignored) and returns the new id.
    async fn create_product(&self, product: &Product) -> Result<i64, StoreError>;
    async fn update_product(&self, product: &Product) -> Result<(), StoreError>;
    async fn delete_product(&self, product_id: i64) -> Result<(), StoreError>;

    async fn reply_feedback(&self, message_id: i64, reply: &str) -> Result<(), StoreError>;
}
