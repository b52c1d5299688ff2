use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::client_method;
use crate::domain::{ExecutorField, Order, OrderStatus};
use crate::error::OrderError;
use crate::messages::{Confirmation, OrderRequest};

/// Client for the order board actor. Thin wrapper around the message
/// channel with automatic error handling.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(OrderRequest::Shutdown).await;
    }
}

client_method!(OrderClient => fn reload() -> usize as OrderRequest::Reload, Error = OrderError);
client_method!(OrderClient => fn snapshot() -> Vec<Order> as OrderRequest::Snapshot, Error = OrderError);
client_method!(OrderClient => fn set_status(order_id: i64, status: OrderStatus) -> () as OrderRequest::SetStatus, Error = OrderError);
client_method!(OrderClient => fn edit_executor(order_id: i64, text: String) -> () as OrderRequest::EditExecutor, Error = OrderError);
client_method!(OrderClient => fn commit_executor(order_id: i64) -> String as OrderRequest::CommitExecutor, Error = OrderError);
client_method!(OrderClient => fn executor_field(order_id: i64) -> ExecutorField as OrderRequest::ExecutorField, Error = OrderError);
client_method!(OrderClient => fn set_end_date(order_id: i64, date: NaiveDate) -> () as OrderRequest::SetEndDate, Error = OrderError);
client_method!(OrderClient => fn delete(order_id: i64, confirmation: Confirmation) -> bool as OrderRequest::Delete, Error = OrderError);
