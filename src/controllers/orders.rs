use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::OrderClient;
use crate::console::notify::NoticeSender;
use crate::domain::{midnight_utc, ExecutorField, Order, OrderStatus};
use crate::error::OrderError;
use crate::messages::{Confirmation, OrderRequest};
use crate::store::{OrderUpdate, RemoteStore, StoreError};

/// Actor owning the order collection.
///
/// Every successful mutation except the executor local echo ends in a full
/// collection reload, so the view converges to server-authoritative state and
/// races between the poll timer and user actions resolve to the last reload.
pub struct OrderBoard {
    receiver: mpsc::Receiver<OrderRequest>,
    store: Arc<dyn RemoteStore>,
    notices: NoticeSender,
    orders: Vec<Order>,
    /// Two-tier executor values for rows with an edit in progress.
    executor_edits: HashMap<i64, ExecutorField>,
}

impl OrderBoard {
    pub fn new(
        buffer_size: usize,
        store: Arc<dyn RemoteStore>,
        notices: NoticeSender,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let board = Self {
            receiver,
            store,
            notices,
            orders: Vec::new(),
            executor_edits: HashMap::new(),
        };
        (board, OrderClient::new(sender))
    }

    #[instrument(name = "order_board", skip(self))]
    pub async fn run(mut self) {
        info!("Order board starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::Reload { respond_to } => {
                    let _ = respond_to.send(self.handle_reload().await);
                }
                OrderRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.snapshot()));
                }
                OrderRequest::SetStatus {
                    order_id,
                    status,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_set_status(order_id, status).await);
                }
                OrderRequest::EditExecutor {
                    order_id,
                    text,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_edit_executor(order_id, text));
                }
                OrderRequest::CommitExecutor {
                    order_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_commit_executor(order_id).await);
                }
                OrderRequest::ExecutorField {
                    order_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.executor_field(order_id));
                }
                OrderRequest::SetEndDate {
                    order_id,
                    date,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_set_end_date(order_id, date).await);
                }
                OrderRequest::Delete {
                    order_id,
                    confirmation,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_delete(order_id, confirmation).await);
                }
                OrderRequest::Shutdown => {
                    info!("Order board shutting down");
                    break;
                }
            }
        }
        info!("Order board stopped");
    }

    #[instrument(skip(self))]
    async fn handle_reload(&mut self) -> Result<usize, OrderError> {
        self.orders = self
            .store
            .list_orders()
            .await
            .map_err(|e| self.store_failure("load orders", e))?;
        self.prune_executor_edits();
        debug!(count = self.orders.len(), "Order collection reloaded");
        Ok(self.orders.len())
    }

    #[instrument(fields(order_id = order_id), skip(self))]
    async fn handle_set_status(
        &mut self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<(), OrderError> {
        if !self.contains(order_id) {
            return Err(OrderError::NotFound(order_id));
        }
        info!(%status, "Changing order status");
        self.store
            .update_order(order_id, OrderUpdate::Status(status))
            .await
            .map_err(|e| self.store_failure("change status", e))?;
        // No optimistic patch: reload so the derived schedule reflects
        // server-computed truth.
        self.handle_reload().await?;
        Ok(())
    }

    fn handle_edit_executor(&mut self, order_id: i64, text: String) -> Result<(), OrderError> {
        let confirmed = self
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .map(Order::executor_text)
            .ok_or(OrderError::NotFound(order_id))?;
        let field = self
            .executor_edits
            .entry(order_id)
            .or_insert_with(|| ExecutorField::settled(confirmed));
        field.displayed = text;
        Ok(())
    }

    #[instrument(fields(order_id = order_id), skip(self))]
    async fn handle_commit_executor(&mut self, order_id: i64) -> Result<String, OrderError> {
        if !self.contains(order_id) {
            return Err(OrderError::NotFound(order_id));
        }
        let Some(field) = self.executor_edits.get(&order_id) else {
            return self.executor_field(order_id).map(|f| f.displayed);
        };
        if !field.is_dirty() {
            let value = field.displayed.clone();
            self.executor_edits.remove(&order_id);
            return Ok(value);
        }
        let displayed = field.displayed.clone();
        let confirmed = field.confirmed.clone();

        match self
            .store
            .update_order(order_id, OrderUpdate::Executor(displayed.clone()))
            .await
        {
            Ok(()) => {
                // The field is already locally correct; no reload needed.
                if let Some(order) = self.order_mut(order_id) {
                    order.executor = Some(displayed.clone());
                }
                self.executor_edits.remove(&order_id);
                Ok(displayed)
            }
            Err(e) => {
                // Strict reconciliation: revert the displayed value to the
                // last confirmed one and surface the conflict.
                error!(error = %e, "Executor update failed, reverting");
                self.notices.error(format!(
                    "Failed to assign executor for order {order_id}: {e}; reverted to \"{confirmed}\""
                ));
                self.executor_edits.remove(&order_id);
                Err(OrderError::Store(e.to_string()))
            }
        }
    }

    #[instrument(fields(order_id = order_id), skip(self))]
    async fn handle_set_end_date(
        &mut self,
        order_id: i64,
        date: NaiveDate,
    ) -> Result<(), OrderError> {
        if !self.contains(order_id) {
            return Err(OrderError::NotFound(order_id));
        }
        // Explicit edits always win over the derived value and go out as a
        // full timestamp at the chosen day's midnight.
        let ts = midnight_utc(date);
        info!(end_date = %ts, "Setting readiness date");
        self.store
            .update_order(order_id, OrderUpdate::EndDate(ts))
            .await
            .map_err(|e| self.store_failure("set readiness date", e))?;
        self.handle_reload().await?;
        Ok(())
    }

    #[instrument(fields(order_id = order_id), skip(self))]
    async fn handle_delete(
        &mut self,
        order_id: i64,
        confirmation: Confirmation,
    ) -> Result<bool, OrderError> {
        if confirmation == Confirmation::Declined {
            debug!("Delete declined, no remote call");
            return Ok(false);
        }
        if !self.contains(order_id) {
            return Err(OrderError::NotFound(order_id));
        }
        info!("Deleting order");
        self.store
            .delete_order(order_id)
            .await
            .map_err(|e| self.store_failure("delete order", e))?;
        self.handle_reload().await?;
        Ok(true)
    }

    /// The collection as the UI sees it: server rows with any in-progress
    /// executor edit echoed in.
    fn snapshot(&self) -> Vec<Order> {
        let mut rows = self.orders.clone();
        for row in &mut rows {
            if let Some(field) = self.executor_edits.get(&row.id) {
                row.executor = Some(field.displayed.clone());
            }
        }
        rows
    }

    fn executor_field(&self, order_id: i64) -> Result<ExecutorField, OrderError> {
        let order = self
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        Ok(self
            .executor_edits
            .get(&order_id)
            .cloned()
            .unwrap_or_else(|| ExecutorField::settled(order.executor_text())))
    }

    /// After a reload, drop edits for vanished rows and re-anchor the
    /// confirmed tier of surviving edits to the fresh server value.
    fn prune_executor_edits(&mut self) {
        let orders = &self.orders;
        self.executor_edits.retain(|id, field| {
            match orders.iter().find(|o| o.id == *id) {
                Some(order) if field.is_dirty() => {
                    field.confirmed = order.executor_text();
                    true
                }
                _ => false,
            }
        });
    }

    fn contains(&self, order_id: i64) -> bool {
        self.orders.iter().any(|o| o.id == order_id)
    }

    fn order_mut(&mut self, order_id: i64) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == order_id)
    }

    fn store_failure(&self, what: &str, err: StoreError) -> OrderError {
        error!(error = %err, "Remote call failed");
        self.notices.error(format!("Failed to {what}: {err}"));
        OrderError::Store(err.to_string())
    }
}
