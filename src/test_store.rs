//! In-memory [`RemoteStore`] double.
//!
//! # Testing Strategy
//! Controllers are tested in isolation against this store instead of a live
//! admin API. The double mirrors the remote contract, including the
//! server-side schedule derivation, records every call for assertions, and
//! can be scripted to fail the next call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{derived_schedule, FeedbackMessage, Order, OrderStatus, Product};
use crate::store::{OrderUpdate, RemoteStore, StoreError};

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListOrders,
    ListProducts,
    ListFeedback,
    UpdateOrder { order_id: i64, update: OrderUpdate },
    DeleteOrder(i64),
    CreateProduct(String),
    UpdateProduct(i64),
    DeleteProduct(i64),
    ReplyFeedback { message_id: i64, reply: String },
}

pub struct TestStore {
    inner: Mutex<Inner>,
}

struct Inner {
    orders: Vec<Order>,
    products: Vec<Product>,
    feedback: Vec<FeedbackMessage>,
    now: DateTime<Utc>,
    failures: VecDeque<StoreError>,
    calls: Vec<Call>,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                orders: Vec::new(),
                products: Vec::new(),
                feedback: Vec::new(),
                now: fixed_now(),
                failures: VecDeque::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// The store's frozen clock, used for schedule derivation.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.lock().unwrap().now
    }

    pub fn push_order(&self, order: Order) {
        self.inner.lock().unwrap().orders.push(order);
    }

    pub fn push_product(&self, product: Product) {
        self.inner.lock().unwrap().products.push(product);
    }

    pub fn push_feedback(&self, message: FeedbackMessage) {
        self.inner.lock().unwrap().feedback.push(message);
    }

    /// Makes the next call fail with `error` (after being recorded).
    pub fn push_failure(&self, error: StoreError) {
        self.inner.lock().unwrap().failures.push_back(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }
}

impl Inner {
    fn record(&mut self, call: Call) -> Result<(), StoreError> {
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteStore for TestStore {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::ListOrders)?;
        Ok(inner.orders.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::ListProducts)?;
        Ok(inner.products.clone())
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackMessage>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::ListFeedback)?;
        Ok(inner.feedback.clone())
    }

    async fn update_order(&self, order_id: i64, update: OrderUpdate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::UpdateOrder {
            order_id,
            update: update.clone(),
        })?;
        let now = inner.now;
        let order = inner
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(StoreError::Rejected(404))?;
        match update {
            OrderUpdate::Status(status) => {
                order.status = status;
                // Server-side rule: entering accepted/processing derives the
                // schedule.
                if status.derives_schedule() {
                    let (start, end) = derived_schedule(now);
                    order.start_date = Some(start);
                    order.end_date = Some(end);
                }
            }
            OrderUpdate::Executor(name) => order.executor = Some(name),
            OrderUpdate::EndDate(ts) => order.end_date = Some(ts),
        }
        Ok(())
    }

    async fn delete_order(&self, order_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::DeleteOrder(order_id))?;
        inner.orders.retain(|o| o.id != order_id);
        Ok(())
    }

    async fn create_product(&self, product: &Product) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::CreateProduct(product.name.clone()))?;
        let id = inner.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let mut created = product.clone();
        created.id = id;
        inner.products.push(created);
        Ok(id)
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::UpdateProduct(product.id))?;
        let existing = inner
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreError::Rejected(404))?;
        *existing = product.clone();
        Ok(())
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::DeleteProduct(product_id))?;
        inner.products.retain(|p| p.id != product_id);
        Ok(())
    }

    async fn reply_feedback(&self, message_id: i64, reply: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(Call::ReplyFeedback {
            message_id,
            reply: reply.to_string(),
        })?;
        let now = inner.now;
        let message = inner
            .feedback
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(StoreError::Rejected(404))?;
        if message.is_replied {
            return Err(StoreError::Rejected(409));
        }
        // admin_reply and replied_at are populated together, exactly once.
        message.admin_reply = Some(reply.to_string());
        message.replied_at = Some(now);
        message.is_replied = true;
        Ok(())
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn sample_order(id: i64, status: OrderStatus) -> Order {
    Order {
        id,
        order_number: format!("ORD-{id:04}"),
        telegram_user_id: 100 + id,
        telegram_username: format!("customer{id}"),
        customer_name: "Ivan".to_string(),
        product_name: "Mug".to_string(),
        notes: None,
        executor: None,
        status,
        start_date: None,
        end_date: None,
        created_at: fixed_now(),
    }
}

pub fn sample_product(id: i64, name: &str) -> Product {
    Product {
        id,
        emoji: "🎁".to_string(),
        name: name.to_string(),
        description: "A fine item".to_string(),
        price: 1000,
    }
}

pub fn sample_feedback(id: i64) -> FeedbackMessage {
    FeedbackMessage {
        id,
        telegram_user_id: 100 + id,
        telegram_username: format!("customer{id}"),
        customer_name: "Ivan".to_string(),
        message: "Where is my order?".to_string(),
        admin_reply: None,
        is_replied: false,
        created_at: fixed_now(),
        replied_at: None,
    }
}
