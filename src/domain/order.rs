use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of an order. Transitions are staff-driven and deliberately
/// unrestricted: backward moves (e.g. completed -> pending) are allowed so
/// staff can correct mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Exhaustive list, in picker order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether entering this status makes the remote store derive the
    /// start/readiness schedule.
    pub fn derives_schedule(self) -> bool {
        matches!(self, OrderStatus::Accepted | OrderStatus::Processing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schedule the store derives when an order enters accepted/processing:
/// work starts now and is provisionally ready three days later.
pub fn derived_schedule(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + Duration::days(3))
}

/// Converts a staff-picked readiness date into the full timestamp sent to the
/// remote store: midnight at the start of the chosen day.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// A customer order. Created by the bot when a customer places an order; this
/// console never creates one. Identity and timestamps are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub telegram_user_id: i64,
    #[serde(default)]
    pub telegram_username: String,
    pub customer_name: String,
    pub product_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub executor: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// The executor name as shown in the UI; empty string means unassigned.
    pub fn executor_text(&self) -> String {
        self.executor.clone().unwrap_or_default()
    }
}

/// Two-tier value for the executor input: `displayed` tracks every keystroke,
/// `confirmed` is the last value the remote store accepted. A failed commit
/// reverts `displayed` to `confirmed` and surfaces the conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorField {
    pub displayed: String,
    pub confirmed: String,
}

impl ExecutorField {
    pub fn settled(value: String) -> Self {
        Self {
            displayed: value.clone(),
            confirmed: value,
        }
    }

    /// True when `displayed` has diverged from what the store last accepted.
    pub fn is_dirty(&self) -> bool {
        self.displayed != self.confirmed
    }
}
