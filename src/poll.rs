//! Pull-based refresh: a recurring timer plus a manual trigger.
//!
//! Active only while authenticated. Each refresh reloads orders and feedback;
//! growth in the order count raises one new-order notice per growth event.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::clients::{FeedbackClient, OrderClient};
use crate::console::notify::NoticeSender;

/// Default refresh period.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Handle to the running refresh task. Dropping it does not stop the task;
/// call [`RefreshScheduler::cancel`] or [`RefreshScheduler::stop`].
pub struct RefreshScheduler {
    token: CancellationToken,
    trigger: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Starts the refresh loop. `initial_count` seeds growth detection with
    /// the order count from the login-time load.
    pub fn start(
        orders: OrderClient,
        feedback: FeedbackClient,
        notices: NoticeSender,
        period: Duration,
        initial_count: usize,
    ) -> Self {
        let token = CancellationToken::new();
        let (trigger, trigger_rx) = mpsc::channel(1);
        let handle = tokio::spawn(run_loop(
            orders,
            feedback,
            notices,
            period,
            initial_count,
            token.clone(),
            trigger_rx,
        ));
        Self {
            token,
            trigger,
            handle,
        }
    }

    /// Requests an immediate refresh out of band. Coalesces if one is
    /// already queued.
    pub fn refresh_now(&self) {
        let _ = self.trigger.try_send(());
    }

    /// Cancels the loop at its next suspension point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels and waits for the task to finish.
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}

#[instrument(name = "refresh_loop", skip_all, fields(period_ms = period.as_millis() as u64))]
async fn run_loop(
    orders: OrderClient,
    feedback: FeedbackClient,
    notices: NoticeSender,
    period: Duration,
    initial_count: usize,
    token: CancellationToken,
    mut trigger_rx: mpsc::Receiver<()>,
) {
    info!("Refresh loop starting");
    let mut last_count = initial_count;
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // An interval's first tick completes immediately; the login-time load
    // already happened, so consume it.
    ticks.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticks.tick() => {}
            Some(()) = trigger_rx.recv() => debug!("Manual refresh"),
        }

        match orders.reload().await {
            Ok(count) => {
                // One notice per growth event, never one per new order, and
                // never for the first orders of an empty board.
                if last_count > 0 && count > last_count {
                    info!(new = count - last_count, "New orders arrived");
                    notices.new_orders(count - last_count);
                }
                last_count = count;
            }
            Err(e) => warn!(error = %e, "Order refresh failed"),
        }

        if let Err(e) = feedback.reload().await {
            warn!(error = %e, "Feedback refresh failed");
        }
    }
    info!("Refresh loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::notify::{Notice, NoticeSender};
    use crate::controllers::{FeedbackDesk, OrderBoard};
    use crate::domain::OrderStatus;
    use crate::store::RemoteStore;
    use crate::test_store::{sample_order, TestStore};
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::advance;

    struct Rig {
        store: Arc<TestStore>,
        orders: OrderClient,
        scheduler: RefreshScheduler,
        notices: UnboundedReceiver<Notice>,
    }

    async fn rig(initial_orders: usize) -> Rig {
        let store = Arc::new(TestStore::new());
        for i in 0..initial_orders {
            store.push_order(sample_order(i as i64 + 1, OrderStatus::Pending));
        }
        let (notices, notice_rx) = NoticeSender::channel();
        let dyn_store: Arc<dyn RemoteStore> = store.clone();
        let (board, orders) = OrderBoard::new(8, dyn_store.clone(), notices.clone());
        tokio::spawn(board.run());
        let (desk, feedback) = FeedbackDesk::new(8, dyn_store, notices.clone());
        tokio::spawn(desk.run());
        let initial = orders.reload().await.unwrap();
        let scheduler = RefreshScheduler::start(
            orders.clone(),
            feedback,
            notices,
            POLL_INTERVAL,
            initial,
        );
        // Let the spawned scheduler task start its interval before the test
        // advances the paused clock.
        settle().await;
        Rig {
            store,
            orders,
            scheduler,
            notices: notice_rx,
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn growth_raises_exactly_one_notice() {
        let mut rig = rig(2).await;

        rig.store.push_order(sample_order(3, OrderStatus::Pending));
        advance(POLL_INTERVAL).await;
        settle().await;

        assert_eq!(rig.notices.try_recv(), Ok(Notice::NewOrders { count: 1 }));

        // Same count again: no further notice.
        advance(POLL_INTERVAL).await;
        settle().await;
        assert!(rig.notices.try_recv().is_err());

        rig.scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn growth_by_several_orders_is_still_one_notice() {
        let mut rig = rig(1).await;

        rig.store.push_order(sample_order(2, OrderStatus::Pending));
        rig.store.push_order(sample_order(3, OrderStatus::Pending));
        rig.store.push_order(sample_order(4, OrderStatus::Pending));
        advance(POLL_INTERVAL).await;
        settle().await;

        assert_eq!(rig.notices.try_recv(), Ok(Notice::NewOrders { count: 3 }));
        assert!(rig.notices.try_recv().is_err());

        rig.scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn first_orders_on_an_empty_board_raise_no_notice() {
        let mut rig = rig(0).await;

        rig.store.push_order(sample_order(1, OrderStatus::Pending));
        advance(POLL_INTERVAL).await;
        settle().await;

        assert!(rig.notices.try_recv().is_err());

        // But the baseline updated: the next growth does notify.
        rig.store.push_order(sample_order(2, OrderStatus::Pending));
        advance(POLL_INTERVAL).await;
        settle().await;
        assert_eq!(rig.notices.try_recv(), Ok(Notice::NewOrders { count: 1 }));

        rig.scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn manual_trigger_refreshes_between_ticks() {
        let rig = rig(1).await;

        rig.store.push_order(sample_order(2, OrderStatus::Pending));
        rig.scheduler.refresh_now();
        settle().await;

        assert_eq!(rig.orders.snapshot().await.unwrap().len(), 2);

        rig.scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_observable_on_the_handle() {
        let rig = rig(0).await;
        assert!(!rig.scheduler.is_cancelled());
        rig.scheduler.cancel();
        assert!(rig.scheduler.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_scheduler_stops_fetching() {
        let rig = rig(1).await;

        rig.scheduler.stop().await;
        let calls_before = rig.store.calls().len();

        advance(POLL_INTERVAL).await;
        advance(POLL_INTERVAL).await;
        settle().await;

        assert_eq!(rig.store.calls().len(), calls_before);
    }
}
