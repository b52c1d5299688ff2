use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::clients::{CatalogClient, FeedbackClient, OrderClient};
use crate::config::AppConfig;
use crate::console::notify::NoticeSender;
use crate::controllers::{Catalog, FeedbackDesk, OrderBoard};
use crate::error::SessionError;
use crate::poll::RefreshScheduler;
use crate::session::SessionGate;
use crate::store::{HttpStore, RemoteStore};

/// The authenticated console: controller actors, their clients, and the
/// refresh scheduler.
///
/// Everything here is session-scoped. Login builds it, logout tears it down;
/// nothing survives the session boundary, so a re-login starts from a clean
/// reload of every collection.
pub struct ConsoleSystem {
    pub orders: OrderClient,
    pub catalog: CatalogClient,
    pub feedback: FeedbackClient,
    gate: SessionGate,
    scheduler: Option<RefreshScheduler>,
    poll_period: Duration,
    notices: NoticeSender,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Gates on the shared secret, then brings the console up against the
    /// HTTP store. A wrong secret fetches nothing.
    pub async fn login(
        config: &AppConfig,
        entered_secret: &str,
        notices: NoticeSender,
    ) -> Result<Self, SessionError> {
        let mut gate = SessionGate::new(config.admin_secret.clone());
        gate.login(entered_secret)?;
        let store: Arc<dyn RemoteStore> =
            Arc::new(HttpStore::new(config.api_base.clone(), entered_secret));
        Ok(Self::start(gate, store, notices, config.poll_interval).await)
    }

    /// Spawns the controller actors over `store`, performs the initial loads,
    /// and starts polling. Tests call this directly with an in-memory store
    /// and an unlocked gate.
    pub async fn start(
        gate: SessionGate,
        store: Arc<dyn RemoteStore>,
        notices: NoticeSender,
        poll_period: Duration,
    ) -> Self {
        let (board, orders) = OrderBoard::new(32, store.clone(), notices.clone());
        let board_handle = tokio::spawn(board.run());

        let (catalog_actor, catalog) = Catalog::new(32, store.clone(), notices.clone());
        let catalog_handle = tokio::spawn(catalog_actor.run());

        let (desk, feedback) = FeedbackDesk::new(32, store, notices.clone());
        let desk_handle = tokio::spawn(desk.run());

        // Initial loads. Failures surface as notices and the next poll cycle
        // retries the read side naturally.
        let initial_orders = match orders.reload().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Initial order load failed");
                0
            }
        };
        if let Err(e) = catalog.reload().await {
            warn!(error = %e, "Initial product load failed");
        }
        if let Err(e) = feedback.reload().await {
            warn!(error = %e, "Initial feedback load failed");
        }

        let mut system = Self {
            orders,
            catalog,
            feedback,
            gate,
            scheduler: None,
            poll_period,
            notices,
            handles: vec![board_handle, catalog_handle, desk_handle],
        };
        system.start_polling(initial_orders);
        info!("Console system started");
        system
    }

    /// Starts the refresh scheduler, superseding (cancelling) any prior one.
    /// Exactly one scheduler is active at a time.
    pub fn start_polling(&mut self, initial_orders: usize) {
        let scheduler = RefreshScheduler::start(
            self.orders.clone(),
            self.feedback.clone(),
            self.notices.clone(),
            self.poll_period,
            initial_orders,
        );
        if let Some(old) = self.scheduler.replace(scheduler) {
            old.cancel();
        }
    }

    pub fn refresh_now(&self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.refresh_now();
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// Logout: lock the gate and cancel polling first so no timer runs
    /// un-authenticated, then stop the actors and wait for them to drain.
    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down console system");
        self.gate.logout();
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop().await;
        }

        self.orders.shutdown().await;
        self.catalog.shutdown().await;
        self.feedback.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Console system shutdown complete");
        Ok(())
    }
}
