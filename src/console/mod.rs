//! System orchestration, notices, startup, and shutdown logic.

pub mod notify;
pub mod system;

pub use notify::{Notice, NoticeSender};
pub use system::ConsoleSystem;

use tracing_subscriber::EnvFilter;

/// Sets up tracing once for the entire application.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
