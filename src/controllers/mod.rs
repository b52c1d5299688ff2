//! Controller actors, one per remotely-owned collection.
//!
//! Each actor owns its in-memory collection exclusively while a session is
//! authenticated and reconciles with the remote store by reloading the whole
//! collection after every successful mutation.

pub mod catalog;
pub mod feedback;
pub mod orders;

pub use catalog::Catalog;
pub use feedback::FeedbackDesk;
pub use orders::OrderBoard;
