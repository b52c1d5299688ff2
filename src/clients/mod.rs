//! Cloneable client handles for the controller actors.

mod catalog;
mod feedback;
pub mod macros;
mod orders;

pub use catalog::CatalogClient;
pub use feedback::FeedbackClient;
pub use orders::OrderClient;
