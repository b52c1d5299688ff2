//! Business domain entities. Pure data structures with no actor-specific
//! concerns.

pub mod feedback;
pub mod order;
pub mod product;

pub use feedback::*;
pub use order::*;
pub use product::*;
