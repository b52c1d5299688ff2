use serde::{Deserialize, Serialize};

/// A catalog product, managed entirely through this console.
///
/// An `id` of 0 means "new, not yet persisted": saving such a product issues a
/// create call; any non-zero id issues an update. The save path branches on
/// this alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    pub emoji: String,
    pub name: String,
    pub description: String,
    /// Price in whole currency units, non-negative.
    pub price: u64,
}

impl Product {
    /// A blank product ready for the editor form.
    pub fn draft() -> Self {
        Self {
            id: 0,
            emoji: String::new(),
            name: String::new(),
            description: String::new(),
            price: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
