use tokio::sync::mpsc;

use crate::client_method;
use crate::domain::Product;
use crate::error::CatalogError;
use crate::messages::{CatalogRequest, Confirmation};

/// Client for the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    sender: mpsc::Sender<CatalogRequest>,
}

impl CatalogClient {
    pub fn new(sender: mpsc::Sender<CatalogRequest>) -> Self {
        Self { sender }
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(CatalogRequest::Shutdown).await;
    }
}

client_method!(CatalogClient => fn reload() -> usize as CatalogRequest::Reload, Error = CatalogError);
client_method!(CatalogClient => fn snapshot() -> Vec<Product> as CatalogRequest::Snapshot, Error = CatalogError);
client_method!(CatalogClient => fn save(product: Product) -> i64 as CatalogRequest::Save, Error = CatalogError);
client_method!(CatalogClient => fn delete(product_id: i64, confirmation: Confirmation) -> bool as CatalogRequest::Delete, Error = CatalogError);
