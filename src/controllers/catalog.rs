use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::CatalogClient;
use crate::console::notify::NoticeSender;
use crate::domain::Product;
use crate::error::CatalogError;
use crate::messages::{CatalogRequest, Confirmation};
use crate::store::{RemoteStore, StoreError};

/// Actor owning the product collection. Products are managed entirely through
/// this console; the remote store is the sole source of validation truth.
pub struct Catalog {
    receiver: mpsc::Receiver<CatalogRequest>,
    store: Arc<dyn RemoteStore>,
    notices: NoticeSender,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(
        buffer_size: usize,
        store: Arc<dyn RemoteStore>,
        notices: NoticeSender,
    ) -> (Self, CatalogClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let catalog = Self {
            receiver,
            store,
            notices,
            products: Vec::new(),
        };
        (catalog, CatalogClient::new(sender))
    }

    #[instrument(name = "catalog", skip(self))]
    pub async fn run(mut self) {
        info!("Catalog starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CatalogRequest::Reload { respond_to } => {
                    let _ = respond_to.send(self.handle_reload().await);
                }
                CatalogRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.products.clone()));
                }
                CatalogRequest::Save {
                    product,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_save(product).await);
                }
                CatalogRequest::Delete {
                    product_id,
                    confirmation,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_delete(product_id, confirmation).await);
                }
                CatalogRequest::Shutdown => {
                    info!("Catalog shutting down");
                    break;
                }
            }
        }
        info!("Catalog stopped");
    }

    #[instrument(skip(self))]
    async fn handle_reload(&mut self) -> Result<usize, CatalogError> {
        self.products = self
            .store
            .list_products()
            .await
            .map_err(|e| self.store_failure("load products", e))?;
        debug!(count = self.products.len(), "Product collection reloaded");
        Ok(self.products.len())
    }

    /// The save path branches on the id alone: 0 means create, anything else
    /// means update. There is no third path.
    #[instrument(fields(product_id = product.id, name = %product.name), skip(self, product))]
    async fn handle_save(&mut self, product: Product) -> Result<i64, CatalogError> {
        let id = if product.is_new() {
            info!("Creating product");
            self.store
                .create_product(&product)
                .await
                .map_err(|e| self.store_failure("create product", e))?
        } else {
            info!("Updating product");
            self.store
                .update_product(&product)
                .await
                .map_err(|e| self.store_failure("update product", e))?;
            product.id
        };
        self.handle_reload().await?;
        Ok(id)
    }

    #[instrument(fields(product_id = product_id), skip(self))]
    async fn handle_delete(
        &mut self,
        product_id: i64,
        confirmation: Confirmation,
    ) -> Result<bool, CatalogError> {
        if confirmation == Confirmation::Declined {
            debug!("Delete declined, no remote call");
            return Ok(false);
        }
        if !self.products.iter().any(|p| p.id == product_id) {
            return Err(CatalogError::NotFound(product_id));
        }
        info!("Deleting product");
        self.store
            .delete_product(product_id)
            .await
            .map_err(|e| self.store_failure("delete product", e))?;
        self.handle_reload().await?;
        Ok(true)
    }

    fn store_failure(&self, what: &str, err: StoreError) -> CatalogError {
        error!(error = %err, "Remote call failed");
        self.notices.error(format!("Failed to {what}: {err}"));
        CatalogError::Store(err.to_string())
    }
}
