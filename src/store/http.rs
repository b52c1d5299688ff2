use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{OrderUpdate, RemoteStore, StoreError};
use crate::domain::{FeedbackMessage, Order, Product};

/// Header carrying the shared admin secret on every call. The server is
/// trusted to reject invalid credentials.
const SECRET_HEADER: &str = "X-Admin-Password";

/// reqwest client for the admin API: a single endpoint where an `action`
/// query parameter selects the operation.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    secret: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            secret: secret.into(),
        }
    }

    fn request(&self, method: Method, action: &str) -> RequestBuilder {
        self.client
            .request(method, &self.base_url)
            .query(&[("action", action)])
            .header(SECRET_HEADER, &self.secret)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = builder.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(StoreError::Unauthorized),
            status => Err(StoreError::Rejected(status.as_u16())),
        }
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
struct OrdersEnvelope {
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct FeedbackEnvelope {
    feedback: Vec<FeedbackMessage>,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
    id: i64,
}

#[async_trait]
impl RemoteStore for HttpStore {
    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        debug!("Fetching order collection");
        let response = self.send(self.request(Method::GET, "list_orders")).await?;
        let envelope: OrdersEnvelope = Self::decode(response).await?;
        Ok(envelope.orders)
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        debug!("Fetching product collection");
        let response = self.send(self.request(Method::GET, "list_products")).await?;
        let envelope: ProductsEnvelope = Self::decode(response).await?;
        Ok(envelope.products)
    }

    #[instrument(skip(self))]
    async fn list_feedback(&self) -> Result<Vec<FeedbackMessage>, StoreError> {
        debug!("Fetching feedback collection");
        let response = self.send(self.request(Method::GET, "list_feedback")).await?;
        let envelope: FeedbackEnvelope = Self::decode(response).await?;
        Ok(envelope.feedback)
    }

    #[instrument(skip(self, update))]
    async fn update_order(&self, order_id: i64, update: OrderUpdate) -> Result<(), StoreError> {
        debug!("Updating order");
        let body = update.into_body(order_id);
        self.send(self.request(Method::PUT, "update_order").json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, order_id: i64) -> Result<(), StoreError> {
        debug!("Deleting order");
        let body = json!({ "order_id": order_id });
        self.send(self.request(Method::DELETE, "delete_order").json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: &Product) -> Result<i64, StoreError> {
        debug!("Creating product");
        let body = json!({
            "name": product.name,
            "description": product.description,
            "price": product.price,
            "emoji": product.emoji,
        });
        let response = self
            .send(self.request(Method::POST, "add_product").json(&body))
            .await?;
        let envelope: CreatedEnvelope = Self::decode(response).await?;
        Ok(envelope.id)
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        debug!("Updating product");
        self.send(self.request(Method::PUT, "update_product").json(product))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product_id: i64) -> Result<(), StoreError> {
        debug!("Deleting product");
        let body = json!({ "product_id": product_id });
        self.send(self.request(Method::DELETE, "delete_product").json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, reply))]
    async fn reply_feedback(&self, message_id: i64, reply: &str) -> Result<(), StoreError> {
        debug!("Sending feedback reply");
        let body = json!({ "message_id": message_id, "admin_reply": reply });
        self.send(self.request(Method::POST, "reply_feedback").json(&body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http::{canned, one_shot_server};

    #[tokio::test]
    async fn rejected_secret_maps_to_unauthorized() {
        let (addr, server) = one_shot_server(canned("401 Unauthorized", "")).await;
        let store = HttpStore::new(format!("http://{addr}"), "wrong-secret");

        let result = store.list_orders().await;

        assert!(matches!(result, Err(StoreError::Unauthorized)));
        // The call still went out in protocol shape: action selector in the
        // query, secret in the header.
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /?action=list_orders"));
        assert!(request
            .to_ascii_lowercase()
            .contains("x-admin-password: wrong-secret"));
    }

    #[tokio::test]
    async fn other_failure_statuses_map_to_rejected() {
        let (addr, _server) = one_shot_server(canned("503 Service Unavailable", "")).await;
        let store = HttpStore::new(format!("http://{addr}"), "easyshop25");

        let result = store.delete_order(4).await;

        assert!(matches!(result, Err(StoreError::Rejected(503))));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode() {
        let (addr, _server) = one_shot_server(canned("200 OK", "not json")).await;
        let store = HttpStore::new(format!("http://{addr}"), "easyshop25");

        let result = store.list_products().await;

        assert!(matches!(result, Err(StoreError::Decode(_))));
    }
}
