//! HTTP client for the Tally server API

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult};
use shared::models::{
    Category, CategoryInput, CategorySave, CheckoutRequest, Product, ProductInput, ProductSave,
    Stats, StockHistory,
};
use shared::response::{CheckoutResult, CreateResult, DeleteResult, UpdateResult};

/// HTTP client for making network requests to the Tally server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Map the HTTP response onto the client error taxonomy.
    ///
    /// 409 carries the server's current row in the body; it is decoded
    /// here so callers (and the sync coordinator) can act on the snapshot.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::CONFLICT {
                let body: serde_json::Value = response.json().await?;
                return Err(ClientError::Conflict {
                    current: body.get("current").cloned().unwrap_or(serde_json::Value::Null),
                });
            }

            let text = response.text().await?;
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(text);

            return match status {
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                _ => Err(ClientError::Server(message)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Catalog API ==========

    pub async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
        self.get("/api/products").await
    }

    pub async fn fetch_categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/api/categories").await
    }

    pub async fn create_product(&self, product: &ProductInput) -> ClientResult<CreateResult> {
        self.post("/api/products", product).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        product: &ProductInput,
    ) -> ClientResult<UpdateResult> {
        self.put(&format!("/api/products/{id}"), product).await
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<DeleteResult> {
        self.delete(&format!("/api/products/{id}")).await
    }

    pub async fn create_category(&self, category: &CategoryInput) -> ClientResult<CreateResult> {
        self.post("/api/categories", category).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        category: &CategoryInput,
    ) -> ClientResult<UpdateResult> {
        self.put(&format!("/api/categories/{id}"), category).await
    }

    pub async fn delete_category(&self, id: i64) -> ClientResult<DeleteResult> {
        self.delete(&format!("/api/categories/{id}")).await
    }

    // ========== Checkout and reporting ==========

    pub async fn checkout(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResult> {
        self.post("/api/checkout", request).await
    }

    pub async fn fetch_stats(&self, threshold: Option<i64>) -> ClientResult<Stats> {
        match threshold {
            Some(t) => self.get(&format!("/api/stats?threshold={t}")).await,
            None => self.get("/api/stats").await,
        }
    }

    pub async fn fetch_product_history(&self, id: i64) -> ClientResult<Vec<StockHistory>> {
        self.get(&format!("/api/products/{id}/history")).await
    }
}

#[async_trait::async_trait]
impl crate::sync::SyncTransport for HttpClient {
    async fn checkout(&self, request: &CheckoutRequest) -> ClientResult<()> {
        HttpClient::checkout(self, request).await.map(|_| ())
    }

    async fn save_product(&self, save: &ProductSave) -> ClientResult<()> {
        match save.id {
            Some(id) => self.update_product(id, &save.input).await.map(|_| ()),
            None => self.create_product(&save.input).await.map(|_| ()),
        }
    }

    async fn save_category(&self, save: &CategorySave) -> ClientResult<()> {
        match save.id {
            Some(id) => self.update_category(id, &save.input).await.map(|_| ()),
            None => self.create_category(&save.input).await.map(|_| ()),
        }
    }
}
