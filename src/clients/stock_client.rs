use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::domain::{Product, ProductId, Stock};
use crate::error::StockApiError;

/// The remote catalogue and stock service.
#[async_trait]
pub trait StockApi: Send + Sync + 'static {
    async fn product(&self, id: ProductId) -> Result<Product, StockApiError>;
    async fn stock(&self, id: ProductId) -> Result<Stock, StockApiError>;
    /// Overwrites the stock level of `stock.id`.
    async fn set_stock(&self, stock: Stock) -> Result<(), StockApiError>;
}

#[derive(Deserialize)]
struct StockBody {
    amount: u32,
}

#[derive(Serialize)]
struct StockPatch {
    id: ProductId,
    amount: u32,
}

/// [`StockApi`] over HTTP/JSON:
/// `GET /products/{id}`, `GET /stock/{id}`, `PATCH /stock/{id}`.
#[derive(Clone, Debug)]
pub struct HttpStockApi {
    client: Client,
    base_url: String,
}

impl HttpStockApi {
    pub fn new(config: &ApiConfig) -> Result<Self, StockApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| StockApiError::InvalidUrl(config.base_url.clone()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| StockApiError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/products/{id}", self.base_url)
    }

    fn stock_url(&self, id: ProductId) -> String {
        format!("{}/stock/{id}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, StockApiError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| StockApiError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(StockApiError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| StockApiError::Decode { url, source })
    }
}

#[async_trait]
impl StockApi for HttpStockApi {
    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, StockApiError> {
        debug!("Sending request");
        self.get_json(self.product_url(id)).await
    }

    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, StockApiError> {
        debug!("Sending request");
        let body: StockBody = self.get_json(self.stock_url(id)).await?;
        Ok(Stock {
            id,
            amount: body.amount,
        })
    }

    #[instrument(skip(self), fields(product_id = stock.id, amount = stock.amount))]
    async fn set_stock(&self, stock: Stock) -> Result<(), StockApiError> {
        debug!("Sending request");
        let url = self.stock_url(stock.id);
        let response = self
            .client
            .patch(&url)
            .json(&StockPatch {
                id: stock.id,
                amount: stock.amount,
            })
            .send()
            .await
            .map_err(|source| StockApiError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(StockApiError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }
}
