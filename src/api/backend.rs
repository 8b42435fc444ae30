use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::error::ApiError;
use crate::state::de::null_as_default;
use crate::state::{Category, Product, Shop, ShopEvent};

/// `{ shop: {...} }`
#[derive(Debug, Deserialize)]
struct ShopEnvelope {
    shop: Shop,
}

/// `{ products: [...] }`
#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    products: Vec<Product>,
}

/// `{ events: [...] }`
#[derive(Debug, Deserialize)]
struct EventsEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<ShopEvent>,
}

/// `{ categories: [...] }`
#[derive(Debug, Deserialize)]
struct CategoriesEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    categories: Vec<Category>,
}

/// Read-only client for the storefront backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch shop profile
    pub async fn shop_info(&self, shop_id: &str) -> Result<Shop, ApiError> {
        let envelope: ShopEnvelope = self.get(&format!("shop/get-shop-info/{shop_id}")).await?;
        Ok(envelope.shop)
    }

    /// Fetch every product listed by a shop
    pub async fn shop_products(&self, shop_id: &str) -> Result<Vec<Product>, ApiError> {
        let envelope: ProductsEnvelope = self
            .get(&format!("product/get-all-products-shop/{shop_id}"))
            .await?;
        Ok(envelope.products)
    }

    /// Fetch a shop's promotional events
    pub async fn shop_events(&self, shop_id: &str) -> Result<Vec<ShopEvent>, ApiError> {
        let envelope: EventsEnvelope = self.get(&format!("event/get-all-events/{shop_id}")).await?;
        Ok(envelope.events)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: CategoriesEnvelope = self.get("category/get-all-categories").await?;
        Ok(envelope.categories)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        decode(&url, &body)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
