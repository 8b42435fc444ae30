use tracing::{info, warn};

use crate::api::{ApiError, BackendClient, FetchOutcome, ScopeHandle};
use crate::state::{Product, RatingSummary, Shop, ShopEvent};

/// Everything the shop preview page renders.
#[derive(Debug, Clone)]
pub struct ShopPreview {
    pub shop: Shop,
    pub products: Vec<Product>,
    pub events: Vec<ShopEvent>,
    pub rating: RatingSummary,
}

/// Page-level view of a fetch.
#[derive(Debug, Clone, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(T),
    /// Message shown to the user in place of the content
    Failed(String),
}

impl<T> LoadState<T> {
    /// Fold a finished request into the page. Cancelled and superseded
    /// results are stale and leave the state alone.
    pub fn apply(&mut self, outcome: FetchOutcome<T>) {
        match outcome {
            FetchOutcome::Loaded(value) => *self = LoadState::Loaded(value),
            FetchOutcome::Failed(e) => {
                warn!("Failed to load: {}", e);
                *self = LoadState::Failed(user_message(&e));
            }
            FetchOutcome::Cancelled | FetchOutcome::Superseded => {}
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::NotFound(_) => "This shop could not be found.".to_string(),
        ApiError::Http(_) => "Could not reach the store. Please try again.".to_string(),
        ApiError::Status { .. } | ApiError::Decode { .. } => {
            "Something went wrong loading this shop.".to_string()
        }
    }
}

/// Fetch shop, products and events together within `scope`.
pub async fn load_preview(
    client: &BackendClient,
    scope: &ScopeHandle,
    shop_id: &str,
) -> FetchOutcome<ShopPreview> {
    info!(shop_id, "Loading shop preview");

    scope
        .run(async {
            let (shop, products, events) = tokio::try_join!(
                client.shop_info(shop_id),
                client.shop_products(shop_id),
                client.shop_events(shop_id),
            )?;
            let rating = RatingSummary::from_products(&products);
            Ok(ShopPreview {
                shop,
                products,
                events,
                rating,
            })
        })
        .await
}
