use serde::Deserialize;

use super::de::null_as_default;
use super::Product;

/// Seller profile shown in the preview sidebar.
#[derive(Debug, Clone, Deserialize)]
pub struct Shop {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "phoneNumber", alias = "phone", default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Title for a category id, falling back to the id itself.
pub fn category_title<'a>(categories: &'a [Category], id: &'a str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map_or(id, |c| c.title.as_str())
}

/// Aggregate rating across a shop's products.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    /// Mean of the products that carry a rating; 0 when none do
    pub average: f64,
    pub rated_products: usize,
    pub review_count: usize,
}

impl RatingSummary {
    pub fn from_products(products: &[Product]) -> Self {
        let rated: Vec<f64> = products.iter().filter_map(|p| p.ratings).collect();
        let review_count = products.iter().map(|p| p.reviews.len()).sum();
        let average = if rated.is_empty() {
            0.0
        } else {
            rated.iter().sum::<f64>() / rated.len() as f64
        };

        Self {
            average,
            rated_products: rated.len(),
            review_count,
        }
    }
}
