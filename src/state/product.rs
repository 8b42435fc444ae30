use rust_decimal::Decimal;
use serde::Deserialize;

use super::de::null_as_default;

/// Product as returned by the backend. Numeric fields are optional because
/// sellers can leave them blank; filters treat a missing value as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Category id
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename = "discountPrice", default)]
    pub discount_price: Option<Decimal>,
    #[serde(rename = "originalPrice", default)]
    pub original_price: Option<Decimal>,
    /// Average rating, 0-5
    #[serde(default)]
    pub ratings: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ImageRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sold_out: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
    #[serde(rename = "shopId", default, deserialize_with = "null_as_default")]
    pub shop_id: String,
}

/// Images come back either as bare URL strings or as upload records.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Record {
        #[serde(default)]
        url: Option<String>,
    },
}

impl ImageRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Url(url) => Some(url),
            ImageRef::Record { url } => url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub user: Option<Reviewer>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reviewer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Product {
    /// Percentage off the original price.
    /// None when either price is missing or the original is not positive.
    pub fn discount_percent(&self) -> Option<Decimal> {
        let original = self.original_price?;
        let discounted = self.discount_price?;
        if original <= Decimal::ZERO {
            return None;
        }
        Some((original - discounted) / original * Decimal::ONE_HUNDRED)
    }

    /// Rating rounded half away from zero; missing counts as 0.
    pub fn rounded_rating(&self) -> i64 {
        self.ratings.unwrap_or(0.0).round() as i64
    }

    /// First image URL, if the product has one.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.iter().find_map(ImageRef::url)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
pub(crate) fn product(name: &str, discount_price: Decimal) -> Product {
    Product {
        id: name.to_lowercase(),
        name: name.to_string(),
        description: None,
        category: String::new(),
        discount_price: Some(discount_price),
        original_price: None,
        ratings: None,
        images: Vec::new(),
        stock: 1,
        sold_out: 0,
        reviews: Vec::new(),
        shop_id: "shop".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "_id": "p1",
            "name": "Lamp",
            "category": "lighting",
            "discountPrice": 300,
            "originalPrice": 400,
            "ratings": 4.4,
            "images": [{"public_id": "x", "url": "uploads/lamp.png"}],
            "stock": 3,
            "reviews": [{"user": {"name": "Ana"}, "rating": 5, "comment": "bright"}],
            "shopId": "s1"
        }"#;

        let p: Product = serde_json::from_str(json).unwrap();

        assert_eq!(p.id, "p1");
        assert_eq!(p.discount_price, Some(dec!(300)));
        assert_eq!(p.primary_image(), Some("uploads/lamp.png"));
        assert_eq!(p.reviews.len(), 1);
        assert!(p.in_stock());
    }

    #[test]
    fn test_deserialize_sparse_product() {
        let p: Product = serde_json::from_str(r#"{"_id": "p2", "name": "Desk"}"#).unwrap();

        assert_eq!(p.discount_price, None);
        assert_eq!(p.original_price, None);
        assert_eq!(p.rounded_rating(), 0);
        assert_eq!(p.primary_image(), None);
    }

    #[test]
    fn test_deserialize_null_fields() {
        let json = r#"{
            "_id": "p3",
            "name": "Chair",
            "category": null,
            "discountPrice": 300,
            "images": null,
            "stock": null,
            "reviews": [{"user": {"name": null}, "rating": null}],
            "shopId": null
        }"#;

        let p: Product = serde_json::from_str(json).unwrap();

        assert_eq!(p.category, "");
        assert_eq!(p.shop_id, "");
        assert!(p.images.is_empty());
        assert!(!p.in_stock());
        assert_eq!(p.reviews[0].user.as_ref().unwrap().name, "");
    }

    #[test]
    fn test_discount_percent() {
        let mut p = product("Lamp", dec!(75));
        assert_eq!(p.discount_percent(), None);

        p.original_price = Some(dec!(100));
        assert_eq!(p.discount_percent(), Some(dec!(25)));

        p.original_price = Some(Decimal::ZERO);
        assert_eq!(p.discount_percent(), None);
    }

    #[test]
    fn test_rounded_rating() {
        let mut p = product("Lamp", dec!(1));
        p.ratings = Some(3.5);
        assert_eq!(p.rounded_rating(), 4);
        p.ratings = Some(3.49);
        assert_eq!(p.rounded_rating(), 3);
    }
}
