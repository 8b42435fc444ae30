pub(crate) mod de;
pub(crate) mod product;
mod promo;
mod shop;

pub use de::{parse_timestamp_ms, RawDate};
pub use product::{ImageRef, Product, Review, Reviewer};
pub use promo::ShopEvent;
pub use shop::{category_title, Category, RatingSummary, Shop};

#[cfg(test)]
pub(crate) use promo::shop_event;
