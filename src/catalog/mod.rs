mod buckets;
mod filter;
mod view;

pub use buckets::{Bucket, RatingBucket, DISCOUNT_BUCKETS, PRICE_BUCKETS, RATING_BUCKETS};
pub use filter::{filter_and_paginate, page_count, FilterSelection, Page, DEFAULT_PAGE_SIZE};
pub use view::CatalogView;
