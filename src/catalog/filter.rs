use std::collections::BTreeSet;

use super::buckets::{DISCOUNT_BUCKETS, PRICE_BUCKETS, RATING_BUCKETS};
use crate::state::Product;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Active filters on the "all products" listing.
///
/// Dimensions combine with AND; selected buckets within one dimension
/// combine with OR. Bucket sets hold indices into the static tables, and
/// indices past the end of a table never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: Option<String>,
    pub prices: BTreeSet<usize>,
    pub discounts: BTreeSet<usize>,
    pub ratings: BTreeSet<usize>,
    pub search: String,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.category.as_deref().map_or(true, str::is_empty)
            && self.prices.is_empty()
            && self.discounts.is_empty()
            && self.ratings.is_empty()
            && self.search.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a single product passes every active dimension.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product)
            && self.matches_price(product)
            && self.matches_discount(product)
            && self.matches_rating(product)
            && self.matches_search(product)
    }

    fn matches_category(&self, product: &Product) -> bool {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => product.category == category,
            _ => true,
        }
    }

    fn matches_price(&self, product: &Product) -> bool {
        if self.prices.is_empty() {
            return true;
        }
        let Some(price) = product.discount_price else {
            return false;
        };
        self.prices
            .iter()
            .filter_map(|&i| PRICE_BUCKETS.get(i))
            .any(|bucket| bucket.contains(price))
    }

    fn matches_discount(&self, product: &Product) -> bool {
        if self.discounts.is_empty() {
            return true;
        }
        let Some(percent) = product.discount_percent() else {
            return false;
        };
        self.discounts
            .iter()
            .filter_map(|&i| DISCOUNT_BUCKETS.get(i))
            .any(|bucket| bucket.contains(percent))
    }

    fn matches_rating(&self, product: &Product) -> bool {
        if self.ratings.is_empty() {
            return true;
        }
        let rating = product.rounded_rating();
        self.ratings
            .iter()
            .filter_map(|&i| RATING_BUCKETS.get(i))
            .any(|bucket| rating >= bucket.min)
    }

    fn matches_search(&self, product: &Product) -> bool {
        let query = self.search.trim();
        if query.is_empty() {
            return true;
        }
        product.name.to_lowercase().starts_with(&query.to_lowercase())
    }
}

/// One page of the filtered listing.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub items: Vec<&'a Product>,
    /// Products passing the filters, across all pages
    pub total_count: usize,
    /// 1-based, after clamping
    pub page: usize,
    pub page_count: usize,
}

impl Page<'_> {
    /// Nothing matched; the listing shows "no products found" instead of a page.
    pub fn is_no_results(&self) -> bool {
        self.total_count == 0
    }
}

/// Number of pages needed for `count` items.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Filter `products` in input order and cut out one page.
///
/// `page` is 1-based and clamped into `1..=page_count`; a zero `page_size`
/// is treated as 1.
pub fn filter_and_paginate<'a>(
    products: &'a [Product],
    selection: &FilterSelection,
    page: usize,
    page_size: usize,
) -> Page<'a> {
    let page_size = page_size.max(1);
    let filtered: Vec<&Product> = products.iter().filter(|p| selection.matches(p)).collect();
    let total_count = filtered.len();
    let pages = page_count(total_count, page_size);
    let page = page.clamp(1, pages.max(1));

    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        total_count,
        page,
        page_count: pages,
    }
}
