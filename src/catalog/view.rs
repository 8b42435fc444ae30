use tracing::debug;

use super::filter::{filter_and_paginate, page_count, FilterSelection, Page};
use crate::location::{Navigator, CATEGORY_PARAM, SEARCH_PARAM};
use crate::state::Product;

/// State behind the "all products" listing: loaded products, active
/// filters, and the current page. Category and search stay in sync with the
/// page URL through the navigator; updates replace the current history entry.
pub struct CatalogView<N: Navigator> {
    products: Vec<Product>,
    selection: FilterSelection,
    page: usize,
    page_size: usize,
    navigator: N,
}

impl<N: Navigator> CatalogView<N> {
    /// Seeds the category and search filters from the current URL.
    pub fn new(products: Vec<Product>, page_size: usize, navigator: N) -> Self {
        let location = navigator.current();
        let selection = FilterSelection {
            category: location.query_param(CATEGORY_PARAM),
            search: location.query_param(SEARCH_PARAM).unwrap_or_default(),
            ..Default::default()
        };

        Self {
            products,
            selection,
            page: 1,
            page_size: page_size.max(1),
            navigator,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Filtered slice for the current page.
    pub fn current_page(&self) -> Page<'_> {
        filter_and_paginate(&self.products, &self.selection, self.page, self.page_size)
    }

    pub fn page_count(&self) -> usize {
        let matching = self.products.iter().filter(|p| self.selection.matches(p)).count();
        page_count(matching, self.page_size)
    }

    /// Jump to a page, clamped to the pages that exist.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count().max(1));
    }

    /// Swap in freshly fetched products, keeping the filters.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.set_page(self.page);
    }

    pub fn select_category(&mut self, category: Option<&str>) {
        let category = category.filter(|c| !c.is_empty());
        self.selection.category = category.map(str::to_string);
        self.sync_param(CATEGORY_PARAM, category);
        self.filters_changed();
    }

    pub fn set_search(&mut self, query: &str) {
        self.selection.search = query.to_string();
        let trimmed = query.trim();
        self.sync_param(SEARCH_PARAM, Some(trimmed));
        self.filters_changed();
    }

    pub fn toggle_price(&mut self, bucket: usize) {
        toggle(&mut self.selection.prices, bucket);
        self.filters_changed();
    }

    pub fn toggle_discount(&mut self, bucket: usize) {
        toggle(&mut self.selection.discounts, bucket);
        self.filters_changed();
    }

    pub fn toggle_rating(&mut self, bucket: usize) {
        toggle(&mut self.selection.ratings, bucket);
        self.filters_changed();
    }

    /// Clear every filter, go back to page 1 and drop the URL parameters.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.sync_param(CATEGORY_PARAM, None);
        self.sync_param(SEARCH_PARAM, None);
        self.page = 1;
    }

    fn filters_changed(&mut self) {
        self.page = 1;
        debug!(selection = ?self.selection, "Catalog filters changed");
    }

    fn sync_param(&mut self, key: &str, value: Option<&str>) {
        let next = self.navigator.current().with_query_param(key, value);
        if &next != self.navigator.current() {
            self.navigator.replace(next);
        }
    }
}

fn toggle(set: &mut std::collections::BTreeSet<usize>, bucket: usize) {
    if !set.remove(&bucket) {
        set.insert(bucket);
    }
}
