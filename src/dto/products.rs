use serde::Serialize;

use crate::domain::catalog::{MainCategory, Product, card_subtitle};
use crate::domain::filters::FilterState;
use crate::pagination::Paginated;

/// A product card ready for the listing template.
#[derive(Debug, Serialize)]
pub struct ProductCard {
    pub product: Product,
    pub subtitle: String,
    pub variation_code: Option<String>,
}

impl From<Product> for ProductCard {
    fn from(product: Product) -> Self {
        let variation_code = product.primary_variation().map(str::to_string);
        Self {
            subtitle: card_subtitle(&product),
            variation_code,
            product,
        }
    }
}

/// Current filter values echoed back to the filter widgets.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct FilterView {
    /// `None` for the default sort order.
    pub sort_id: Option<u32>,
    pub main_category_id: Option<u32>,
    pub category_id: Option<u32>,
    pub sub_category_id: Option<u32>,
    pub price_range_id: Option<u32>,
    pub clothing_gender_ids: Vec<u32>,
    pub color_ids: Vec<u32>,
    pub search: String,
    pub q: String,
    pub page: usize,
    pub has_filters: bool,
}

impl From<&FilterState> for FilterView {
    fn from(state: &FilterState) -> Self {
        Self {
            sort_id: state.sort_id().map(|id| id.get()),
            main_category_id: state.main_category_id().map(|id| id.get()),
            category_id: state.category_id().map(|id| id.get()),
            sub_category_id: state.sub_category_id().map(|id| id.get()),
            price_range_id: state.price_range_id().map(|id| id.get()),
            clothing_gender_ids: state.clothing_gender_ids().iter().map(|id| id.get()).collect(),
            color_ids: state.color_ids().iter().map(|id| id.get()).collect(),
            search: state.search().to_string(),
            q: state.global_search().to_string(),
            page: state.page(),
            has_filters: state.has_structured_filters(),
        }
    }
}

/// Data required to render the product listing.
#[derive(Debug, Serialize)]
pub struct ProductsPageData {
    pub title: String,
    pub products: Paginated<ProductCard>,
    pub total: usize,
    pub filters: FilterView,
    pub categories: Vec<MainCategory>,
    /// Canonical query string of the filters, without the leading `?`.
    pub query: String,
}
