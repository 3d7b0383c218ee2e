use serde::{Deserialize, Serialize};

use crate::domain::filters::FilterState;
use crate::domain::types::CatalogId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NamedRef {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductVariation {
    pub code: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub pricing: Pricing,
    pub category: NamedRef,
    pub main_category: NamedRef,
    #[serde(default)]
    pub variations: Vec<ProductVariation>,
}

impl Product {
    /// Code of the variation the product card links to.
    pub fn primary_variation(&self) -> Option<&str> {
        self.variations.first().map(|v| v.code.as_str())
    }
}

/// One page of the product listing as returned by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub items: Vec<Product>,
    #[serde(default)]
    pub total_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MainCategory {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

fn find_main(hierarchy: &[MainCategory], id: CatalogId) -> Option<&MainCategory> {
    hierarchy.iter().find(|main| main.id == id.get())
}

/// Builds the listing heading from the selected category path, e.g.
/// "Women's Products", "Women's Dresses" or "Women's Summer Dresses".
///
/// Returns `None` when no main category is selected or the selection does
/// not exist in the hierarchy.
pub fn page_title(hierarchy: &[MainCategory], filters: &FilterState) -> Option<String> {
    let main = find_main(hierarchy, filters.main_category_id()?)?;

    let Some(category_id) = filters.category_id() else {
        return Some(format!("{}'s Products", main.name));
    };
    let category = main.categories.iter().find(|c| c.id == category_id.get())?;

    match filters.sub_category_id() {
        Some(sub_id) => {
            let sub = category
                .sub_categories
                .iter()
                .find(|s| s.id == sub_id.get())?;
            Some(format!("{}'s {} {}", main.name, sub.name, category.name))
        }
        None => Some(format!("{}'s {}", main.name, category.name)),
    }
}

/// Subtitle shown on a product card: "<Main>'s <Category>".
pub fn card_subtitle(product: &Product) -> String {
    format!("{}'s {}", product.main_category.name, product.category.name)
}
