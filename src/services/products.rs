//! Product listing and the filter/search redirects around it.

use crate::api::CatalogReader;
use crate::domain::catalog::page_title;
use crate::domain::filters::{FilterState, FilterValue};
use crate::dto::products::{FilterView, ProductCard, ProductsPageData};
use crate::forms::catalog::{SearchForm, SearchScope};
use crate::pagination::{Paginated, products_href};
use crate::services::ServiceResult;
use crate::state::store::InMemoryFilterStore;
use crate::state::synchronizer::FilterSynchronizer;

fn fallback_title(filters: &FilterState) -> String {
    if !filters.global_search().is_empty() {
        format!("Results for \"{}\"", filters.global_search())
    } else {
        "All Products".to_string()
    }
}

/// Loads one listing page for the filters encoded in `query`.
///
/// The backend always receives the canonical form of the query. A failure to
/// load the category tree only costs the page its heading.
pub async fn load_products<R>(
    repo: &R,
    query: &str,
    page_size: usize,
) -> ServiceResult<ProductsPageData>
where
    R: CatalogReader + ?Sized,
{
    let filters = FilterState::from_query_str(query);
    let canonical = filters.to_query_string();

    let page = repo.list_products(&canonical).await.map_err(|err| {
        log::error!("Failed to list products for {canonical:?}: {err}");
        err
    })?;

    let categories = repo.list_categories().await.unwrap_or_else(|err| {
        log::warn!("Failed to load category hierarchy: {err}");
        Vec::new()
    });

    let title = page_title(&categories, &filters).unwrap_or_else(|| fallback_title(&filters));
    let cards = page.items.into_iter().map(ProductCard::from).collect();

    Ok(ProductsPageData {
        title,
        products: Paginated::new(cards, &filters, page.total_count, page_size),
        total: page.total_count,
        filters: FilterView::from(&filters),
        categories,
        query: canonical,
    })
}

/// Applies a search box submission to the current filters and returns the
/// canonical listing URL to redirect to.
pub fn apply_search(query: &str, form: &SearchForm) -> String {
    let store = InMemoryFilterStore::from_query(query);
    let sync = FilterSynchronizer::new(&store);
    let term = form.term.trim();
    match form.scope {
        SearchScope::Catalog => sync.handle_search_change(term),
        SearchScope::Global => sync.handle_global_search_change(term),
    }
    products_href(&sync.state())
}

/// Writes one named dimension and returns the canonical listing URL.
/// An unknown dimension name is rejected.
pub fn apply_filter(query: &str, name: &str, values: Vec<String>) -> ServiceResult<String> {
    let store = InMemoryFilterStore::from_query(query);
    let sync = FilterSynchronizer::new(&store);
    let value = if values.iter().all(|value| value.trim().is_empty()) {
        FilterValue::Clear
    } else {
        FilterValue::Many(values)
    };
    sync.set_dimension_by_name(name, value)?;
    Ok(products_href(&sync.state()))
}

/// Clears the structured filters and returns the canonical listing URL.
pub fn reset_filters(query: &str) -> String {
    let store = InMemoryFilterStore::from_query(query);
    let sync = FilterSynchronizer::new(&store);
    sync.reset_filters();
    products_href(&sync.state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;

    fn search(term: &str, scope: SearchScope) -> SearchForm {
        SearchForm {
            term: term.to_string(),
            scope,
        }
    }

    #[test]
    fn catalog_search_keeps_filters() {
        let url = apply_search(
            "MainCategoryId=2&CategoryId=5&PageNumber=3",
            &search("boot", SearchScope::Catalog),
        );
        assert_eq!(
            url,
            "/products?MainCategoryId=2&CategoryId=5&search=boot&PageNumber=1"
        );
    }

    #[test]
    fn global_search_clears_everything_else() {
        let url = apply_search(
            "MainCategoryId=2&ColorId=3&search=boot&PageNumber=4",
            &search("hat", SearchScope::Global),
        );
        assert_eq!(url, "/products?q=hat&PageNumber=1");
    }

    #[test]
    fn apply_filter_rejects_unknown_dimension() {
        let result = apply_filter("", "Brand", vec!["3".to_string()]);
        assert!(matches!(result, Err(ServiceError::Form(_))));

        let url = apply_filter(
            "MainCategoryId=2",
            "ColorId",
            vec!["4".to_string(), "1".to_string(), "4".to_string()],
        )
        .unwrap();
        assert_eq!(url, "/products?MainCategoryId=2&ColorId=4&ColorId=1");

        let url = apply_filter("MainCategoryId=2&ColorId=4", "ColorId", vec![String::new()])
            .unwrap();
        assert_eq!(url, "/products?MainCategoryId=2");
    }

    #[test]
    fn reset_keeps_search_and_page() {
        let url = reset_filters("SortId=2&MainCategoryId=2&search=boot&PageNumber=2");
        assert_eq!(url, "/products?search=boot&PageNumber=2");
    }
}
