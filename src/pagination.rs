//! Page links for the product listing.

use serde::Serialize;

use crate::domain::filters::{FilterDimension, FilterState};

/// Pages always shown at the start and end of the bar.
const EDGE_PAGES: usize = 2;
/// Pages shown before the current one.
const BEFORE_CURRENT: usize = 2;
/// Pages shown after the current one.
const AFTER_CURRENT: usize = 4;

/// Page numbers to render; `None` marks a gap.
fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + EDGE_PAGES).min(total_pages + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(BEFORE_CURRENT));
    let mid_end = (current_page + AFTER_CURRENT + 1).min(total_pages + 1);
    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(EDGE_PAGES) + 1);
    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));

    pages
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PageLink {
    /// `None` for the ellipsis between page groups.
    pub number: Option<usize>,
    pub href: Option<String>,
    pub current: bool,
}

/// Canonical listing URL for `filters`.
pub fn products_href(filters: &FilterState) -> String {
    let query = filters.to_query_string();
    if query.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{query}")
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<PageLink>,
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    /// Builds the page bar. Each link keeps the active filters and only
    /// changes `PageNumber`.
    pub fn new(items: Vec<T>, filters: &FilterState, total_items: usize, page_size: usize) -> Self {
        let page = filters.page().max(1);
        let total_pages = total_items.div_ceil(page_size.max(1));

        let pages = page_window(total_pages, page)
            .into_iter()
            .map(|number| match number {
                Some(number) => {
                    let mut target = filters.clone();
                    target.set(FilterDimension::PageNumber, number.to_string().into());
                    PageLink {
                        number: Some(number),
                        href: Some(products_href(&target)),
                        current: number == page,
                    }
                }
                None => PageLink {
                    number: None,
                    href: None,
                    current: false,
                },
            })
            .collect();

        Self {
            items,
            pages,
            page,
            total_pages,
        }
    }
}
