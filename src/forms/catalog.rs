//! Product listing inputs: the search box and the filter widgets.

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Catalog search: keeps the structured filters.
    #[default]
    Catalog,
    /// Site-wide search from the header.
    Global,
}

#[derive(Debug, Deserialize)]
/// Query of `GET /products/search`. The current filters travel in the same
/// query string as hidden inputs.
pub struct SearchForm {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub scope: SearchScope,
}

#[derive(Debug, Deserialize)]
/// Body of `POST /products/filter`.
///
/// `query` carries the current listing query; `value` repeats for
/// multi-select dimensions. Parsed with `serde_html_form`.
pub struct FilterForm {
    #[serde(default)]
    pub query: String,
    pub dimension: String,
    #[serde(default)]
    pub value: Vec<String>,
}
