//! Product-listing filter state and its query-string codec.
//!
//! [`FilterState`] is the single record behind every catalog listing URL.
//! Structured dimensions hold validated catalog identifiers; the two free-text
//! dimensions (`search` and `q`) are mutually exclusive. Parsing never fails:
//! anything that does not fit a dimension is treated as absent.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{CatalogId, PageNumber};

/// Every filter dimension recognized in the product-listing query string,
/// in canonical serialization order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    SortId,
    MainCategoryId,
    CategoryId,
    SubCategoryId,
    PriceRangeId,
    ClothingGenderId,
    ColorId,
    Search,
    GlobalSearch,
    PageNumber,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 10] = [
        FilterDimension::SortId,
        FilterDimension::MainCategoryId,
        FilterDimension::CategoryId,
        FilterDimension::SubCategoryId,
        FilterDimension::PriceRangeId,
        FilterDimension::ClothingGenderId,
        FilterDimension::ColorId,
        FilterDimension::Search,
        FilterDimension::GlobalSearch,
        FilterDimension::PageNumber,
    ];

    /// Query-string key of the dimension. Keys are case-sensitive.
    pub const fn key(self) -> &'static str {
        match self {
            FilterDimension::SortId => "SortId",
            FilterDimension::MainCategoryId => "MainCategoryId",
            FilterDimension::CategoryId => "CategoryId",
            FilterDimension::SubCategoryId => "SubCategoryId",
            FilterDimension::PriceRangeId => "PriceRangeId",
            FilterDimension::ClothingGenderId => "ClothingGenderId",
            FilterDimension::ColorId => "ColorId",
            FilterDimension::Search => "search",
            FilterDimension::GlobalSearch => "q",
            FilterDimension::PageNumber => "PageNumber",
        }
    }

    /// Multi-select dimensions serialize as repeated keys.
    pub const fn is_multi(self) -> bool {
        matches!(
            self,
            FilterDimension::ClothingGenderId | FilterDimension::ColorId
        )
    }

    /// Structured dimensions are the ones cleared by a filter reset.
    pub const fn is_structured(self) -> bool {
        !matches!(
            self,
            FilterDimension::Search | FilterDimension::GlobalSearch | FilterDimension::PageNumber
        )
    }
}

impl Display for FilterDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Raised when code addresses a dimension name that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown filter dimension: {0}")]
pub struct UnknownDimension(pub String);

impl FromStr for FilterDimension {
    type Err = UnknownDimension;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FilterDimension::ALL
            .into_iter()
            .find(|dimension| dimension.key() == name)
            .ok_or_else(|| UnknownDimension(name.to_string()))
    }
}

/// A value written into a dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// Remove the dimension from the query.
    Clear,
    /// A single value. For multi-select dimensions it replaces the list.
    One(String),
    /// A list of values. Single-valued dimensions keep the last one.
    Many(Vec<String>),
}

impl FilterValue {
    fn last(&self) -> Option<&str> {
        match self {
            FilterValue::Clear => None,
            FilterValue::One(value) => Some(value),
            FilterValue::Many(values) => values.last().map(String::as_str),
        }
    }

    fn all(&self) -> Vec<&str> {
        match self {
            FilterValue::Clear => Vec::new(),
            FilterValue::One(value) => vec![value.as_str()],
            FilterValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

/// Default sort order applied when `SortId` is absent.
pub const DEFAULT_SORT_ID: u32 = 1;

/// Product-listing filters. Absent identifiers are `None` (or an empty list);
/// empty free-text fields are `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    sort_id: Option<CatalogId>,
    main_category_id: Option<CatalogId>,
    category_id: Option<CatalogId>,
    sub_category_id: Option<CatalogId>,
    price_range_id: Option<CatalogId>,
    clothing_gender_ids: Vec<CatalogId>,
    color_ids: Vec<CatalogId>,
    search: String,
    global_search: String,
    page_number: Option<PageNumber>,
}

fn parse_id(value: Option<&str>) -> Option<CatalogId> {
    value.and_then(|raw| raw.parse().ok())
}

/// The default sort order is stored as absent so it never reaches the query.
fn parse_sort_id(value: Option<&str>) -> Option<CatalogId> {
    parse_id(value).filter(|id| id.get() != DEFAULT_SORT_ID)
}

fn parse_ids<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<CatalogId> {
    let mut ids: Vec<CatalogId> = Vec::new();
    for id in values.into_iter().filter_map(|raw| raw.parse().ok()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_id(&self) -> Option<CatalogId> {
        self.sort_id
    }

    pub fn main_category_id(&self) -> Option<CatalogId> {
        self.main_category_id
    }

    pub fn category_id(&self) -> Option<CatalogId> {
        self.category_id
    }

    pub fn sub_category_id(&self) -> Option<CatalogId> {
        self.sub_category_id
    }

    pub fn price_range_id(&self) -> Option<CatalogId> {
        self.price_range_id
    }

    pub fn clothing_gender_ids(&self) -> &[CatalogId] {
        &self.clothing_gender_ids
    }

    pub fn color_ids(&self) -> &[CatalogId] {
        &self.color_ids
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn global_search(&self) -> &str {
        &self.global_search
    }

    pub fn page_number(&self) -> Option<PageNumber> {
        self.page_number
    }

    /// One-based page with the default applied.
    pub fn page(&self) -> usize {
        self.page_number.map_or(1, |page| page.get() as usize)
    }

    /// Returns `true` when any structured dimension is set. The default sort
    /// order does not count.
    pub fn has_structured_filters(&self) -> bool {
        self.sort_id.is_some()
            || self.main_category_id.is_some()
            || self.category_id.is_some()
            || self.sub_category_id.is_some()
            || self.price_range_id.is_some()
            || !self.clothing_gender_ids.is_empty()
            || !self.color_ids.is_empty()
    }

    /// Writes a value into one dimension.
    ///
    /// Values that do not parse are stored as absent. Writing `search` or `q`
    /// goes through [`FilterState::apply_search`] and
    /// [`FilterState::apply_global_search`] so the mutual exclusion holds.
    /// A structured filter that ends up set leaves the global search.
    pub fn set(&mut self, dimension: FilterDimension, value: FilterValue) {
        self.write(dimension, value);
        if self.has_structured_filters() && !self.global_search.is_empty() {
            self.global_search.clear();
        }
    }

    fn write(&mut self, dimension: FilterDimension, value: FilterValue) {
        match dimension {
            FilterDimension::SortId => self.sort_id = parse_sort_id(value.last()),
            FilterDimension::MainCategoryId => {
                let main = parse_id(value.last());
                if main != self.main_category_id {
                    self.category_id = None;
                    self.sub_category_id = None;
                }
                self.main_category_id = main;
            }
            FilterDimension::CategoryId => {
                let category = self
                    .main_category_id
                    .and_then(|_| parse_id(value.last()));
                if category != self.category_id {
                    self.sub_category_id = None;
                }
                self.category_id = category;
            }
            FilterDimension::SubCategoryId => {
                self.sub_category_id = self.category_id.and_then(|_| parse_id(value.last()));
            }
            FilterDimension::PriceRangeId => self.price_range_id = parse_id(value.last()),
            FilterDimension::ClothingGenderId => self.clothing_gender_ids = parse_ids(value.all()),
            FilterDimension::ColorId => self.color_ids = parse_ids(value.all()),
            FilterDimension::Search => self.apply_search(value.last().unwrap_or_default()),
            FilterDimension::GlobalSearch => {
                self.apply_global_search(value.last().unwrap_or_default())
            }
            FilterDimension::PageNumber => {
                self.page_number = value.last().and_then(|raw| raw.parse().ok())
            }
        }
    }

    /// Catalog-scoped search: clears the global search and returns to the
    /// first page, keeping structured filters.
    pub fn apply_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.global_search.clear();
        self.page_number = Some(PageNumber::FIRST);
    }

    /// Site-wide search: clears the catalog search and every structured
    /// filter, and returns to the first page.
    pub fn apply_global_search(&mut self, term: &str) {
        self.global_search = term.to_string();
        self.search.clear();
        self.page_number = Some(PageNumber::FIRST);
        self.reset_filters();
    }

    /// Clears every structured dimension. Free text and page are untouched.
    pub fn reset_filters(&mut self) {
        self.sort_id = None;
        self.main_category_id = None;
        self.category_id = None;
        self.sub_category_id = None;
        self.price_range_id = None;
        self.clothing_gender_ids.clear();
        self.color_ids.clear();
    }

    /// Serializes into the canonical query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        let query = FilterQuery::from(self);
        match serde_html_form::to_string(&query) {
            Ok(serialized) => serialized,
            Err(err) => {
                log::error!("Failed to serialize filter query: {err}");
                String::new()
            }
        }
    }

    /// Parses a query string (with or without a leading `?`).
    ///
    /// Never fails: unknown keys are ignored, malformed values are absent and
    /// a repeated single-valued key keeps its last value. A query carrying a
    /// global search drops the catalog search and the structured filters, and
    /// hierarchy children without a parent are dropped.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let raw = match serde_html_form::from_str::<FilterQuery>(query) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("Ignoring malformed filter query {query:?}: {err}");
                FilterQuery::default()
            }
        };
        Self::from(raw)
    }
}

impl Display for FilterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Wire shape of the query string. Field order is the canonical key order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FilterQuery {
    #[serde(rename = "SortId", default, skip_serializing_if = "Vec::is_empty")]
    sort_id: Vec<String>,
    #[serde(rename = "MainCategoryId", default, skip_serializing_if = "Vec::is_empty")]
    main_category_id: Vec<String>,
    #[serde(rename = "CategoryId", default, skip_serializing_if = "Vec::is_empty")]
    category_id: Vec<String>,
    #[serde(rename = "SubCategoryId", default, skip_serializing_if = "Vec::is_empty")]
    sub_category_id: Vec<String>,
    #[serde(rename = "PriceRangeId", default, skip_serializing_if = "Vec::is_empty")]
    price_range_id: Vec<String>,
    #[serde(rename = "ClothingGenderId", default, skip_serializing_if = "Vec::is_empty")]
    clothing_gender_id: Vec<String>,
    #[serde(rename = "ColorId", default, skip_serializing_if = "Vec::is_empty")]
    color_id: Vec<String>,
    #[serde(rename = "search", default, skip_serializing_if = "Vec::is_empty")]
    search: Vec<String>,
    #[serde(rename = "q", default, skip_serializing_if = "Vec::is_empty")]
    global_search: Vec<String>,
    #[serde(rename = "PageNumber", default, skip_serializing_if = "Vec::is_empty")]
    page_number: Vec<String>,
}

fn one<T: ToString>(value: Option<T>) -> Vec<String> {
    value.map(|v| v.to_string()).into_iter().collect()
}

fn text(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

fn last(values: &[String]) -> Option<&str> {
    values.last().map(String::as_str)
}

impl From<&FilterState> for FilterQuery {
    fn from(state: &FilterState) -> Self {
        Self {
            sort_id: one(state.sort_id),
            main_category_id: one(state.main_category_id),
            category_id: one(state.category_id),
            sub_category_id: one(state.sub_category_id),
            price_range_id: one(state.price_range_id),
            clothing_gender_id: state
                .clothing_gender_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
            color_id: state.color_ids.iter().map(ToString::to_string).collect(),
            search: text(&state.search),
            global_search: text(&state.global_search),
            page_number: one(state.page_number),
        }
    }
}

impl From<FilterQuery> for FilterState {
    fn from(raw: FilterQuery) -> Self {
        let main_category_id = parse_id(last(&raw.main_category_id));
        let category_id = main_category_id.and_then(|_| parse_id(last(&raw.category_id)));
        let sub_category_id = category_id.and_then(|_| parse_id(last(&raw.sub_category_id)));

        let mut state = FilterState {
            sort_id: parse_sort_id(last(&raw.sort_id)),
            main_category_id,
            category_id,
            sub_category_id,
            price_range_id: parse_id(last(&raw.price_range_id)),
            clothing_gender_ids: parse_ids(raw.clothing_gender_id.iter().map(String::as_str)),
            color_ids: parse_ids(raw.color_id.iter().map(String::as_str)),
            search: last(&raw.search).unwrap_or_default().to_string(),
            global_search: last(&raw.global_search).unwrap_or_default().to_string(),
            page_number: last(&raw.page_number).and_then(|raw| raw.parse().ok()),
        };

        if !state.global_search.is_empty() {
            state.search.clear();
            state.reset_filters();
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered() -> FilterState {
        let mut state = FilterState::new();
        state.set(FilterDimension::SortId, "3".into());
        state.set(FilterDimension::MainCategoryId, "2".into());
        state.set(FilterDimension::CategoryId, "14".into());
        state.set(FilterDimension::SubCategoryId, "140".into());
        state.set(FilterDimension::PriceRangeId, "5".into());
        state.set(
            FilterDimension::ClothingGenderId,
            vec!["1".to_string(), "2".to_string()].into(),
        );
        state.set(
            FilterDimension::ColorId,
            vec!["7".to_string(), "3".to_string()].into(),
        );
        state.set(FilterDimension::PageNumber, "4".into());
        state
    }

    #[test]
    fn dimension_names_round_trip() {
        for dimension in FilterDimension::ALL {
            assert_eq!(dimension.key().parse::<FilterDimension>(), Ok(dimension));
        }
        assert_eq!(
            "sortid".parse::<FilterDimension>(),
            Err(UnknownDimension("sortid".to_string()))
        );
    }

    #[test]
    fn serializes_in_canonical_order_with_repeated_keys() {
        assert_eq!(
            filtered().to_query_string(),
            "SortId=3&MainCategoryId=2&CategoryId=14&SubCategoryId=140&PriceRangeId=5\
             &ClothingGenderId=1&ClothingGenderId=2&ColorId=7&ColorId=3&PageNumber=4"
        );
    }

    #[test]
    fn default_state_serializes_to_empty_query() {
        assert_eq!(FilterState::new().to_query_string(), "");
        assert_eq!(FilterState::from_query_str(""), FilterState::new());
    }

    #[test]
    fn round_trips_structured_and_text_states() {
        let mut searched = filtered();
        searched.apply_search("red boots & more");
        let mut global = FilterState::new();
        global.apply_global_search("summer sale 50%");

        for state in [FilterState::new(), filtered(), searched, global] {
            let query = state.to_query_string();
            assert_eq!(FilterState::from_query_str(&query), state, "{query}");
        }
    }

    #[test]
    fn malformed_values_are_absent() {
        let state = FilterState::from_query_str(
            "?SortId=abc&MainCategoryId=-1&PriceRangeId=&ColorId=x&ColorId=4&PageNumber=0&Unknown=1",
        );
        assert_eq!(state.sort_id(), None);
        assert_eq!(state.main_category_id(), None);
        assert_eq!(state.price_range_id(), None);
        assert_eq!(state.color_ids(), &[CatalogId::new(4).unwrap()]);
        assert_eq!(state.page_number(), None);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn orphaned_children_are_dropped() {
        let state = FilterState::from_query_str("CategoryId=3&SubCategoryId=4");
        assert_eq!(state.category_id(), None);
        assert_eq!(state.sub_category_id(), None);

        let state = FilterState::from_query_str("MainCategoryId=1&SubCategoryId=4");
        assert_eq!(state.main_category_id(), CatalogId::new(1).ok());
        assert_eq!(state.sub_category_id(), None);
    }

    #[test]
    fn changing_a_parent_clears_descendants() {
        let mut state = filtered();
        state.set(FilterDimension::MainCategoryId, "2".into());
        assert!(state.sub_category_id().is_some());

        state.set(FilterDimension::MainCategoryId, "9".into());
        assert_eq!(state.category_id(), None);
        assert_eq!(state.sub_category_id(), None);
    }

    #[test]
    fn repeated_single_keys_keep_the_last_value() {
        let state = FilterState::from_query_str("SortId=2&SortId=5&ColorId=1&ColorId=1");
        assert_eq!(state.sort_id(), CatalogId::new(5).ok());
        assert_eq!(state.color_ids().len(), 1);
    }

    #[test]
    fn global_search_wins_over_conflicting_query() {
        let state = FilterState::from_query_str("MainCategoryId=1&search=a&q=b&PageNumber=2");
        assert_eq!(state.global_search(), "b");
        assert_eq!(state.search(), "");
        assert!(!state.has_structured_filters());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn search_modes_are_mutually_exclusive() {
        let mut state = filtered();
        state.apply_global_search("shoes");
        assert_eq!(state.search(), "");
        assert!(!state.has_structured_filters());
        assert_eq!(state.page_number(), Some(PageNumber::FIRST));

        let mut state = filtered();
        state.apply_global_search("shoes");
        state.apply_search("shoes");
        assert_eq!(state.global_search(), "");

        let mut state = filtered();
        state.apply_search("boot");
        assert_eq!(state.main_category_id(), CatalogId::new(2).ok());
        assert_eq!(state.page_number(), Some(PageNumber::FIRST));
    }

    #[test]
    fn structured_filter_leaves_global_search() {
        let mut state = FilterState::from_query_str("q=hat&PageNumber=1");
        state.set(FilterDimension::ColorId, vec!["4".to_string()].into());
        assert_eq!(state.global_search(), "");
        assert_eq!(state.to_query_string(), "ColorId=4&PageNumber=1");

        let mut state = FilterState::new();
        state.apply_global_search("hat");
        state.set(FilterDimension::SortId, "3".into());
        let query = state.to_query_string();
        assert_eq!(FilterState::from_query_str(&query), state, "{query}");
    }

    #[test]
    fn clearing_a_filter_keeps_global_search() {
        let mut state = FilterState::from_query_str("q=hat");
        state.set(FilterDimension::ColorId, FilterValue::Clear);
        assert_eq!(state.global_search(), "hat");
    }

    #[test]
    fn default_sort_is_omitted() {
        let mut state = FilterState::new();
        state.set(FilterDimension::SortId, "1".into());
        assert_eq!(state.sort_id(), None);
        assert_eq!(state.to_query_string(), "");
        assert!(!state.has_structured_filters());

        let state = FilterState::from_query_str("SortId=1&search=boot");
        assert_eq!(state.to_query_string(), "search=boot");
        assert_eq!(state.sort_id(), None);
    }

    #[test]
    fn reset_filters_is_idempotent_and_keeps_text() {
        let mut once = filtered();
        once.apply_search("coat");
        once.set(FilterDimension::PageNumber, "3".into());
        once.reset_filters();

        let mut twice = once.clone();
        twice.reset_filters();

        assert_eq!(once, twice);
        assert_eq!(once.search(), "coat");
        assert_eq!(once.page(), 3);
        assert!(!once.has_structured_filters());
    }
}
