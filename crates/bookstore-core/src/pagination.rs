//! Query-parameter decoding for list endpoints.
//!
//! Every list endpoint accepts the same six query parameters, all carried as
//! strings on the wire:
//!
//! | parameter       | format                                              | default                 |
//! |-----------------|-----------------------------------------------------|-------------------------|
//! | `page`          | integer ≥ 1                                         | `1`                     |
//! | `per_page`      | integer ≥ 1, capped at [`MAX_PER_PAGE`]             | `10`                    |
//! | `sort`          | JSON `{"column_name": "...", "value": "asc"}`       | `created_at` ascending  |
//! | `search`        | free text                                           | none                    |
//! | `filter`        | JSON `[{"column_name", "operator", "value"}, ...]`  | no filters              |
//! | `link_operator` | `and` or `or`                                       | `and`                   |
//!
//! Unparseable or non-positive `page`/`per_page` values silently fall back
//! to their defaults. Malformed `sort`, `filter` or `link_operator` values
//! are a [`DecodeError`] and no partial result is produced.
//!
//! Column names are not checked here; the list executor resolves them
//! against a per-entity allowlist.
//!
//! # Example
//!
//! ```ignore
//! // GET /api/books?page=2&per_page=5&filter=[{"column_name":"price","operator":">","value":10}]
//! async fn list_books(ListQuery(filter): ListQuery) -> Result<..., AppError> {
//!     assert_eq!(filter.offset(), 5);
//!     ...
//! }
//! ```

use std::fmt;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Raw list query parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParam {
    /// Page number, 1-indexed
    #[serde(default)]
    pub page: String,
    /// Records per page (max 100)
    #[serde(default)]
    pub per_page: String,
    /// JSON object `{"column_name": "title", "value": "desc"}`
    #[serde(default)]
    pub sort: String,
    /// Case-insensitive substring search; overrides `filter` when non-empty
    #[serde(default)]
    pub search: String,
    /// JSON array of `{"column_name", "operator", "value"}` objects
    #[serde(default)]
    pub filter: String,
    /// How filters are combined: `and` (default) or `or`
    #[serde(default)]
    pub link_operator: String,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid sort parameter")]
    InvalidSort(#[source] serde_json::Error),

    #[error("Invalid filter parameter")]
    InvalidFilter(#[source] serde_json::Error),

    #[error("Invalid link_operator '{0}', expected 'and' or 'or'")]
    InvalidLinkOperator(String),
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::bad_request(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&raw),
                &"\"asc\" or \"desc\"",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Sort {
    pub column_name: String,
    pub value: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column_name: DEFAULT_SORT_COLUMN.to_string(),
            value: SortDirection::Asc,
        }
    }
}

/// Comparison operators accepted in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "LIKE", alias = "like")]
    Like,
}

impl FilterOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => "LIKE",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Like => "LIKE",
        };
        f.write_str(symbol)
    }
}

/// A scalar filter value. Arrays, objects and `null` are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Filter {
    pub column_name: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkOperator {
    #[default]
    And,
    Or,
}

impl LinkOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }

    fn parse(raw: &str) -> Result<Self, DecodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::And);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            _ => Err(DecodeError::InvalidLinkOperator(trimmed.to_string())),
        }
    }
}

/// Validated list query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterParam {
    pub page: i64,
    pub per_page: i64,
    pub sort: Sort,
    pub search: String,
    pub filters: Vec<Filter>,
    pub link_operator: LinkOperator,
}

impl Default for FilterParam {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: Sort::default(),
            search: String::new(),
            filters: Vec::new(),
            link_operator: LinkOperator::And,
        }
    }
}

impl FilterParam {
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// True when the free-text search replaces structured filters.
    #[must_use]
    pub fn is_search(&self) -> bool {
        !self.search.is_empty()
    }
}

fn parse_positive(raw: &str, default: i64) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => value,
        _ => default,
    }
}

/// Decodes raw query parameters into a [`FilterParam`].
pub fn extract_pagination(param: &PaginationParam) -> Result<FilterParam, DecodeError> {
    let page = parse_positive(&param.page, DEFAULT_PAGE);
    let per_page = parse_positive(&param.per_page, DEFAULT_PER_PAGE).min(MAX_PER_PAGE);

    let sort = if param.sort.trim().is_empty() {
        Sort::default()
    } else {
        serde_json::from_str::<Sort>(&param.sort).map_err(DecodeError::InvalidSort)?
    };

    let filters = if param.filter.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str::<Vec<Filter>>(&param.filter).map_err(DecodeError::InvalidFilter)?
    };

    let link_operator = LinkOperator::parse(&param.link_operator)?;

    Ok(FilterParam {
        page,
        per_page,
        sort,
        search: param.search.trim().to_string(),
        filters,
        link_operator,
    })
}

impl TryFrom<PaginationParam> for FilterParam {
    type Error = DecodeError;

    fn try_from(param: PaginationParam) -> Result<Self, Self::Error> {
        extract_pagination(&param)
    }
}

/// Extractor yielding a decoded [`FilterParam`], rejecting with 400.
#[derive(Debug, Clone)]
pub struct ListQuery(pub FilterParam);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(param) = Query::<PaginationParam>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow::anyhow!(rejection.body_text())))?;

        let filter = extract_pagination(&param)?;
        Ok(ListQuery(filter))
    }
}
