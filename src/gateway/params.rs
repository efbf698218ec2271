//! # Query Parameter Parser
//!
//! Parses REST query-string pairs into structured select inputs. Pairs are
//! processed in wire order, since filter order determines bound-parameter
//! order.

use super::errors::{GatewayError, GatewayResult};
use super::sanitize::sanitize_identifier;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Sort specification: `sort=<col>:<asc|desc>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: Direction,
}

/// Pagination: literal `LIMIT` / `OFFSET` values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSpec {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Parsed select inputs from the query string
#[derive(Debug, Clone, Default)]
pub struct RestQuery {
    /// (sanitized column, raw value) pairs in wire order, AND-combined
    pub filters: Vec<(String, String)>,

    /// Optional sort clause
    pub sort: Option<SortSpec>,

    /// Optional pagination
    pub page: PageSpec,
}

impl RestQuery {
    /// Parse ordered query-string pairs.
    ///
    /// Filter columns are sanitized here; filter values stay raw and are
    /// bound as parameters later.
    pub fn parse(pairs: &[(String, String)]) -> GatewayResult<Self> {
        let mut query = RestQuery::default();

        for (key, value) in pairs {
            match key.as_str() {
                "sort" => {
                    query.sort = Some(parse_sort(value));
                }
                "limit" => {
                    query.page.limit = Some(parse_page_value("limit", value)?);
                }
                "offset" => {
                    query.page.offset = Some(parse_page_value("offset", value)?);
                }
                _ => {
                    query.filters.push((sanitize_identifier(key), value.clone()));
                }
            }
        }

        Ok(query)
    }
}

/// Parse `<col>:<direction>`; only the second `:`-separated segment is the
/// direction token, and any token other than the literal `desc` sorts
/// ascending. A missing `:` means the whole value is the column.
fn parse_sort(value: &str) -> SortSpec {
    let mut segments = value.split(':');
    let column = segments.next().unwrap_or_default();
    let direction = match segments.next() {
        Some("desc") => Direction::Desc,
        _ => Direction::Asc,
    };

    SortSpec {
        column: sanitize_identifier(column),
        direction,
    }
}

/// Parse a limit/offset token.
///
/// Hardened relative to a permissive prefix parse: a non-numeric token is a
/// 400 client error rather than a malformed statement reaching the engine.
fn parse_page_value(name: &str, value: &str) -> GatewayResult<i64> {
    value.parse().map_err(|_| {
        GatewayError::InvalidQueryParam(format!("{} must be an integer, got '{}'", name, value))
    })
}
