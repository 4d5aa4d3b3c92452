//! Filter and sort token grammar
//!
//! Filters are `key=value` or `key:value`, split on the first separator so
//! values may contain either character. `from`/`to` collapse into a single
//! trailing `dateRange` filter.

use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{FilterValue, QueryFilter, SortDirection, SortSpec};
use rfimatch_core::time::{format_iso_millis, parse_calendar_date, utc_midnight};

const DATE_RANGE_FIELD: &str = "dateRange";

/// Per-archive knowledge of which filter keys need non-string values
#[derive(Debug, Clone)]
pub struct FilterGrammar {
    multi_valued: Vec<String>,
    structured: Vec<String>,
}

impl Default for FilterGrammar {
    fn default() -> Self {
        Self {
            multi_valued: vec!["NumFreqChannels".into(), "Band".into(), "QA2".into()],
            structured: vec!["radec".into()],
        }
    }
}

impl FilterGrammar {
    /// Grammar with no special-cased keys besides `from`/`to`
    pub fn plain() -> Self {
        Self { multi_valued: Vec::new(), structured: Vec::new() }
    }

    /// Treat `key` as comma-separated and multi-valued
    pub fn with_multi_valued(mut self, key: impl Into<String>) -> Self {
        self.multi_valued.push(key.into());
        self
    }

    /// Treat `key` as a JSON literal (e.g. a geospatial shape)
    pub fn with_structured(mut self, key: impl Into<String>) -> Self {
        self.structured.push(key.into());
        self
    }

    pub fn is_multi_valued(&self, key: &str) -> bool {
        self.multi_valued.iter().any(|k| k == key)
    }

    pub fn is_structured(&self, key: &str) -> bool {
        self.structured.iter().any(|k| k == key)
    }

    /// Parse raw filter tokens into structured filters, preserving token order
    pub fn parse_filters<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<QueryFilter>> {
        let mut filters = Vec::new();
        let mut from: Option<String> = None;
        let mut to: Option<String> = None;

        for token in tokens {
            let token = token.as_ref();
            let (key, value) = split_filter_token(token)?;

            match key {
                "from" => from = Some(midnight_iso(token, value)?),
                "to" => to = Some(midnight_iso(token, value)?),
                _ if self.is_structured(key) => {
                    let literal = serde_json::from_str(value).map_err(|e| {
                        RfiMatchError::FilterSyntax {
                            token: token.to_string(),
                            reason: format!("value is not a JSON literal: {}", e),
                        }
                    })?;
                    filters.push(QueryFilter::new(key, FilterValue::Structured(literal)));
                }
                _ if self.is_multi_valued(key) => {
                    let values: Vec<String> = value
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(String::from)
                        .collect();
                    if !values.is_empty() {
                        filters.push(QueryFilter::new(key, FilterValue::List(values)));
                    }
                }
                _ => filters.push(QueryFilter::text(key, value)),
            }
        }

        if from.is_some() || to.is_some() {
            filters.push(QueryFilter::new(DATE_RANGE_FIELD, FilterValue::DateRange([from, to])));
        }

        Ok(filters)
    }
}

/// Parse filter tokens with the default archive grammar
pub fn parse_filters<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<QueryFilter>> {
    FilterGrammar::default().parse_filters(tokens)
}

/// Parse `field:direction` / `field=direction` sort tokens
pub fn parse_sort<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<SortSpec>> {
    tokens
        .iter()
        .map(|token| {
            let token = token.as_ref();
            let syntax = |reason: String| RfiMatchError::SortSyntax {
                token: token.to_string(),
                reason,
            };

            let (field, direction) = token
                .split_once(':')
                .or_else(|| token.split_once('='))
                .ok_or_else(|| syntax("expected field:asc or field=desc".to_string()))?;

            let field = field.trim();
            if field.is_empty() {
                return Err(syntax("missing sort field".to_string()));
            }

            let direction = match direction.trim().to_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(syntax(format!("direction '{}' is not asc or desc", other)))
                }
            };

            Ok(SortSpec { column: field.to_string(), direction })
        })
        .collect()
}

fn split_filter_token(token: &str) -> Result<(&str, &str)> {
    let separator = token.find(['=', ':']).ok_or_else(|| RfiMatchError::FilterSyntax {
        token: token.to_string(),
        reason: "expected key=value or key:value".to_string(),
    })?;

    let key = token[..separator].trim();
    let value = token[separator + 1..].trim();

    if key.is_empty() {
        return Err(RfiMatchError::FilterSyntax {
            token: token.to_string(),
            reason: "missing filter key".to_string(),
        });
    }

    Ok((key, value))
}

fn midnight_iso(token: &str, value: &str) -> Result<String> {
    let date = parse_calendar_date(value).ok_or_else(|| RfiMatchError::FilterSyntax {
        token: token.to_string(),
        reason: format!("'{}' is not an ISO-8601 date", value),
    })?;
    Ok(format_iso_millis(&utc_midnight(date)))
}
