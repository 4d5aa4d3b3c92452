use serde::{Deserialize, Serialize};

/// One archive record as returned by the remote archive, before typing
pub type RawRecord = serde_json::Value;

/// Value of a structured archive filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Single string value passed through unchanged
    Text(String),

    /// Multi-valued field, split on commas
    List(Vec<String>),

    /// `[from, to]` pair of ISO-8601 instants; either side may be open
    DateRange([Option<String>; 2]),

    /// Structured literal (e.g. a geospatial shape)
    Structured(serde_json::Value),
}

/// Structured filter entry sent to the archive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilter {
    pub field: String,
    pub value: FilterValue,
}

impl QueryFilter {
    pub fn new(field: impl Into<String>, value: FilterValue) -> Self {
        Self { field: field.into(), value }
    }

    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterValue::Text(value.into()))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "columnKey")]
    pub column: String,
    pub direction: SortDirection,
}

/// Parameters of a single page request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRequest {
    pub filters: Vec<QueryFilter>,
    pub sort: Vec<SortSpec>,
    pub search: String,

    /// Opaque continuation token; `None` on the first request
    pub cursor: Option<String>,

    /// Maximum number of records wanted from this page
    pub limit: usize,
}

/// One fetched batch of archive records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservationPage {
    pub records: Vec<RawRecord>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub total_count: u64,
}
