//! Facet kinds, their fixed column schemas, and the row type.
//!
//! A document carries exactly one facet of each [`FacetKind`]. Every facet except
//! [`FacetKind::Table`] has a fixed, ordered column schema; the table facet takes its
//! columns from the dataset it was seeded with.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DatadocError, Result};

/// One record within a facet, keyed by column name.
///
/// Rows never carry an `index` field; the index is the 1-based position of the row.
pub type Row = IndexMap<String, String>;

/// Name of the positional column rendered in front of every semantic facet.
pub const INDEX_COLUMN: &str = "index";

/// The nine facets of a document, in their fixed rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    /// The raw dataset rows
    Table,
    /// What each column means
    Meaning,
    /// Structural constraints per column
    Structure,
    /// Ambiguities detected in the dataset
    Ambiguity,
    /// Clarification intents and user answers
    Intent,
    /// Free-form key/value context
    Context,
    /// User queries made against the dataset
    Query,
    /// Tasks derived from the queries
    Tasks,
    /// Quality scores
    Score,
}

impl FacetKind {
    /// All facets, in rendering order.
    pub const ALL: [FacetKind; 9] = [
        FacetKind::Table,
        FacetKind::Meaning,
        FacetKind::Structure,
        FacetKind::Ambiguity,
        FacetKind::Intent,
        FacetKind::Context,
        FacetKind::Query,
        FacetKind::Tasks,
        FacetKind::Score,
    ];

    /// The eight facets with a fixed schema (everything but `table`).
    pub fn semantic() -> impl Iterator<Item = FacetKind> {
        Self::ALL.into_iter().filter(|kind| !kind.is_table())
    }

    /// The name used in `@<name>[n]:` headers.
    pub fn name(self) -> &'static str {
        match self {
            FacetKind::Table => "table",
            FacetKind::Meaning => "meaning",
            FacetKind::Structure => "structure",
            FacetKind::Ambiguity => "ambiguity",
            FacetKind::Intent => "intent",
            FacetKind::Context => "context",
            FacetKind::Query => "query",
            FacetKind::Tasks => "tasks",
            FacetKind::Score => "score",
        }
    }

    /// Fixed columns of the facet, excluding the positional `index` column.
    ///
    /// Empty for [`FacetKind::Table`], whose columns are dataset-defined.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            FacetKind::Table => &[],
            FacetKind::Meaning => &["column", "definition"],
            FacetKind::Structure => &[
                "column",
                "nullAllowed",
                "dataType",
                "minValue",
                "maxValue",
                "format",
            ],
            FacetKind::Ambiguity => &["query_trigger", "ambiguity_type", "ambiguity_risk"],
            FacetKind::Intent => &[
                "query_trigger",
                "clarifying_question",
                "options",
                "user_response",
                "user_confirmed",
            ],
            FacetKind::Context => &["key", "value"],
            FacetKind::Query => &["user_message", "timestamp_utc"],
            FacetKind::Tasks => &["name", "description", "formula"],
            FacetKind::Score => &["measure", "value"],
        }
    }

    /// Whether this is the dataset-defined table facet.
    pub fn is_table(self) -> bool {
        self == FacetKind::Table
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FacetKind {
    type Err = DatadocError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DatadocError::UnknownFacet(s.to_string()))
    }
}

/// A named, ordered collection of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    kind: FacetKind,
    rows: Vec<Row>,
}

impl Facet {
    /// Create an empty facet.
    pub fn new(kind: FacetKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// Which facet this is.
    pub fn kind(&self) -> FacetKind {
        self.kind
    }

    /// Rows in order; row `i` has index `i + 1`.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at a 1-based index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        index.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the facet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data columns of this facet, excluding `index`.
    ///
    /// For the table facet these are the first row's keys.
    pub fn columns(&self) -> Vec<String> {
        if self.kind.is_table() {
            self.rows
                .first()
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default()
        } else {
            self.kind.columns().iter().map(|c| c.to_string()).collect()
        }
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }
}
