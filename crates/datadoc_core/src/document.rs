//! The document: one snapshot of a dataset and its nine facets.

use serde::{Deserialize, Serialize};

use crate::error::{DatadocError, Result};
use crate::facet::{Facet, FacetKind, Row};
use crate::rows::clean_cell;

/// Tabular source data as handed over by a CSV reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularSource {
    /// Column names, in order
    pub headers: Vec<String>,
    /// Records; each record is positionally aligned with `headers`
    pub rows: Vec<Vec<String>>,
}

/// One complete snapshot carrying all nine facets.
///
/// Fields are private: rows change only through the functions in [`crate::rows`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    table: Facet,
    meaning: Facet,
    structure: Facet,
    ambiguity: Facet,
    intent: Facet,
    context: Facet,
    query: Facet,
    tasks: Facet,
    score: Facet,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with all nine facets empty.
    pub fn new() -> Self {
        Self {
            table: Facet::new(FacetKind::Table),
            meaning: Facet::new(FacetKind::Meaning),
            structure: Facet::new(FacetKind::Structure),
            ambiguity: Facet::new(FacetKind::Ambiguity),
            intent: Facet::new(FacetKind::Intent),
            context: Facet::new(FacetKind::Context),
            query: Facet::new(FacetKind::Query),
            tasks: Facet::new(FacetKind::Tasks),
            score: Facet::new(FacetKind::Score),
        }
    }

    /// Create a document whose `table` facet holds the source dataset.
    ///
    /// Records shorter than the header are padded with empty cells; longer records,
    /// duplicate headers and cells that cannot be written to a table are rejected.
    pub fn from_source(source: &TabularSource) -> Result<Self> {
        let mut headers = Vec::with_capacity(source.headers.len());
        for header in &source.headers {
            let header = clean_cell(header)
                .map_err(|reason| DatadocError::Csv(format!("header '{header}': {reason}")))?;
            if headers.contains(&header) {
                return Err(DatadocError::Csv(format!("duplicate header '{header}'")));
            }
            headers.push(header);
        }

        let mut doc = Self::new();
        for (n, record) in source.rows.iter().enumerate() {
            if record.len() > headers.len() {
                return Err(DatadocError::Csv(format!(
                    "record {} has {} fields but the header has {}",
                    n + 1,
                    record.len(),
                    headers.len()
                )));
            }

            let mut row = Row::new();
            for (i, header) in headers.iter().enumerate() {
                let raw = record.get(i).map(String::as_str).unwrap_or_default();
                let value = clean_cell(raw).map_err(|reason| {
                    DatadocError::Csv(format!("record {}, column '{header}': {reason}", n + 1))
                })?;
                row.insert(header.clone(), value);
            }
            doc.table.rows_mut().push(row);
        }

        log::debug!(
            "Seeded table facet with {} rows and {} columns",
            doc.table.len(),
            headers.len()
        );
        Ok(doc)
    }

    /// Borrow a facet.
    pub fn facet(&self, kind: FacetKind) -> &Facet {
        match kind {
            FacetKind::Table => &self.table,
            FacetKind::Meaning => &self.meaning,
            FacetKind::Structure => &self.structure,
            FacetKind::Ambiguity => &self.ambiguity,
            FacetKind::Intent => &self.intent,
            FacetKind::Context => &self.context,
            FacetKind::Query => &self.query,
            FacetKind::Tasks => &self.tasks,
            FacetKind::Score => &self.score,
        }
    }

    pub(crate) fn facet_mut(&mut self, kind: FacetKind) -> &mut Facet {
        match kind {
            FacetKind::Table => &mut self.table,
            FacetKind::Meaning => &mut self.meaning,
            FacetKind::Structure => &mut self.structure,
            FacetKind::Ambiguity => &mut self.ambiguity,
            FacetKind::Intent => &mut self.intent,
            FacetKind::Context => &mut self.context,
            FacetKind::Query => &mut self.query,
            FacetKind::Tasks => &mut self.tasks,
            FacetKind::Score => &mut self.score,
        }
    }

    /// All facets in rendering order.
    pub fn facets(&self) -> impl Iterator<Item = &Facet> {
        FacetKind::ALL.into_iter().map(|kind| self.facet(kind))
    }

    /// Append an already-shaped row. Used by the parser, which has its own column handling.
    pub(crate) fn push_row(&mut self, kind: FacetKind, row: Row) {
        self.facet_mut(kind).rows_mut().push(row);
    }
}
