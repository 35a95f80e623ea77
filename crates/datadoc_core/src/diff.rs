//! Facet-by-facet comparison of two revisions of the same dataset.
//!
//! Rows are compared by position, never by content matching. The `table` facet is the
//! identity of the dataset: if it differs between the two documents there is nothing
//! meaningful to compare and [`diff`] fails with [`DatadocError::DatasetMismatch`].
//!
//! Two renderers are provided: [`render_markdown`] for people (optionally with ANSI
//! colours) and [`render_json`] for programs.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{DatadocError, Result};
use crate::facet::{Facet, FacetKind, INDEX_COLUMN, Row};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Classification of a row or a whole facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Present only in the newer revision
    Added,
    /// Present only in the older revision
    Removed,
    /// Present in both with different values
    Modified,
    /// Present in both with identical values
    Unchanged,
}

impl ChangeType {
    /// Lowercase label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
            ChangeType::Unchanged => "unchanged",
        }
    }
}

/// A single changed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowChange {
    /// 1-based position of the row
    pub index: usize,
    /// What happened to the row
    pub change_type: ChangeType,
    /// The row in the older revision (`None` if added)
    pub before: Option<Row>,
    /// The row in the newer revision (`None` if removed)
    pub after: Option<Row>,
}

/// Comparison of one facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDiff {
    /// Which facet
    pub facet: FacetKind,
    /// Facet-level classification
    pub status: ChangeType,
    /// Row count in the older revision
    pub before_rows: usize,
    /// Row count in the newer revision
    pub after_rows: usize,
    /// Changed rows only, in index order
    pub changes: Vec<RowChange>,
}

/// Summary counts over all compared facets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Facets whose status is not `unchanged`
    pub facets_modified: usize,
    /// Facets with no row changes
    pub facets_unchanged: usize,
    /// Total added, removed and modified rows
    pub row_changes: usize,
}

/// Structured difference between two documents of the same dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDiff {
    /// One entry per semantic facet, in rendering order
    pub facets: Vec<FacetDiff>,
    /// Counts over `facets`
    pub summary: DiffSummary,
}

impl DocumentDiff {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.summary.row_changes == 0
    }

    /// The comparison for a single facet.
    pub fn facet(&self, kind: FacetKind) -> Option<&FacetDiff> {
        self.facets.iter().find(|f| f.facet == kind)
    }
}

/// Compare two revisions of the same dataset.
pub fn diff(before: &Document, after: &Document) -> Result<DocumentDiff> {
    if before.facet(FacetKind::Table).rows() != after.facet(FacetKind::Table).rows() {
        return Err(DatadocError::DatasetMismatch);
    }

    let facets: Vec<FacetDiff> = FacetKind::semantic()
        .map(|kind| diff_facet(before.facet(kind), after.facet(kind)))
        .collect();

    let facets_unchanged = facets
        .iter()
        .filter(|f| f.status == ChangeType::Unchanged)
        .count();
    let summary = DiffSummary {
        facets_modified: facets.len() - facets_unchanged,
        facets_unchanged,
        row_changes: facets.iter().map(|f| f.changes.len()).sum(),
    };

    Ok(DocumentDiff { facets, summary })
}

fn diff_facet(before: &Facet, after: &Facet) -> FacetDiff {
    let old = before.rows();
    let new = after.rows();

    let mut changes = Vec::new();
    for i in 0..old.len().max(new.len()) {
        let change = match (old.get(i), new.get(i)) {
            (Some(a), Some(b)) if a == b => continue,
            (Some(a), Some(b)) => RowChange {
                index: i + 1,
                change_type: ChangeType::Modified,
                before: Some(a.clone()),
                after: Some(b.clone()),
            },
            (Some(a), None) => RowChange {
                index: i + 1,
                change_type: ChangeType::Removed,
                before: Some(a.clone()),
                after: None,
            },
            (None, Some(b)) => RowChange {
                index: i + 1,
                change_type: ChangeType::Added,
                before: None,
                after: Some(b.clone()),
            },
            (None, None) => continue,
        };
        changes.push(change);
    }

    let status = if changes.is_empty() {
        ChangeType::Unchanged
    } else if old.is_empty() {
        ChangeType::Added
    } else if new.is_empty() {
        ChangeType::Removed
    } else {
        ChangeType::Modified
    };

    FacetDiff {
        facet: before.kind(),
        status,
        before_rows: old.len(),
        after_rows: new.len(),
        changes,
    }
}

/// Render a diff as markdown, git style.
///
/// Modified rows appear as an adjacent `-` (old) and `+` (new) pair. With `color` the
/// `-` lines are red and the `+` lines green.
pub fn render_markdown(diff: &DocumentDiff, color: bool) -> String {
    let mut out = Vec::new();
    out.push("## Diff".to_string());
    out.push(String::new());
    out.push(format!("- Facets modified: {}", diff.summary.facets_modified));
    out.push(format!("- Facets unchanged: {}", diff.summary.facets_unchanged));
    out.push(format!("- Row changes: {}", diff.summary.row_changes));

    for facet in diff.facets.iter().filter(|f| f.status != ChangeType::Unchanged) {
        out.push(String::new());
        out.push(format!("### {} ({})", facet.facet, facet.status.label()));
        out.push(String::new());
        out.extend(render_change_table(facet, color));
    }

    let unchanged: Vec<&FacetDiff> = diff
        .facets
        .iter()
        .filter(|f| f.status == ChangeType::Unchanged)
        .collect();
    if !unchanged.is_empty() {
        out.push(String::new());
        out.push("### Unchanged".to_string());
        out.push(String::new());
        for facet in unchanged {
            out.push(format!("- {} ({} rows)", facet.facet, facet.after_rows));
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn render_change_table(facet: &FacetDiff, color: bool) -> Vec<String> {
    let columns = change_columns(facet);
    let mut header = vec![" ".to_string(), INDEX_COLUMN.to_string()];
    header.extend(columns.iter().cloned());

    let mut lines: Vec<(char, Vec<String>)> = Vec::new();
    for change in &facet.changes {
        if let Some(row) = &change.before {
            lines.push(('-', marked_cells('-', change.index, row, &columns)));
        }
        if let Some(row) = &change.after {
            lines.push(('+', marked_cells('+', change.index, row, &columns)));
        }
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for (_, cells) in &lines {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(table_line(&header, &widths));
    out.push(separator_line(&widths));
    for (marker, cells) in lines {
        let line = table_line(&cells, &widths);
        out.push(match (color, marker) {
            (true, '-') => format!("{RED}{line}{RESET}"),
            (true, _) => format!("{GREEN}{line}{RESET}"),
            (false, _) => line,
        });
    }
    out
}

fn change_columns(facet: &FacetDiff) -> Vec<String> {
    facet.facet.columns().iter().map(|c| c.to_string()).collect()
}

fn marked_cells(marker: char, index: usize, row: &Row, columns: &[String]) -> Vec<String> {
    let mut cells = vec![marker.to_string(), index.to_string()];
    cells.extend(
        columns
            .iter()
            .map(|c| row.get(c).cloned().unwrap_or_default()),
    );
    cells
}

pub(crate) fn table_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {cell:<width$} "))
        .collect();
    format!("|{}|", padded.join("|"))
}

pub(crate) fn separator_line(widths: &[usize]) -> String {
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("|{}|", dashes.join("|"))
}

/// Serialize a diff for programmatic consumption.
pub fn render_json(diff: &DocumentDiff) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(diff)?)
}

/// Pretty-printed JSON text of a diff.
pub fn render_json_pretty(diff: &DocumentDiff) -> Result<String> {
    Ok(serde_json::to_string_pretty(diff)?)
}
