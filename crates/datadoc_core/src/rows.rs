//! In-memory row operations on a document's facets.
//!
//! Indices are 1-based positions within a facet. Inserting always appends, so the
//! indices of existing rows never move on insert.

use std::collections::BTreeSet;

use crate::document::Document;
use crate::error::{DatadocError, Result};
use crate::facet::{FacetKind, INDEX_COLUMN, Row};

/// Trim a cell value and make sure it can be written into a table row.
pub(crate) fn clean_cell(value: &str) -> std::result::Result<String, &'static str> {
    let value = value.trim();
    if value.contains('|') {
        return Err("values may not contain '|'");
    }
    if value.contains(['\n', '\r']) {
        return Err("values may not contain line breaks");
    }
    Ok(value.to_string())
}

fn clean_field(column: &str, value: &str) -> Result<String> {
    clean_cell(value).map_err(|reason| DatadocError::InvalidPatch(format!("'{column}': {reason}")))
}

/// Check that every key of `fields` is a column of the facet.
fn check_columns(doc: &Document, kind: FacetKind, fields: &Row) -> Result<Vec<String>> {
    let columns = doc.facet(kind).columns();
    for key in fields.keys() {
        if !kind.is_table() && key == INDEX_COLUMN {
            return Err(DatadocError::InvalidPatch(format!(
                "'{INDEX_COLUMN}' is positional and cannot be set on '{kind}'"
            )));
        }
        if !columns.iter().any(|c| c == key) {
            return Err(DatadocError::InvalidPatch(format!(
                "'{key}' is not a column of '{kind}'"
            )));
        }
    }
    Ok(columns)
}

fn check_index(doc: &Document, kind: FacetKind, index: usize) -> Result<()> {
    let len = doc.facet(kind).len();
    if index == 0 || index > len {
        return Err(DatadocError::Index {
            facet: kind,
            index,
            len,
        });
    }
    Ok(())
}

/// Merge `patch` into the row at `index`. Fields not named in the patch are untouched.
pub fn update_row(doc: &mut Document, facet: FacetKind, index: usize, patch: &Row) -> Result<()> {
    check_index(doc, facet, index)?;
    check_columns(doc, facet, patch)?;

    let mut cleaned = Vec::with_capacity(patch.len());
    for (column, value) in patch {
        cleaned.push((column.clone(), clean_field(column, value)?));
    }

    let row = &mut doc.facet_mut(facet).rows_mut()[index - 1];
    for (column, value) in cleaned {
        row.insert(column, value);
    }

    log::debug!("Updated {facet} row {index}");
    Ok(())
}

/// Append `row` to the end of the facet.
///
/// The row is laid out in the facet's column order and missing columns are filled with
/// empty strings. The first row of an empty table facet defines the table's columns.
pub fn insert_row(doc: &mut Document, facet: FacetKind, row: Row) -> Result<()> {
    let shaped = if facet.is_table() && doc.facet(facet).is_empty() {
        if row.is_empty() {
            return Err(DatadocError::InvalidPatch(
                "the first table row must name at least one column".to_string(),
            ));
        }
        let mut shaped = Row::with_capacity(row.len());
        for (column, value) in &row {
            let column = clean_field(column, column)?;
            let value = clean_field(&column, value)?;
            shaped.insert(column, value);
        }
        shaped
    } else {
        let columns = check_columns(doc, facet, &row)?;
        let mut shaped = Row::with_capacity(columns.len());
        for column in columns {
            let value = match row.get(&column) {
                Some(value) => clean_field(&column, value)?,
                None => String::new(),
            };
            shaped.insert(column, value);
        }
        shaped
    };

    doc.facet_mut(facet).rows_mut().push(shaped);
    log::debug!("Inserted {facet} row {}", doc.facet(facet).len());
    Ok(())
}

/// Remove the row at `index`.
pub fn delete_row(doc: &mut Document, facet: FacetKind, index: usize) -> Result<()> {
    delete_rows(doc, facet, &[index])
}

/// Remove several rows at once.
///
/// Every index refers to the facet as it was before the call, so the order of `indices`
/// does not matter. If any index is out of range nothing is removed.
pub fn delete_rows(doc: &mut Document, facet: FacetKind, indices: &[usize]) -> Result<()> {
    for &index in indices {
        check_index(doc, facet, index)?;
    }

    let doomed: BTreeSet<usize> = indices.iter().map(|i| i - 1).collect();
    let rows = doc.facet_mut(facet).rows_mut();
    let mut position = 0;
    rows.retain(|_| {
        let keep = !doomed.contains(&position);
        position += 1;
        keep
    });

    log::debug!("Deleted {} {facet} rows", doomed.len());
    Ok(())
}

/// Decode a JSON patch or row: an object whose values are all strings.
pub fn patch_from_json(text: &str) -> Result<Row> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| DatadocError::InvalidPatch(format!("not valid JSON: {e}")))?;

    let serde_json::Value::Object(object) = value else {
        return Err(DatadocError::InvalidPatch(
            "expected a JSON object of string fields".to_string(),
        ));
    };

    let mut row = Row::with_capacity(object.len());
    for (key, value) in object {
        match value {
            serde_json::Value::String(s) => {
                row.insert(key, s);
            }
            other => {
                return Err(DatadocError::InvalidPatch(format!(
                    "field '{key}' must be a string, got {other}"
                )));
            }
        }
    }
    Ok(row)
}
