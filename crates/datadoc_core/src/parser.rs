//! Parsing the text format into documents and conversations.
//!
//! Parsing runs in two levels. The first splits a conversation into `#document[+n]:` and
//! `$diff[+i→+j]:` sections. The second reads the facet tables inside a document section:
//!
//! ```text
//! @meaning[1]:
//! | index | column | definition        |
//! |-------|--------|-------------------|
//! | 1     | id     | Unique identifier |
//! ```
//!
//! Diff sections are not read back from their markdown. Each diff entry is rebuilt from
//! the two documents it connects, which yields the same structure the generator wrote.

use crate::conversation::{Conversation, ConversationEntry};
use crate::diff::diff;
use crate::document::Document;
use crate::error::{DatadocError, Result};
use crate::facet::{FacetKind, INDEX_COLUMN, Row};

/// Options controlling how forgiving the parser is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Treat a facet whose `[count]` disagrees with its data rows as a format error
    /// instead of logging a warning.
    pub strict_counts: bool,
}

/// A section header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Conversation(usize),
    Document(usize),
    Diff(usize, usize),
}

enum Section<'a> {
    Document {
        revision: usize,
        lines: Vec<&'a str>,
    },
    Diff {
        from: usize,
        to: usize,
    },
}

/// Parse a single document's facet sections.
pub fn parse_document(text: &str) -> Result<Document> {
    parse_document_with(text, &ParseOptions::default())
}

/// Parse a single document with explicit options.
pub fn parse_document_with(text: &str, options: &ParseOptions) -> Result<Document> {
    let lines: Vec<&str> = strip_bom(text).lines().collect();
    parse_document_lines(&lines, options)
}

/// Parse a conversation.
///
/// Text without a `#conversation[N]:` first line is read as a single document at
/// revision 0.
pub fn parse_conversation(text: &str) -> Result<Conversation> {
    parse_conversation_with(text, &ParseOptions::default())
}

/// Parse a conversation with explicit options.
pub fn parse_conversation_with(text: &str, options: &ParseOptions) -> Result<Conversation> {
    let text = strip_bom(text);
    let mut lines = text.lines();

    let declared = match lines.next().map(parse_header).transpose()?.flatten() {
        Some(Header::Conversation(count)) => count,
        _ => {
            log::debug!("No conversation header, reading a single document");
            return Ok(Conversation::from_document(parse_document_with(
                text, options,
            )?));
        }
    };

    let mut sections: Vec<Section<'_>> = Vec::new();
    for line in lines {
        match parse_header(line)? {
            Some(Header::Conversation(_)) => {
                return Err(DatadocError::Format(
                    "conversations cannot be nested".to_string(),
                ));
            }
            Some(Header::Document(revision)) => {
                log::debug!("Opening document section +{revision}");
                sections.push(Section::Document {
                    revision,
                    lines: Vec::new(),
                });
            }
            Some(Header::Diff(from, to)) => {
                log::debug!("Opening diff section +{from}→+{to}");
                sections.push(Section::Diff { from, to });
            }
            None => match sections.last_mut() {
                Some(Section::Document { lines, .. }) => lines.push(line),
                // Diff bodies are rebuilt from their documents.
                Some(Section::Diff { .. }) => {}
                None if line.trim().is_empty() => {}
                None => log::debug!("Ignoring content before the first section: {line}"),
            },
        }
    }

    let found = sections
        .iter()
        .filter(|s| matches!(s, Section::Document { .. }))
        .count();
    if found != declared {
        return Err(DatadocError::Format(format!(
            "conversation declares {declared} documents but contains {found}"
        )));
    }

    let mut documents: Vec<(usize, Document)> = Vec::with_capacity(found);
    for section in &sections {
        if let Section::Document { revision, lines } = section {
            if documents.iter().any(|(r, _)| r == revision) {
                return Err(DatadocError::Format(format!(
                    "document +{revision} appears more than once"
                )));
            }
            documents.push((*revision, parse_document_lines(lines, options)?));
        }
    }

    let find = |revision: usize| {
        documents
            .iter()
            .find(|(r, _)| *r == revision)
            .map(|(_, doc)| doc)
            .ok_or_else(|| {
                DatadocError::Format(format!("diff refers to missing document +{revision}"))
            })
    };

    let mut entries = Vec::with_capacity(sections.len());
    for section in &sections {
        match section {
            Section::Document { revision, .. } => entries.push(ConversationEntry::Document {
                revision: *revision,
                document: find(*revision)?.clone(),
            }),
            Section::Diff { from, to } => {
                let changes = diff(find(*from)?, find(*to)?).map_err(|e| {
                    DatadocError::Format(format!("diff +{from}→+{to}: {e}"))
                })?;
                entries.push(ConversationEntry::Diff {
                    from: *from,
                    to: *to,
                    diff: changes,
                });
            }
        }
    }

    Ok(Conversation::from_entries(entries))
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Recognise a section header.
///
/// Returns `Ok(None)` for ordinary lines and an error for lines that start like a header
/// but do not match its exact form.
fn parse_header(line: &str) -> Result<Option<Header>> {
    let line = line.trim();
    let malformed = || DatadocError::Format(format!("malformed section header: {line}"));

    if line.starts_with("#conversation") {
        let count = bracketed(line, "#conversation[").ok_or_else(malformed)?;
        return Ok(Some(Header::Conversation(
            count.parse().map_err(|_| malformed())?,
        )));
    }
    if line.starts_with("#document") {
        let revision = bracketed(line, "#document[+").ok_or_else(malformed)?;
        return Ok(Some(Header::Document(
            revision.parse().map_err(|_| malformed())?,
        )));
    }
    if line.starts_with("$diff") {
        let range = bracketed(line, "$diff[+").ok_or_else(malformed)?;
        let (from, to) = range.split_once("→+").ok_or_else(malformed)?;
        return Ok(Some(Header::Diff(
            from.parse().map_err(|_| malformed())?,
            to.parse().map_err(|_| malformed())?,
        )));
    }
    Ok(None)
}

/// The text between `prefix` and a closing `]:`.
fn bracketed<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix("]:")
}

fn parse_facet_header(line: &str) -> Result<(FacetKind, usize)> {
    let malformed = || DatadocError::Format(format!("malformed facet header: {line}"));
    let inner = line
        .strip_prefix('@')
        .and_then(|rest| rest.strip_suffix("]:"))
        .ok_or_else(malformed)?;
    let (name, count) = inner.split_once('[').ok_or_else(malformed)?;
    let kind: FacetKind = name.trim().parse()?;
    let count = count.trim().parse().map_err(|_| malformed())?;
    Ok((kind, count))
}

fn split_cells(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
        })
}

/// The facet currently being read.
struct OpenFacet {
    kind: FacetKind,
    declared: usize,
    parsed: usize,
}

impl OpenFacet {
    fn close(&self, options: &ParseOptions) -> Result<()> {
        if self.declared == self.parsed {
            return Ok(());
        }
        let message = format!(
            "facet '{}' declares {} rows but contains {}",
            self.kind, self.declared, self.parsed
        );
        if options.strict_counts {
            return Err(DatadocError::Format(message));
        }
        log::warn!("{message}");
        Ok(())
    }
}

fn parse_document_lines(lines: &[&str], options: &ParseOptions) -> Result<Document> {
    let mut doc = Document::new();
    let mut open: Option<OpenFacet> = None;
    let mut columns: Vec<String> = Vec::new();
    let mut header_parsed = false;

    for line in lines {
        let line = line.trim();

        if line.is_empty() {
            if !columns.is_empty() {
                columns.clear();
                header_parsed = false;
            }
            continue;
        }

        if parse_header(line)?.is_some() {
            return Err(DatadocError::Format(format!(
                "unexpected section header inside a document: {line}"
            )));
        }

        if line.starts_with('@') {
            let (kind, declared) = parse_facet_header(line)?;
            if let Some(previous) = open.take() {
                previous.close(options)?;
            }
            log::debug!("Reading facet {kind}");
            open = Some(OpenFacet {
                kind,
                declared,
                parsed: 0,
            });
            columns.clear();
            header_parsed = false;
            continue;
        }

        if !line.starts_with('|') {
            continue;
        }

        let Some(facet) = open.as_mut() else {
            log::debug!("Ignoring table row outside a facet: {line}");
            continue;
        };

        let cells = split_cells(line);
        if columns.is_empty() {
            check_header_columns(facet.kind, &cells)?;
            columns = cells;
            header_parsed = false;
            continue;
        }
        if !header_parsed {
            if is_separator(&cells) {
                header_parsed = true;
            } else {
                log::debug!("Ignoring {} row before its separator", facet.kind);
            }
            continue;
        }

        let row = shape_row(facet.kind, &columns, cells);
        doc.push_row(facet.kind, row);
        facet.parsed += 1;
    }

    if let Some(facet) = open {
        facet.close(options)?;
    }
    Ok(doc)
}

fn check_header_columns(kind: FacetKind, header: &[String]) -> Result<()> {
    if kind.is_table() {
        return Ok(());
    }
    for column in header {
        if column != INDEX_COLUMN && !kind.columns().contains(&column.as_str()) {
            return Err(DatadocError::Format(format!(
                "'{column}' is not a column of '{kind}'"
            )));
        }
    }
    Ok(())
}

/// Zip a data row against its header. Semantic facets drop `index` and are laid out in
/// schema order; missing cells are empty.
fn shape_row(kind: FacetKind, columns: &[String], cells: Vec<String>) -> Row {
    let mut by_column: Row = columns
        .iter()
        .cloned()
        .zip(cells.into_iter().chain(std::iter::repeat(String::new())))
        .collect();

    if kind.is_table() {
        return by_column;
    }

    kind.columns()
        .iter()
        .map(|column| {
            let value = by_column.swap_remove(*column).unwrap_or_default();
            (column.to_string(), value)
        })
        .collect()
}
