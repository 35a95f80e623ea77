//! `init` command: turn a CSV file into a new conversation file

use std::path::Path;

use datadoc_core::{Conversation, DatadocError, Document, Result, TabularSource};

use crate::cli::CliDatadocApp;
use crate::cli::util::report;

/// Handle the init command
/// Returns true on success, false on error
pub fn handle_init(app: &CliDatadocApp, csv: &Path, output: &Path, force: bool) -> bool {
    let result = read_csv_file(csv).and_then(|source| {
        if force {
            let conversation = Conversation::from_document(Document::from_source(&source)?);
            app.write_conversation(output, &conversation)?;
            Ok(conversation)
        } else {
            app.create_from_source(output, &source)
        }
    });

    report(result, |conversation| {
        let rows = conversation
            .latest_document()
            .map(|doc| doc.facet(datadoc_core::FacetKind::Table).len())
            .unwrap_or_default();
        format!("Created {} ({} rows)", output.display(), rows)
    })
}

fn read_csv_file(path: &Path) -> Result<TabularSource> {
    let text = std::fs::read_to_string(path).map_err(|e| DatadocError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_csv(&text)
}

/// Parse CSV text into headers and records.
///
/// Handles quoted fields (with embedded commas, doubled quotes and line breaks), CRLF line
/// endings and a leading byte-order mark. Blank lines are skipped.
pub fn read_csv(text: &str) -> Result<TabularSource> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => end_record(&mut records, &mut record, &mut field),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DatadocError::Csv("unterminated quoted field".to_string()));
    }
    end_record(&mut records, &mut record, &mut field);

    let mut records = records.into_iter();
    let headers = records
        .next()
        .ok_or_else(|| DatadocError::Csv("no header row".to_string()))?;

    Ok(TabularSource {
        headers: headers.iter().map(|h| h.trim().to_string()).collect(),
        rows: records.collect(),
    })
}

fn end_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    let done = std::mem::take(record);
    // blank line
    if done.len() == 1 && done[0].is_empty() {
        return;
    }
    records.push(done);
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadoc_core::fs::RealFileSystem;
    use datadoc_core::{DatadocApp, FacetKind};

    #[test]
    fn test_read_simple_csv() {
        let source = read_csv("id,product\n1,Widget\n2,Gadget\n").unwrap();
        assert_eq!(source.headers, vec!["id", "product"]);
        assert_eq!(source.rows.len(), 2);
        assert_eq!(source.rows[1], vec!["2", "Gadget"]);
    }

    #[test]
    fn test_quoted_fields() {
        let source = read_csv("name,note\r\n\"Smith, J\",\"said \"\"hi\"\"\"\r\n").unwrap();
        assert_eq!(source.rows, vec![vec!["Smith, J", "said \"hi\""]]);
    }

    #[test]
    fn test_blank_lines_and_bom_are_ignored() {
        let source = read_csv("\u{feff}a,b\n\n1,2\n\n").unwrap();
        assert_eq!(source.headers, vec!["a", "b"]);
        assert_eq!(source.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_missing_final_newline() {
        let source = read_csv("a,b\n1,").unwrap();
        assert_eq!(source.rows, vec![vec!["1", ""]]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(read_csv("a\n\"open"), Err(DatadocError::Csv(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(read_csv(""), Err(DatadocError::Csv(_))));
    }

    #[test]
    fn test_init_creates_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("sales.csv");
        let output = dir.path().join("sales.md");
        std::fs::write(&csv, "region,revenue\nnorth,1200\n").unwrap();
        let app = DatadocApp::new(RealFileSystem);

        assert!(handle_init(&app, &csv, &output, false));
        assert!(!handle_init(&app, &csv, &output, false));
        assert!(handle_init(&app, &csv, &output, true));

        let conversation = app.read_conversation(&output).unwrap();
        let table = conversation.latest_document().unwrap().facet(FacetKind::Table);
        assert_eq!(table.row(1).unwrap()["revenue"], "1200");
    }
}
