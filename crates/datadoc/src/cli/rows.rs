//! Row command handlers (update, insert, delete, ask)

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use datadoc_core::{FacetKind, Row, patch_from_json};

use crate::cli::CliDatadocApp;
use crate::cli::util::report;

/// Handle the 'update' command
pub fn handle_update(
    app: &CliDatadocApp,
    path: &Path,
    facet: FacetKind,
    index: usize,
    patch: &str,
) -> bool {
    let result =
        patch_from_json(patch).and_then(|patch| app.update_row(path, facet, index, &patch));
    report(result, |revision| {
        format!("Updated {facet} row {index} (revision +{revision})")
    })
}

/// Handle the 'insert' command
pub fn handle_insert(app: &CliDatadocApp, path: &Path, facet: FacetKind, row: &str) -> bool {
    let result = patch_from_json(row).and_then(|row| app.insert_row(path, facet, row));
    report(result, |revision| {
        format!("Inserted into {facet} (revision +{revision})")
    })
}

/// Handle the 'delete' command
pub fn handle_delete(app: &CliDatadocApp, path: &Path, facet: FacetKind, indices: &[usize]) -> bool {
    let result = app.delete_rows(path, facet, indices);
    report(result, |revision| {
        let listed: Vec<String> = indices.iter().map(ToString::to_string).collect();
        format!(
            "Deleted {facet} row(s) {} (revision +{revision})",
            listed.join(", ")
        )
    })
}

/// Handle the 'ask' command: record the question with the current UTC time
pub fn handle_ask(app: &CliDatadocApp, path: &Path, message: &str) -> bool {
    let row = query_row(message, &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let result = app.insert_row(path, FacetKind::Query, row);
    report(result, |revision| {
        format!("Recorded query (revision +{revision})")
    })
}

fn query_row(message: &str, timestamp: &str) -> Row {
    [("user_message", message), ("timestamp_utc", timestamp)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadoc_core::fs::RealFileSystem;
    use datadoc_core::{DatadocApp, TabularSource};

    fn setup() -> (tempfile::TempDir, std::path::PathBuf, CliDatadocApp) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.md");
        let app = DatadocApp::new(RealFileSystem);
        app.create_from_source(
            &path,
            &TabularSource {
                headers: vec!["id".into()],
                rows: vec![vec!["1".into()]],
            },
        )
        .unwrap();
        (dir, path, app)
    }

    #[test]
    fn test_insert_update_delete() {
        let (_dir, path, app) = setup();

        assert!(handle_insert(&app, &path, FacetKind::Meaning, r#"{"column": "id"}"#));
        assert!(handle_update(
            &app,
            &path,
            FacetKind::Meaning,
            1,
            r#"{"definition": "Unique identifier"}"#
        ));
        let doc = app.read_conversation(&path).unwrap();
        let meaning = doc.latest_document().unwrap().facet(FacetKind::Meaning);
        assert_eq!(meaning.row(1).unwrap()["definition"], "Unique identifier");

        assert!(handle_delete(&app, &path, FacetKind::Meaning, &[1]));
        assert_eq!(app.read_conversation(&path).unwrap().document_count(), 4);
    }

    #[test]
    fn test_bad_input_is_reported() {
        let (_dir, path, app) = setup();

        assert!(!handle_insert(&app, &path, FacetKind::Context, "not json"));
        assert!(!handle_update(&app, &path, FacetKind::Context, 1, r#"{"key": "a"}"#));
        assert!(!handle_delete(&app, &path, FacetKind::Context, &[0]));
        assert_eq!(app.read_conversation(&path).unwrap().document_count(), 1);
    }

    #[test]
    fn test_ask_records_query() {
        let (_dir, path, app) = setup();

        assert!(handle_ask(&app, &path, "Which id is largest?"));
        let conversation = app.read_conversation(&path).unwrap();
        let query = conversation.latest_document().unwrap().facet(FacetKind::Query);
        let row = query.row(1).unwrap();
        assert_eq!(row["user_message"], "Which id is largest?");
        assert!(row["timestamp_utc"].ends_with('Z'));
    }

    #[test]
    fn test_query_row_shape() {
        let row = query_row("hi", "2024-02-01T10:00:00Z");
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["user_message", "timestamp_utc"]);
    }
}
