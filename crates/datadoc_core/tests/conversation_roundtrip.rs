//! End-to-end tests through the public API and the real filesystem.

use std::path::Path;

use datadoc_core::fs::RealFileSystem;
use datadoc_core::{
    ChangeType, Conversation, ConversationEntry, DatadocApp, DatadocError, Document, FacetKind,
    Row, TabularSource, apply_changes_to_conversation, delete_rows, diff, generate_conversation,
    generate_document, insert_row, parse_conversation, parse_document, patch_from_json,
    render_json, render_markdown, update_row,
};

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn sales() -> TabularSource {
    TabularSource {
        headers: vec!["region".into(), "month".into(), "revenue".into()],
        rows: vec![
            vec!["north".into(), "2024-01".into(), "1200".into()],
            vec!["south".into(), "2024-01".into(), "".into()],
        ],
    }
}

fn annotated() -> Document {
    let mut doc = Document::from_source(&sales()).unwrap();
    insert_row(
        &mut doc,
        FacetKind::Meaning,
        row(&[("column", "revenue"), ("definition", "Gross revenue in EUR")]),
    )
    .unwrap();
    insert_row(
        &mut doc,
        FacetKind::Structure,
        row(&[
            ("column", "revenue"),
            ("nullAllowed", "true"),
            ("dataType", "number"),
            ("minValue", "0"),
        ]),
    )
    .unwrap();
    insert_row(
        &mut doc,
        FacetKind::Ambiguity,
        row(&[
            ("query_trigger", "best region"),
            ("ambiguity_type", "metric"),
            ("ambiguity_risk", "high"),
        ]),
    )
    .unwrap();
    insert_row(
        &mut doc,
        FacetKind::Query,
        row(&[
            ("user_message", "Which region did best?"),
            ("timestamp_utc", "2024-02-01T10:00:00Z"),
        ]),
    )
    .unwrap();
    insert_row(
        &mut doc,
        FacetKind::Tasks,
        row(&[
            ("name", "total"),
            ("description", "Revenue per region"),
            ("formula", "sum(revenue) by region"),
        ]),
    )
    .unwrap();
    doc
}

#[test]
fn document_round_trip() {
    let doc = annotated();
    let text = generate_document(&doc);
    assert_eq!(parse_document(&text).unwrap(), doc);
    assert_eq!(generate_document(&parse_document(&text).unwrap()), text);
}

#[test]
fn conversation_round_trip_rebuilds_diffs() {
    let conversation = Conversation::from_document(Document::from_source(&sales()).unwrap());
    let conversation = apply_changes_to_conversation(conversation, |doc| {
        insert_row(
            doc,
            FacetKind::Context,
            row(&[("key", "currency"), ("value", "EUR")]),
        )
    })
    .unwrap();
    let conversation = apply_changes_to_conversation(conversation, |doc| {
        update_row(doc, FacetKind::Context, 1, &row(&[("value", "USD")]))?;
        insert_row(doc, FacetKind::Score, row(&[("measure", "completeness"), ("value", "0.83")]))
    })
    .unwrap();

    let text = generate_conversation(&conversation);
    let parsed = parse_conversation(&text).unwrap();

    assert_eq!(parsed, conversation);
    assert_eq!(generate_conversation(&parsed), text);
}

#[test]
fn diff_of_identical_documents_is_empty() {
    let doc = annotated();
    let d = diff(&doc, &doc).unwrap();

    assert!(d.is_empty());
    assert_eq!(d.summary.row_changes, 0);
    assert_eq!(d.summary.facets_unchanged, 8);
    assert!(render_markdown(&d, false).contains("### Unchanged"));
}

#[test]
fn diff_classification_is_symmetric() {
    let before = annotated();
    let mut after = before.clone();
    insert_row(&mut after, FacetKind::Context, row(&[("key", "owner")])).unwrap();
    delete_rows(&mut after, FacetKind::Tasks, &[1]).unwrap();
    update_row(&mut after, FacetKind::Meaning, 1, &row(&[("definition", "Net")])).unwrap();

    let forward = diff(&before, &after).unwrap();
    let backward = diff(&after, &before).unwrap();

    let status = |d: &datadoc_core::DocumentDiff, kind| d.facet(kind).unwrap().status;
    assert_eq!(status(&forward, FacetKind::Context), ChangeType::Added);
    assert_eq!(status(&backward, FacetKind::Context), ChangeType::Removed);
    assert_eq!(status(&forward, FacetKind::Tasks), ChangeType::Removed);
    assert_eq!(status(&backward, FacetKind::Tasks), ChangeType::Added);
    assert_eq!(status(&forward, FacetKind::Meaning), ChangeType::Modified);
    assert_eq!(status(&backward, FacetKind::Meaning), ChangeType::Modified);
    assert_eq!(forward.summary.row_changes, backward.summary.row_changes);
}

#[test]
fn diff_requires_matching_datasets() {
    let before = annotated();
    let mut source = sales();
    source.rows[1][2] = "900".into();
    let after = Document::from_source(&source).unwrap();

    let err = diff(&before, &after).unwrap_err();
    assert!(matches!(err, DatadocError::DatasetMismatch));
    assert_eq!(
        err.to_string(),
        "DIFF operations can only be performed on matching datasets"
    );
}

#[test]
fn json_rendering_exposes_changes() {
    let before = annotated();
    let mut after = before.clone();
    update_row(&mut after, FacetKind::Meaning, 1, &row(&[("definition", "Net")])).unwrap();

    let json = render_json(&diff(&before, &after).unwrap()).unwrap();
    assert_eq!(json["summary"]["row_changes"], 1);
    let meaning = json["facets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["facet"] == "meaning")
        .unwrap();
    assert_eq!(meaning["status"], "modified");
    assert_eq!(meaning["changes"][0]["before"]["definition"], "Gross revenue in EUR");
    assert_eq!(meaning["changes"][0]["after"]["definition"], "Net");
}

#[test]
fn declared_count_mismatch_is_rejected() {
    let doc = generate_document(&Document::new());
    let text = format!("#conversation[2]:\n\n#document[+0]:\n{doc}");
    assert!(matches!(
        parse_conversation(&text),
        Err(DatadocError::Format(_))
    ));
}

#[test]
fn file_workflow_keeps_audit_trail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.md");
    let app = DatadocApp::new(RealFileSystem);

    app.create_from_source(&path, &sales()).unwrap();
    let patch = patch_from_json(r#"{"column": "region", "definition": "Sales region"}"#).unwrap();
    app.insert_row(&path, FacetKind::Meaning, patch).unwrap();
    app.update_row(
        &path,
        FacetKind::Meaning,
        1,
        &row(&[("definition", "Sales territory")]),
    )
    .unwrap();
    app.delete_rows(&path, FacetKind::Meaning, &[1]).unwrap();

    let conversation = app.read_conversation(&path).unwrap();
    assert_eq!(conversation.document_count(), 4);
    assert!(matches!(
        conversation.entries().last(),
        Some(ConversationEntry::Document { revision: 3, .. })
    ));
    assert!(conversation.latest_document().unwrap().facet(FacetKind::Meaning).is_empty());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#conversation[4]:\n"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let first_step = app.diff_revisions(&path, Some(0), Some(1)).unwrap();
    assert_eq!(
        first_step.facet(FacetKind::Meaning).unwrap().status,
        ChangeType::Added
    );
}

#[test]
fn file_errors_carry_the_path() {
    let app = DatadocApp::new(RealFileSystem);
    let err = app
        .read_conversation(Path::new("/definitely/not/here.md"))
        .unwrap_err();
    let serializable = err.to_serializable();
    assert_eq!(
        serializable.path.as_deref(),
        Some(Path::new("/definitely/not/here.md"))
    );
}
