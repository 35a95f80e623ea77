//! `diff` and `history` command handlers

use std::path::Path;

use colored::Colorize;
use datadoc_core::config::{ColorChoice, Config, DiffFormat};
use datadoc_core::{
    ChangeType, Conversation, ConversationEntry, DocumentDiff, render_json_pretty,
    render_markdown,
};

use crate::cli::CliDatadocApp;
use crate::cli::util::{print_error, use_color};

/// Handle the 'diff' command
/// Returns true on success, false on error
pub fn handle_diff(
    app: &CliDatadocApp,
    config: &Config,
    path: &Path,
    from: Option<usize>,
    to: Option<usize>,
    json: bool,
    color: Option<ColorChoice>,
) -> bool {
    let json = json || config.diff_format == DiffFormat::Json;

    let diff = match app.diff_revisions(path, from, to) {
        Ok(diff) => diff,
        Err(e) => {
            print_error(&e, json);
            return false;
        }
    };

    if json {
        return match render_json_pretty(&diff) {
            Ok(text) => {
                println!("{text}");
                true
            }
            Err(e) => {
                print_error(&e, true);
                false
            }
        };
    }

    let color = use_color(color.unwrap_or(config.color));
    print!("{}", render_markdown(&diff, color));
    true
}

/// Handle the 'history' command
pub fn handle_history(app: &CliDatadocApp, path: &Path) -> bool {
    match app.read_conversation(path) {
        Ok(conversation) => {
            for line in history_lines(&conversation) {
                println!("{line}");
            }
            true
        }
        Err(e) => {
            print_error(&e, false);
            false
        }
    }
}

fn history_lines(conversation: &Conversation) -> Vec<String> {
    let mut lines = vec![format!(
        "{} revision(s), {} entries",
        conversation.document_count(),
        conversation.entries().len()
    )];

    for entry in conversation.entries() {
        match entry {
            ConversationEntry::Document { revision, document } => {
                let filled: Vec<String> = document
                    .facets()
                    .filter(|f| !f.is_empty())
                    .map(|f| format!("{} {}", f.kind(), f.len()))
                    .collect();
                let summary = if filled.is_empty() {
                    "empty".to_string()
                } else {
                    filled.join(", ")
                };
                lines.push(format!("{} {}", format!("+{revision}").bold(), summary));
            }
            ConversationEntry::Diff { from, to, diff } => {
                lines.push(format!("  {} {}", format!("+{from}→+{to}").dimmed(), describe(diff)));
            }
        }
    }
    lines
}

fn describe(diff: &DocumentDiff) -> String {
    if diff.is_empty() {
        return "no changes".to_string();
    }
    let facets: Vec<String> = diff
        .facets
        .iter()
        .filter(|f| f.status != ChangeType::Unchanged)
        .map(|f| format!("{} {}", f.facet, f.status.label()))
        .collect();
    format!(
        "{} row change(s): {}",
        diff.summary.row_changes,
        facets.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadoc_core::{Document, FacetKind, TabularSource, apply_changes_to_conversation, insert_row};

    #[test]
    fn test_history_describes_each_entry() {
        colored::control::set_override(false);

        let doc = Document::from_source(&TabularSource {
            headers: vec!["id".into()],
            rows: vec![vec!["1".into()], vec!["2".into()]],
        })
        .unwrap();
        let conversation = apply_changes_to_conversation(Conversation::from_document(doc), |d| {
            let row = [("key".to_string(), "owner".to_string())].into_iter().collect();
            insert_row(d, FacetKind::Context, row)
        })
        .unwrap();

        let lines = history_lines(&conversation);
        assert_eq!(
            lines,
            vec![
                "2 revision(s), 3 entries".to_string(),
                "+0 table 2".to_string(),
                "  +0→+1 1 row change(s): context added".to_string(),
                "+1 table 2, context 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_describe_empty_diff() {
        let doc = Document::new();
        let diff = datadoc_core::diff(&doc, &doc).unwrap();
        assert_eq!(describe(&diff), "no changes");
    }
}
