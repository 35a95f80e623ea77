//! `show` command handler

use std::path::Path;

use datadoc_core::{Result, generate_document};

use crate::cli::CliDatadocApp;
use crate::cli::util::print_error;

/// Handle the 'show' command
/// Returns true on success, false on error
pub fn handle_show(app: &CliDatadocApp, path: &Path, revision: Option<usize>, json: bool) -> bool {
    match render(app, path, revision, json) {
        Ok(text) => {
            print!("{text}");
            true
        }
        Err(e) => {
            print_error(&e, json);
            false
        }
    }
}

fn render(app: &CliDatadocApp, path: &Path, revision: Option<usize>, json: bool) -> Result<String> {
    let conversation = app.read_conversation(path)?;
    let document = match revision {
        Some(revision) => conversation.document_at(revision)?,
        None => conversation
            .latest_document()
            .ok_or(datadoc_core::DatadocError::EmptyConversation)?,
    };

    if json {
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(generate_document(document))
    }
}
