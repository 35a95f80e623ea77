//! Rendering documents and conversations to text.
//!
//! Output is always accepted by [`crate::parser`] and parses back to the same model.

use crate::conversation::{Conversation, ConversationEntry};
use crate::diff::{render_markdown, separator_line, table_line};
use crate::document::Document;
use crate::facet::{Facet, INDEX_COLUMN};

/// Render every facet of a document, in fixed order, separated by blank lines.
pub fn generate_document(doc: &Document) -> String {
    let facets: Vec<String> = doc.facets().map(generate_facet).collect();
    let mut text = facets.join("\n\n");
    text.push('\n');
    text
}

/// Render a conversation: header, then each entry in sequence order.
pub fn generate_conversation(conversation: &Conversation) -> String {
    let header = format!("#conversation[{}]:", conversation.document_count());

    let sections: Vec<String> = conversation
        .entries()
        .iter()
        .map(|entry| match entry {
            ConversationEntry::Document { revision, document } => format!(
                "#document[+{revision}]:\n{}",
                generate_document(document).trim_end()
            ),
            ConversationEntry::Diff { from, to, diff } => format!(
                "$diff[+{from}→+{to}]:\n{}",
                render_markdown(diff, false).trim_end()
            ),
        })
        .collect();

    if sections.is_empty() {
        return format!("{header}\n");
    }
    format!("{header}\n\n{}\n", sections.join("\n\n"))
}

fn generate_facet(facet: &Facet) -> String {
    let kind = facet.kind();
    let data_columns = facet.columns();

    let header: Vec<String> = if kind.is_table() {
        if data_columns.is_empty() {
            vec![INDEX_COLUMN.to_string()]
        } else {
            data_columns.clone()
        }
    } else {
        std::iter::once(INDEX_COLUMN.to_string())
            .chain(data_columns.iter().cloned())
            .collect()
    };

    let body: Vec<Vec<String>> = facet
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let values = data_columns
                .iter()
                .map(|column| row.get(column).cloned().unwrap_or_default());
            if kind.is_table() {
                values.collect()
            } else {
                std::iter::once((i + 1).to_string()).chain(values).collect()
            }
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(format!("@{kind}[{}]:", facet.len()));
    lines.push(table_line(&header, &widths));
    lines.push(separator_line(&widths));
    lines.extend(body.iter().map(|cells| table_line(cells, &widths)));
    lines.join("\n")
}
