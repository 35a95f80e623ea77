#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// File-level operations (read, mutate, write conversation files)
pub mod app;

/// Configuration options
pub mod config;

/// Conversations and their evolution
pub mod conversation;

/// Diff engine and renderers
pub mod diff;

/// Documents (one facet of each kind)
pub mod document;

/// Error (common error types)
pub mod error;

/// Facet kinds, facets and rows
pub mod facet;

/// Filesystem abstraction
pub mod fs;

/// Text rendering
pub mod generator;

/// Text parsing
pub mod parser;

pub mod rows;

#[cfg(test)]
pub mod test_utils;

pub use app::DatadocApp;
pub use conversation::{Conversation, ConversationEntry, apply_changes_to_conversation};
pub use diff::{
    ChangeType, DiffSummary, DocumentDiff, FacetDiff, RowChange, diff, render_json,
    render_json_pretty, render_markdown,
};
pub use document::{Document, TabularSource};
pub use error::{DatadocError, Result, SerializableError};
pub use facet::{Facet, FacetKind, Row};
pub use generator::{generate_conversation, generate_document};
pub use parser::{ParseOptions, parse_conversation, parse_document};
pub use rows::{delete_row, delete_rows, insert_row, patch_from_json, update_row};
