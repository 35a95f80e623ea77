//! Path-addressed operations on conversation files.
//!
//! Every mutation reads the whole file, applies the change through
//! [`Conversation::apply_changes`] so the file keeps its audit trail, renders the complete
//! new text in memory and only then replaces the file.

use std::path::{Path, PathBuf};

use crate::conversation::Conversation;
use crate::diff::{DocumentDiff, diff};
use crate::document::{Document, TabularSource};
use crate::error::{DatadocError, Result};
use crate::facet::{FacetKind, Row};
use crate::fs::FileSystem;
use crate::generator::generate_conversation;
use crate::parser::{ParseOptions, parse_conversation_with};
use crate::rows;

/// Entry point for working with conversation files through a [`FileSystem`].
pub struct DatadocApp<FS: FileSystem> {
    fs: FS,
    options: ParseOptions,
}

impl<FS: FileSystem> DatadocApp<FS> {
    /// Create an app with default parse options.
    pub fn new(fs: FS) -> Self {
        Self {
            fs,
            options: ParseOptions::default(),
        }
    }

    /// Create an app with explicit parse options.
    pub fn with_options(fs: FS, options: ParseOptions) -> Self {
        Self { fs, options }
    }

    /// Read and parse the conversation stored at `path`.
    pub fn read_conversation(&self, path: &Path) -> Result<Conversation> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| DatadocError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        parse_conversation_with(&content, &self.options)
    }

    /// Render a conversation and replace the file at `path` with it.
    pub fn write_conversation(&self, path: &Path, conversation: &Conversation) -> Result<()> {
        let content = generate_conversation(conversation);
        self.fs
            .write_file(path, &content)
            .map_err(|e| DatadocError::FileWrite {
                path: PathBuf::from(path),
                source: e,
            })?;
        log::info!(
            "Wrote {} ({} documents)",
            path.display(),
            conversation.document_count()
        );
        Ok(())
    }

    /// Start a new conversation file from source data. Fails if the file exists.
    pub fn create_from_source(&self, path: &Path, source: &TabularSource) -> Result<Conversation> {
        let conversation = Conversation::from_document(Document::from_source(source)?);
        let content = generate_conversation(&conversation);
        self.fs
            .create_new(path, &content)
            .map_err(|e| DatadocError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        log::info!("Created {}", path.display());
        Ok(conversation)
    }

    /// Apply `mutate` to the latest document in the file and append the new revision.
    ///
    /// Returns the new revision number. Nothing is written if any step fails.
    pub fn apply_changes<F>(&self, path: &Path, mutate: F) -> Result<usize>
    where
        F: FnOnce(&mut Document) -> Result<()>,
    {
        let mut conversation = self.read_conversation(path)?;
        let revision = conversation.apply_changes(mutate)?;
        self.write_conversation(path, &conversation)?;
        Ok(revision)
    }

    /// File form of [`rows::update_row`].
    pub fn update_row(
        &self,
        path: &Path,
        facet: FacetKind,
        index: usize,
        patch: &Row,
    ) -> Result<usize> {
        self.apply_changes(path, |doc| rows::update_row(doc, facet, index, patch))
    }

    /// File form of [`rows::insert_row`].
    pub fn insert_row(&self, path: &Path, facet: FacetKind, row: Row) -> Result<usize> {
        self.apply_changes(path, |doc| rows::insert_row(doc, facet, row))
    }

    /// File form of [`rows::delete_row`].
    pub fn delete_row(&self, path: &Path, facet: FacetKind, index: usize) -> Result<usize> {
        self.apply_changes(path, |doc| rows::delete_row(doc, facet, index))
    }

    /// File form of [`rows::delete_rows`].
    pub fn delete_rows(&self, path: &Path, facet: FacetKind, indices: &[usize]) -> Result<usize> {
        self.apply_changes(path, |doc| rows::delete_rows(doc, facet, indices))
    }

    /// Diff two revisions stored in the same file.
    ///
    /// `to` defaults to the latest revision and `from` to the document just before it.
    pub fn diff_revisions(
        &self,
        path: &Path,
        from: Option<usize>,
        to: Option<usize>,
    ) -> Result<DocumentDiff> {
        let conversation = self.read_conversation(path)?;
        let revisions: Vec<usize> = conversation.documents().map(|(r, _)| r).collect();
        let latest = *revisions.last().ok_or(DatadocError::EmptyConversation)?;

        let to = to.unwrap_or(latest);
        let from = match from {
            Some(from) => from,
            None => {
                let position = revisions
                    .iter()
                    .position(|r| *r == to)
                    .ok_or(DatadocError::RevisionNotFound(to))?;
                revisions[position.saturating_sub(1)]
            }
        };

        diff(conversation.document_at(from)?, conversation.document_at(to)?)
    }
}
