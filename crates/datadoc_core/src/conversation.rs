//! Conversations: the append-only audit trail of a document's revisions.
//!
//! A conversation is an ordered sequence of document snapshots and the diffs between
//! consecutive snapshots. It only ever grows through [`Conversation::apply_changes`].

use serde::Serialize;

use crate::diff::{DocumentDiff, diff};
use crate::document::Document;
use crate::error::{DatadocError, Result};

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversationEntry {
    /// A full snapshot at a revision
    Document {
        /// 0-based revision number
        revision: usize,
        /// The snapshot
        document: Document,
    },
    /// What changed between two revisions
    Diff {
        /// Older revision
        from: usize,
        /// Newer revision
        to: usize,
        /// The structured difference
        diff: DocumentDiff,
    },
}

/// An ordered sequence of document snapshots and diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversation {
    entries: Vec<ConversationEntry>,
}

impl Conversation {
    /// Start a conversation with a single document at revision 0.
    pub fn from_document(document: Document) -> Self {
        Self {
            entries: vec![ConversationEntry::Document {
                revision: 0,
                document,
            }],
        }
    }

    pub(crate) fn from_entries(entries: Vec<ConversationEntry>) -> Self {
        Self { entries }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Number of document entries.
    pub fn document_count(&self) -> usize {
        self.documents().count()
    }

    /// Document entries as `(revision, document)` pairs, in order.
    pub fn documents(&self) -> impl Iterator<Item = (usize, &Document)> {
        self.entries.iter().filter_map(|entry| match entry {
            ConversationEntry::Document { revision, document } => Some((*revision, document)),
            ConversationEntry::Diff { .. } => None,
        })
    }

    /// The most recent document and its revision.
    pub fn latest(&self) -> Option<(usize, &Document)> {
        self.documents().last()
    }

    /// The most recent document.
    pub fn latest_document(&self) -> Option<&Document> {
        self.latest().map(|(_, doc)| doc)
    }

    /// The document at a given revision.
    pub fn document_at(&self, revision: usize) -> Result<&Document> {
        self.documents()
            .find(|(r, _)| *r == revision)
            .map(|(_, doc)| doc)
            .ok_or(DatadocError::RevisionNotFound(revision))
    }

    /// Apply `mutate` to a copy of the latest document and append the result.
    ///
    /// Appends exactly two entries, a diff from the latest revision to the new one and
    /// then the new document. Returns the new revision. If `mutate` or the diff fails,
    /// the conversation is left as it was.
    pub fn apply_changes<F>(&mut self, mutate: F) -> Result<usize>
    where
        F: FnOnce(&mut Document) -> Result<()>,
    {
        let (revision, latest) = self.latest().ok_or(DatadocError::EmptyConversation)?;

        let mut next = latest.clone();
        mutate(&mut next)?;
        let changes = diff(latest, &next)?;

        let next_revision = revision + 1;
        log::debug!(
            "Appending revision +{next_revision} ({} row changes)",
            changes.summary.row_changes
        );

        self.entries.push(ConversationEntry::Diff {
            from: revision,
            to: next_revision,
            diff: changes,
        });
        self.entries.push(ConversationEntry::Document {
            revision: next_revision,
            document: next,
        });
        Ok(next_revision)
    }
}

/// Functional form of [`Conversation::apply_changes`].
pub fn apply_changes_to_conversation<F>(
    mut conversation: Conversation,
    mutate: F,
) -> Result<Conversation>
where
    F: FnOnce(&mut Document) -> Result<()>,
{
    conversation.apply_changes(mutate)?;
    Ok(conversation)
}
