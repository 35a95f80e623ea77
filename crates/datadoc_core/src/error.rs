use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::facet::FacetKind;

/// Unified error type for datadoc operations
#[derive(Debug, Error)]
pub enum DatadocError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Format errors
    #[error("Format error: {0}")]
    Format(String),

    #[error("Unknown facet '{0}'")]
    UnknownFacet(String),

    // Row operation errors
    #[error("Row index {index} is out of range for facet '{facet}' (rows: {len})")]
    Index {
        facet: FacetKind,
        index: usize,
        len: usize,
    },

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Diff and conversation errors
    #[error("DIFF operations can only be performed on matching datasets")]
    DatasetMismatch,

    #[error("Conversation has no document to evolve")]
    EmptyConversation,

    #[error("Revision +{0} not found in conversation")]
    RevisionNotFound(usize),

    // Source data errors
    #[error("CSV error: {0}")]
    Csv(String),

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type alias for datadoc operations
pub type Result<T> = std::result::Result<T, DatadocError>;

/// A serializable representation of DatadocError for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Associated path (if applicable)
    pub path: Option<PathBuf>,
}

impl From<&DatadocError> for SerializableError {
    fn from(err: &DatadocError) -> Self {
        let kind = match err {
            DatadocError::Io(_) => "Io",
            DatadocError::FileRead { .. } => "FileRead",
            DatadocError::FileWrite { .. } => "FileWrite",
            DatadocError::Format(_) => "Format",
            DatadocError::UnknownFacet(_) => "UnknownFacet",
            DatadocError::Index { .. } => "Index",
            DatadocError::InvalidPatch(_) => "InvalidPatch",
            DatadocError::Json(_) => "Json",
            DatadocError::DatasetMismatch => "DatasetMismatch",
            DatadocError::EmptyConversation => "EmptyConversation",
            DatadocError::RevisionNotFound(_) => "RevisionNotFound",
            DatadocError::Csv(_) => "Csv",
            DatadocError::ConfigParse(_) => "ConfigParse",
            DatadocError::ConfigSerialize(_) => "ConfigSerialize",
            DatadocError::NoConfigDir => "NoConfigDir",
        }
        .to_string();

        let path = match err {
            DatadocError::FileRead { path, .. } => Some(path.clone()),
            DatadocError::FileWrite { path, .. } => Some(path.clone()),
            _ => None,
        };

        Self {
            kind,
            message: err.to_string(),
            path,
        }
    }
}

impl From<DatadocError> for SerializableError {
    fn from(err: DatadocError) -> Self {
        SerializableError::from(&err)
    }
}

impl DatadocError {
    /// Convert to a serializable representation for JSON output
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }
}
