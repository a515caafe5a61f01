//! Lookup result types and response normalization.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::source::WorkOrderId;

/// Wire key carrying a retrieval URL.
pub const FILE_URL_KEY: &str = "FileUrl";

/// Wire key carrying base64-encoded inline content.
pub const FILE_CONTENT_KEY: &str = "FileContent";

/// One remote or inline file attached to a work order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Position within the work order's file list.
    pub ordinal: usize,
    /// Retrieval URL, if any.
    pub url: Option<String>,
    /// Base64-encoded payload, if any.
    pub content: Option<String>,
}

impl FileDescriptor {
    pub fn from_url(ordinal: usize, url: impl Into<String>) -> Self {
        Self {
            ordinal,
            url: Some(url.into()),
            content: None,
        }
    }

    pub fn from_content(ordinal: usize, content: impl Into<String>) -> Self {
        Self {
            ordinal,
            url: None,
            content: Some(content.into()),
        }
    }

    pub fn empty(ordinal: usize) -> Self {
        Self {
            ordinal,
            url: None,
            content: None,
        }
    }

    /// Build a descriptor from one element of a lookup response.
    ///
    /// Non-object elements and non-string fields yield absent values.
    pub fn from_value(ordinal: usize, value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            ordinal,
            url: field(FILE_URL_KEY),
            content: field(FILE_CONTENT_KEY),
        }
    }

    /// True when neither a URL nor inline content is present.
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.content.is_none()
    }
}

/// Normalize a decoded lookup response into descriptors.
///
/// Accepted shapes: `{"data": [...]}`, `{"files": [...]}` and a bare
/// `[...]`. `data` is used only when it is a non-empty array. Any other shape
/// yields an empty list.
pub fn normalize_files(value: &Value) -> Vec<FileDescriptor> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map
            .get("data")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .or_else(|| map.get("files").and_then(Value::as_array)),
        _ => None,
    };

    items
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(ordinal, item)| FileDescriptor::from_value(ordinal, item))
                .collect()
        })
        .unwrap_or_default()
}

/// Why a lookup produced no usable response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Response is not JSON (content-type: {content_type:?})")]
    NotJson { content_type: String },

    #[error("Invalid JSON: {0}")]
    Decode(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl LookupError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::EmptyBody => "empty_body",
            Self::NotJson { .. } => "not_json",
            Self::Decode(_) => "decode",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
        }
    }
}

/// Classified outcome of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// At least one descriptor was returned.
    Found(Vec<FileDescriptor>),
    /// A structured response was decoded but listed no files.
    NoFiles,
    /// No structured response could be obtained.
    Unavailable(LookupError),
}

impl LookupOutcome {
    /// Classify a normalized descriptor list.
    pub fn from_files(files: Vec<FileDescriptor>) -> Self {
        if files.is_empty() {
            Self::NoFiles
        } else {
            Self::Found(files)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NoFiles => "no_files",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// A work order paired with its lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub work_order: WorkOrderId,
    pub outcome: LookupOutcome,
}

impl LookupResult {
    pub fn new(work_order: WorkOrderId, outcome: LookupOutcome) -> Self {
        Self {
            work_order,
            outcome,
        }
    }

    /// Descriptors found, empty unless the outcome is `Found`.
    pub fn files(&self) -> &[FileDescriptor] {
        match &self.outcome {
            LookupOutcome::Found(files) => files,
            _ => &[],
        }
    }

    pub fn has_files(&self) -> bool {
        !self.files().is_empty()
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.outcome, LookupOutcome::Unavailable(_))
    }
}
