//! Core error types.
//!
//! Every failure in the core is locally recoverable: callers report the
//! error and leave state untouched. Out-of-range engine operations are not
//! errors at all; the engines answer them with an `Ignored` outcome.

use thiserror::Error;

/// Errors raised by the data model, list builder, and import codecs.
#[derive(Debug, Error)]
pub enum QuestError {
    /// The selected list (or all visible lists) produced zero words.
    #[error("no words in quest '{list}'")]
    NoWords { list: String },

    /// No student with this name exists.
    #[error("unknown student: {0}")]
    UnknownStudent(String),

    /// The student has no list with this name.
    #[error("unknown list: {0}")]
    UnknownList(String),

    /// A student with this name already exists.
    #[error("student already exists: {0}")]
    DuplicateStudent(String),

    /// A name was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// An import document failed validation.
    #[error("invalid import: {0}")]
    InvalidImport(String),

    /// A document could not be parsed or serialized.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuestError {
    /// Returns `true` if this error means a session cannot start because
    /// there is nothing to practice.
    pub fn is_no_words(&self) -> bool {
        matches!(self, QuestError::NoWords { .. })
    }
}

pub type Result<T> = std::result::Result<T, QuestError>;
