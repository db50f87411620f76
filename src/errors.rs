/*!
 * Error types for the locsync library.
 *
 * This module contains custom error types for the different layers of the
 * localization engine, using the thiserror crate for ergonomic error
 * definitions. Per-task failures of a fan-out batch are not errors in this
 * sense: they are recovered into `TaskFailure` values at the task boundary.
 */

use thiserror::Error;

use crate::localization::{Field, LanguageCode};

/// Errors that can occur when talking to a remote translator
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify this error for retry decisions and user-facing phrasing
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) => FailureKind::Transport,
            Self::RateLimitExceeded(_) => FailureKind::RemoteTransient,
            Self::ApiError { status_code, .. } if *status_code == 429 || *status_code >= 500 => {
                FailureKind::RemoteTransient
            }
            Self::ApiError { .. } | Self::AuthenticationError(_) | Self::ParseError(_) => {
                FailureKind::RemotePermanent
            }
        }
    }

    /// Whether a provider client may retry the request that produced this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.failure_kind(),
            FailureKind::Transport | FailureKind::RemoteTransient
        )
    }
}

/// Class of a single failed translation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network-level failure reaching the translator
    Transport,
    /// The remote service is temporarily unavailable (5xx, 429)
    RemoteTransient,
    /// The remote service rejected the request
    RemotePermanent,
    /// The task exceeded its time budget
    Timeout,
    /// The owning editing session was closed while the task ran
    Cancelled,
    /// The translated markup lost or duplicated placeholder tokens
    MarkupCorrupted,
}

impl FailureKind {
    /// Outage-class failures are worth retrying later rather than right away
    pub fn is_outage(&self) -> bool {
        matches!(self, Self::RemoteTransient | Self::Timeout)
    }
}

/// Reason attached to a failed (language, field) slot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TaskFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Errors that can occur while translating a single string
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The translator did not hand back every placeholder exactly once
    #[error("Markup placeholders changed during translation: expected {expected}, found {found}")]
    PlaceholderMismatch {
        /// Number of tags substituted before the call
        expected: usize,
        /// Number of intact placeholders in the response
        found: usize,
    },
}

impl From<TranslationError> for TaskFailure {
    fn from(error: TranslationError) -> Self {
        let kind = match &error {
            TranslationError::Provider(e) => e.failure_kind(),
            TranslationError::PlaceholderMismatch { .. } => FailureKind::MarkupCorrupted,
        };
        TaskFailure::new(kind, error.to_string())
    }
}

/// Request-level validation failures, raised before any task is scheduled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No localization record exists for source language '{0}'")]
    MissingSourceRecord(LanguageCode),

    #[error("Nothing to translate: requested fields are empty for '{0}'")]
    NothingToTranslate(LanguageCode),

    #[error("Field '{0}' is not supported by this entity kind")]
    UnsupportedField(Field),

    #[error("Language '{0}' already has a localization record")]
    DuplicateLanguage(LanguageCode),

    #[error("Language '{0}' has no localization record")]
    UnknownLanguage(LanguageCode),

    #[error("Invalid language code: '{0}'")]
    InvalidLanguageCode(String),

    #[error("No language is selected")]
    NoActiveLanguage,
}

/// Failures while merging batch results back into a set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Translated language '{0}' has no record in the set")]
    UnknownLanguage(LanguageCode),

    #[error("Translated field '{0}' is not supported by this entity kind")]
    UnsupportedField(Field),
}

/// Errors surfaced by localization operations on a set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizationError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a localization operation
    #[error("Localization error: {0}")]
    Localization(#[from] LocalizationError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
