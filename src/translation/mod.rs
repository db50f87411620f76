/*!
 * Translation of localized content through a remote translator.
 *
 * This module contains the machinery that fills the other languages of a
 * localization set from one source language. It is split into several
 * submodules:
 *
 * - `core`: Single-string translation service (plain text and markup)
 * - `batch`: Concurrent fan-out over every (language, field) pair
 * - `cache`: Caching mechanisms for translations
 * - `formatting`: Markup tag protection and restoration
 */

// Re-export main types for easier usage
pub use self::batch::{
    BatchOutcome, FailureEntry, FanOutOrchestrator, Notification, NotificationLevel, TaskResult,
    TranslationBatch, TranslationOutcome, TranslationTask,
};
pub use self::core::{TranslationOptions, TranslationService};
pub use self::formatting::{MarkupPreserver, ProtectedMarkup};

// Submodules
pub mod batch;
pub mod cache;
pub mod core;
pub mod formatting;
