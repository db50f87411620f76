/*!
 * Editing sessions for localized entities.
 *
 * This module provides:
 * - Binding of one localization set to one editor lifetime
 * - Lazy record creation when a new language tab is opened
 * - Fan-out translation scoped to the session's cancellation token
 */

pub mod editor;

// Re-export main types
pub use editor::EditingSession;
