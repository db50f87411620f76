/*!
 * Markup preservation for translated text.
 *
 * Before rich-text content is sent to a translator, every tag is swapped for
 * an opaque `__TAG_n__` token so only the text runs can be touched. After the
 * call the tokens are swapped back, so the tag sequence of the output always
 * equals the tag sequence of the input.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::TranslationError;

/// Tag-like substrings, plus pre-existing placeholder lookalikes so they
/// cannot collide with the tokens this module generates
static PROTECTED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>]*>|__TAG_\d+__").expect("Invalid markup regex")
});

/// Placeholder tokens in translator output
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__TAG_(\d+)__").expect("Invalid placeholder regex")
});

/// Build the placeholder token for tag number `index`
pub fn placeholder(index: usize) -> String {
    format!("__TAG_{}__", index)
}

/// Markup with its tags swapped out for placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedMarkup {
    /// Text with placeholders, ready for translation
    pub text: String,
    /// Original tags, by placeholder index
    tags: Vec<String>,
}

impl ProtectedMarkup {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Whether only tags and whitespace remain once placeholders are ignored
    pub fn is_text_blank(&self) -> bool {
        PLACEHOLDER_REGEX.replace_all(&self.text, "").trim().is_empty()
    }

    /// Put the original tags back into translated text.
    ///
    /// Fails when the translation does not contain exactly as many placeholders
    /// as were substituted, or when any placeholder is missing or duplicated.
    /// Tags are restored in recorded order, one per placeholder occurrence.
    pub fn restore(&self, translated: &str) -> Result<String, TranslationError> {
        let mut seen = vec![0usize; self.tags.len()];
        let mut found = 0;
        let mut in_order = true;
        let mut last_index = None;

        for cap in PLACEHOLDER_REGEX.captures_iter(translated) {
            found += 1;
            let index = cap.get(1).and_then(|m| m.as_str().parse::<usize>().ok());
            match index {
                Some(i) if i < seen.len() => {
                    seen[i] += 1;
                    if last_index.is_some_and(|last| i < last) {
                        in_order = false;
                    }
                    last_index = Some(i);
                }
                _ => in_order = false,
            }
        }

        if found != self.tags.len() || seen.iter().any(|count| *count != 1) {
            return Err(TranslationError::PlaceholderMismatch {
                expected: self.tags.len(),
                found,
            });
        }

        if !in_order {
            debug!("Translator reordered markup placeholders; restoring tags in source order");
        }

        let mut next = 0;
        let restored = PLACEHOLDER_REGEX.replace_all(translated, |_: &Captures| {
            let tag = self.tags[next].clone();
            next += 1;
            tag
        });

        Ok(restored.into_owned())
    }
}

/// Markup preserver for keeping tag structure intact during translation
pub struct MarkupPreserver;

impl MarkupPreserver {
    /// Replace every tag, left to right, with a numbered placeholder
    pub fn protect(markup: &str) -> ProtectedMarkup {
        let mut tags = Vec::new();
        let text = PROTECTED_REGEX.replace_all(markup, |cap: &Captures| {
            let index = tags.len();
            tags.push(cap[0].to_string());
            placeholder(index)
        });

        ProtectedMarkup {
            text: text.into_owned(),
            tags,
        }
    }

    /// Extract the tag sequence of a markup string
    pub fn tag_sequence(markup: &str) -> Vec<&str> {
        PROTECTED_REGEX
            .find_iter(markup)
            .map(|m| m.as_str())
            .filter(|s| s.starts_with('<'))
            .collect()
    }
}
