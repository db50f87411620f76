/*!
 * Snapshot of the active language list.
 *
 * The host application owns the list of supported languages. The engine only
 * ever sees an immutable `LanguageRegistry` snapshot, so a change to the list
 * in the middle of an editing session cannot alter a reconcile or a batch that
 * is already running.
 */

use async_trait::async_trait;
use log::warn;
use std::sync::Arc;

use crate::errors::ValidationError;

use super::model::LanguageCode;

/// Ordered, duplicate-free list of active language codes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageRegistry {
    codes: Arc<[LanguageCode]>,
}

impl LanguageRegistry {
    /// Build a snapshot from raw codes; later duplicates are skipped
    pub fn new<I, S>(codes: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<LanguageCode> = Vec::new();
        for raw in codes {
            let code = LanguageCode::new(raw.as_ref())?;
            if unique.contains(&code) {
                warn!("Language '{}' listed twice in registry, ignoring repeat", code);
                continue;
            }
            unique.push(code);
        }

        Ok(Self {
            codes: unique.into(),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> &[LanguageCode] {
        &self.codes
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// First registry language, used as the default active tab
    pub fn primary(&self) -> Option<&LanguageCode> {
        self.codes.first()
    }
}

/// Collaborator that supplies the current language list
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetch a fresh snapshot of the active languages
    async fn snapshot(&self) -> anyhow::Result<LanguageRegistry>;
}

/// Registry source backed by a fixed list, typically loaded from config
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    registry: LanguageRegistry,
}

impl StaticRegistry {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RegistrySource for StaticRegistry {
    async fn snapshot(&self) -> anyhow::Result<LanguageRegistry> {
        Ok(self.registry.clone())
    }
}
