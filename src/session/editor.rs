/*!
 * Editing session for one localized entity.
 *
 * A session owns the entity's localization set from the moment the editor
 * opens until it is saved or discarded. Closing or dropping the session
 * cancels any translation batch still in flight.
 */

use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::errors::{LocalizationError, ValidationError};
use crate::localization::{
    EntityKind, Field, FieldSet, LanguageCode, LanguageRegistry, LocalizationSet, MirrorPolicy,
    ReconcileReport, RegistrySource, ensure_record, mirror_field, reconcile_in_place, seed,
};
use crate::translation::{BatchOutcome, FanOutOrchestrator};

/// Resets the busy flag when a batch ends, however it ends
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag.clone())
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One open editor for one entity's localized content
#[derive(Debug)]
pub struct EditingSession<F: FieldSet> {
    id: Uuid,
    kind: EntityKind,
    set: LocalizationSet<F>,
    registry: LanguageRegistry,
    policy: MirrorPolicy,
    active: Option<LanguageCode>,
    cancel: CancellationToken,
    translating: Arc<AtomicBool>,
}

impl<F: FieldSet> EditingSession<F> {
    /// Open a session for a new entity, seeded with one empty record per language
    pub fn create(kind: EntityKind, registry: LanguageRegistry) -> Self {
        let set = seed(&registry);
        Self::open(kind, set, registry)
    }

    /// Open a session for a fetched entity, appending records for new languages
    pub fn edit(kind: EntityKind, mut set: LocalizationSet<F>, registry: LanguageRegistry) -> Self {
        reconcile_in_place(&mut set, &registry);
        Self::open(kind, set, registry)
    }

    fn open(kind: EntityKind, set: LocalizationSet<F>, registry: LanguageRegistry) -> Self {
        let active = registry
            .primary()
            .filter(|code| set.contains(code))
            .or_else(|| set.records().first().map(|r| &r.language))
            .cloned();

        let session = Self {
            id: Uuid::new_v4(),
            kind,
            set,
            registry,
            policy: MirrorPolicy::for_kind(kind),
            active,
            cancel: CancellationToken::new(),
            translating: Arc::new(AtomicBool::new(false)),
        };

        info!(
            "[{}] Opened {} session with {} language(s)",
            session.short_id(),
            kind,
            session.set.len()
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn policy(&self) -> MirrorPolicy {
        self.policy
    }

    pub fn set(&self) -> &LocalizationSet<F> {
        &self.set
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn active_language(&self) -> Option<&LanguageCode> {
        self.active.as_ref()
    }

    /// Switch the active language, creating its record if it has none.
    ///
    /// Returns whether a record was appended.
    pub fn select_language(&mut self, code: &LanguageCode) -> bool {
        let appended = ensure_record(&mut self.set, code);
        if appended {
            debug!("[{}] Appended record for '{}'", self.short_id(), code);
        }
        self.active = Some(code.clone());
        appended
    }

    /// Edit a field of the active language.
    ///
    /// Under the mirror policy, title and description edits are copied into
    /// every other language. Returns the number of other records overwritten.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<usize, ValidationError> {
        let active = self.active.clone().ok_or(ValidationError::NoActiveLanguage)?;
        if self.policy.mirrors(field) {
            mirror_field(&mut self.set, &active, field, value)
        } else {
            self.set.set_field(&active, field, value)?;
            Ok(0)
        }
    }

    /// Align the set with a newer registry snapshot
    pub fn refresh_registry(&mut self, registry: LanguageRegistry) -> ReconcileReport {
        let report = reconcile_in_place(&mut self.set, &registry);
        self.registry = registry;
        report
    }

    /// Fetch a fresh registry snapshot and align the set with it
    pub async fn refresh_from(
        &mut self,
        source: &dyn RegistrySource,
    ) -> anyhow::Result<ReconcileReport> {
        let registry = source.snapshot().await?;
        Ok(self.refresh_registry(registry))
    }

    /// Whether a translation batch is currently running
    pub fn is_translating(&self) -> bool {
        self.translating.load(Ordering::SeqCst)
    }

    /// Shared view of the busy flag, for observers outside the session
    pub fn translating_flag(&self) -> Arc<AtomicBool> {
        self.translating.clone()
    }

    /// Token that cancels this session's translations when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Translate `fields` from the active language into every other language
    pub async fn translate(
        &mut self,
        orchestrator: &FanOutOrchestrator,
        fields: &[Field],
    ) -> Result<BatchOutcome, LocalizationError> {
        self.translate_with_progress(orchestrator, fields, |_, _| {}).await
    }

    /// Same as `translate`, reporting (completed, total) after each task
    pub async fn translate_with_progress<P>(
        &mut self,
        orchestrator: &FanOutOrchestrator,
        fields: &[Field],
        progress: P,
    ) -> Result<BatchOutcome, LocalizationError>
    where
        P: Fn(usize, usize) + Send + Sync,
    {
        let source = self.active.clone().ok_or(ValidationError::NoActiveLanguage)?;
        let _busy = BusyGuard::acquire(&self.translating);

        debug!("[{}] Translating {:?} from '{}'", self.short_id(), fields, source);
        orchestrator
            .translate_with(&mut self.set, &source, fields, &self.cancel, progress)
            .await
    }

    /// Cancel in-flight translations; the set stays readable
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!("[{}] Closing session", self.short_id());
            self.cancel.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Hand the set over for saving, ending the session
    pub fn into_set(mut self) -> LocalizationSet<F> {
        std::mem::take(&mut self.set)
    }
}

impl<F: FieldSet> Drop for EditingSession<F> {
    fn drop(&mut self) {
        self.close();
    }
}
