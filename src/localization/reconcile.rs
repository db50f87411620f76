/*!
 * Alignment of a localization set with the language registry.
 *
 * Reconciliation is append-only: registry languages without a record get an
 * empty one, and records whose language left the registry are kept so that
 * unsaved edits are never dropped mid-session.
 */

use log::debug;

use super::model::{FieldSet, LanguageCode, LocalizationRecord, LocalizationSet};
use super::registry::LanguageRegistry;

/// What a reconcile pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Languages that received a new empty record, in append order
    pub appended: Vec<LanguageCode>,
    /// Records kept although their language is no longer in the registry
    pub retained_orphans: Vec<LanguageCode>,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        !self.appended.is_empty()
    }
}

/// Return a copy of `set` with one record for every registry language
pub fn reconcile<F: FieldSet>(
    set: &LocalizationSet<F>,
    registry: &LanguageRegistry,
) -> LocalizationSet<F> {
    let mut reconciled = set.clone();
    reconcile_in_place(&mut reconciled, registry);
    reconciled
}

/// Append missing registry languages to `set` and report what changed
pub fn reconcile_in_place<F: FieldSet>(
    set: &mut LocalizationSet<F>,
    registry: &LanguageRegistry,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for code in registry.codes() {
        if ensure_record(set, code) {
            report.appended.push(code.clone());
        }
    }

    report.retained_orphans = set
        .iter()
        .map(|r| &r.language)
        .filter(|code| !registry.contains(code))
        .cloned()
        .collect();

    if report.changed() || !report.retained_orphans.is_empty() {
        debug!(
            "Reconciled localization set: appended {:?}, retained {:?}",
            report.appended, report.retained_orphans
        );
    }

    report
}

/// Fresh set for a create flow: one empty record per registry language
pub fn seed<F: FieldSet>(registry: &LanguageRegistry) -> LocalizationSet<F> {
    reconcile(&LocalizationSet::new(), registry)
}

/// Append an empty record for `code` if it has none; returns whether one was added
pub fn ensure_record<F: FieldSet>(set: &mut LocalizationSet<F>, code: &LanguageCode) -> bool {
    if set.contains(code) {
        return false;
    }
    set.push(LocalizationRecord::empty(code.clone())).is_ok()
}
