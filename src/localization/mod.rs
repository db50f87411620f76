/*!
 * Per-language content of localized entities.
 *
 * - `model`: language codes, field sets, records and sets
 * - `registry`: immutable snapshot of the active languages
 * - `reconcile`: append-only alignment of a set with the registry
 * - `mirror`: synchronous copy-forward of edits across languages
 */

pub mod mirror;
pub mod model;
pub mod reconcile;
pub mod registry;

pub use self::mirror::{MIRRORED_FIELDS, MirrorPolicy, mirror_field};
pub use self::model::{
    AssetFields, ComponentFields, EntityKind, Field, FieldSet, LanguageCode, LocalizationRecord,
    LocalizationSet, LocalizedEntity, SettingsFields, TeamMemberFields,
};
pub use self::reconcile::{ReconcileReport, ensure_record, reconcile, reconcile_in_place, seed};
pub use self::registry::{LanguageRegistry, RegistrySource, StaticRegistry};
