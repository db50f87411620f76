/*!
 * Copy-forward of edits across languages.
 *
 * Entity kinds edited one working language at a time let untranslated
 * languages echo the source: an edit to a mirrored field is written verbatim
 * into every other record, synchronously and without any network call. Real
 * translation later overwrites the echoes per language.
 */

use log::trace;

use crate::errors::ValidationError;

use super::model::{EntityKind, Field, FieldSet, LanguageCode, LocalizationSet};

/// Fields whose edits are copied into every language
pub const MIRRORED_FIELDS: &[Field] = &[Field::Title, Field::Description];

/// How edits to the active language propagate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorPolicy {
    /// Mirrored fields are copied into every other language
    Mirror,
    /// Each language is edited independently
    Isolated,
}

impl MirrorPolicy {
    pub fn for_kind(kind: EntityKind) -> Self {
        if kind.mirrors_edits() {
            Self::Mirror
        } else {
            Self::Isolated
        }
    }

    pub fn mirrors(&self, field: Field) -> bool {
        *self == Self::Mirror && MIRRORED_FIELDS.contains(&field)
    }
}

/// Write `value` to `field` of the active language and every other language.
///
/// Returns the number of other records that were overwritten. Fields outside
/// `MIRRORED_FIELDS` are written to the active record only.
pub fn mirror_field<F: FieldSet>(
    set: &mut LocalizationSet<F>,
    active: &LanguageCode,
    field: Field,
    value: &str,
) -> Result<usize, ValidationError> {
    set.set_field(active, field, value)?;

    if !MIRRORED_FIELDS.contains(&field) {
        return Ok(0);
    }

    let others: Vec<LanguageCode> = set
        .languages()
        .into_iter()
        .filter(|code| code != active)
        .collect();

    for code in &others {
        set.set_field(code, field, value)?;
    }

    trace!("Mirrored {} from '{}' into {} languages", field, active, others.len());
    Ok(others.len())
}
