/*!
 * Data model for per-language entity content.
 *
 * A `LocalizationSet` is the ordered collection of `LocalizationRecord`s of a
 * single entity instance. It is generic over the entity kind's `FieldSet`, so
 * a team member can never carry an `excerpt` and a component always can.
 */

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{MergeError, ValidationError};
use crate::language_utils;

/// Short identifier of a supported language, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and normalize a language code
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized = code.as_ref().trim().to_lowercase();
        let well_formed = !normalized.is_empty()
            && normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !well_formed {
            return Err(ValidationError::InvalidLanguageCode(code.as_ref().to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// English name of the language, or the raw code when it is not an ISO code
    pub fn display_name(&self) -> String {
        language_utils::get_language_name(self.primary_subtag())
            .unwrap_or_else(|_| self.0.clone())
    }

    /// Language part of a tag such as `pt-br`
    pub fn primary_subtag(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(&self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Translatable field of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Excerpt,
    Description,
    Subdescription,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Excerpt,
        Field::Description,
        Field::Subdescription,
    ];

    /// Markup-bearing fields hold rich-text HTML from the editor
    pub fn is_markup(&self) -> bool {
        matches!(self, Field::Description | Field::Subdescription)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Excerpt => "excerpt",
            Field::Description => "description",
            Field::Subdescription => "subdescription",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Field::Title),
            "excerpt" => Ok(Field::Excerpt),
            "description" => Ok(Field::Description),
            "subdescription" => Ok(Field::Subdescription),
            _ => Err(anyhow::anyhow!("Invalid field name: {}", s)),
        }
    }
}

/// Fixed set of translatable fields carried by one entity kind
pub trait FieldSet:
    Default + Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Fields this entity kind carries, in display order
    const FIELDS: &'static [Field];

    /// Current value of a field, `None` when the kind does not carry it
    fn get(&self, field: Field) -> Option<&str>;

    /// Overwrite a field; returns false when the kind does not carry it
    fn set(&mut self, field: Field, value: String) -> bool;

    fn supports(field: Field) -> bool {
        Self::FIELDS.contains(&field)
    }
}

macro_rules! field_set {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl FieldSet for $name {
            const FIELDS: &'static [Field] = &[$(Field::$variant),+];

            fn get(&self, field: Field) -> Option<&str> {
                match field {
                    $(Field::$variant => Some(&self.$field),)+
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn set(&mut self, field: Field, value: String) -> bool {
                match field {
                    $(Field::$variant => {
                        self.$field = value;
                        true
                    })+
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

field_set!(
    /// Content component: the full field set
    ComponentFields {
        title => Title,
        excerpt => Excerpt,
        description => Description,
        subdescription => Subdescription,
    }
);

field_set!(
    /// Media asset caption and description
    AssetFields {
        title => Title,
        description => Description,
    }
);

field_set!(
    /// Team member name/role line and biography
    TeamMemberFields {
        title => Title,
        description => Description,
    }
);

field_set!(
    /// Site settings texts
    SettingsFields {
        title => Title,
        excerpt => Excerpt,
        description => Description,
    }
);

/// One language's copy of an entity's translatable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationRecord<F> {
    pub language: LanguageCode,
    #[serde(flatten)]
    pub fields: F,
}

impl<F: FieldSet> LocalizationRecord<F> {
    /// A record with every field empty
    pub fn empty(language: LanguageCode) -> Self {
        Self {
            language,
            fields: F::default(),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(field)
    }

    /// Whether every supported field is blank
    pub fn is_blank(&self) -> bool {
        F::FIELDS
            .iter()
            .all(|f| self.fields.get(*f).is_none_or(|v| v.trim().is_empty()))
    }
}

/// Ordered per-language records of one entity instance.
///
/// At most one record exists per language. Insertion order is preserved and
/// drives tab order in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationSet<F> {
    records: Vec<LocalizationRecord<F>>,
}

impl<F> Default for LocalizationSet<F> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<F: FieldSet> LocalizationSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from fetched records, keeping the first record of any duplicated language
    pub fn from_records(records: Vec<LocalizationRecord<F>>) -> Self {
        let mut set = Self::new();
        for record in records {
            let language = record.language.clone();
            if set.push(record).is_err() {
                warn!("Dropping duplicate localization record for '{}'", language);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LocalizationRecord<F>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalizationRecord<F>> {
        self.records.iter()
    }

    /// Languages in insertion order
    pub fn languages(&self) -> Vec<LanguageCode> {
        self.records.iter().map(|r| r.language.clone()).collect()
    }

    pub fn contains(&self, language: &LanguageCode) -> bool {
        self.records.iter().any(|r| &r.language == language)
    }

    pub fn get(&self, language: &LanguageCode) -> Option<&LocalizationRecord<F>> {
        self.records.iter().find(|r| &r.language == language)
    }

    pub fn get_mut(&mut self, language: &LanguageCode) -> Option<&mut LocalizationRecord<F>> {
        self.records.iter_mut().find(|r| &r.language == language)
    }

    /// Value of one field of one language
    pub fn field(&self, language: &LanguageCode, field: Field) -> Option<&str> {
        self.get(language).and_then(|r| r.get(field))
    }

    /// Append a record; rejected when its language already has one
    pub fn push(&mut self, record: LocalizationRecord<F>) -> Result<(), ValidationError> {
        if self.contains(&record.language) {
            return Err(ValidationError::DuplicateLanguage(record.language));
        }
        self.records.push(record);
        Ok(())
    }

    /// Append an empty record for a language
    pub fn push_empty(&mut self, language: LanguageCode) -> Result<(), ValidationError> {
        self.push(LocalizationRecord::empty(language))
    }

    /// Edit one field of one language's record
    pub fn set_field(
        &mut self,
        language: &LanguageCode,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        if !F::supports(field) {
            return Err(ValidationError::UnsupportedField(field));
        }
        let record = self
            .get_mut(language)
            .ok_or_else(|| ValidationError::UnknownLanguage(language.clone()))?;
        record.fields.set(field, value.into());
        Ok(())
    }

    /// Apply a batch of (language, field, value) writes as one update.
    ///
    /// Every write is checked before any is applied, so a bad entry leaves
    /// the set untouched.
    pub fn merge(&mut self, updates: &[(LanguageCode, Field, String)]) -> Result<(), MergeError> {
        for (language, field, _) in updates {
            if !self.contains(language) {
                return Err(MergeError::UnknownLanguage(language.clone()));
            }
            if !F::supports(*field) {
                return Err(MergeError::UnsupportedField(*field));
            }
        }

        for (language, field, value) in updates {
            if let Some(record) = self.get_mut(language) {
                record.fields.set(*field, value.clone());
            }
        }

        Ok(())
    }
}

impl<F: Serialize> Serialize for LocalizationSet<F> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.records.serialize(serializer)
    }
}

impl<'de, F: FieldSet> Deserialize<'de> for LocalizationSet<F> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<LocalizationRecord<F>>::deserialize(deserializer)?;
        Ok(Self::from_records(records))
    }
}

/// Kinds of entity that carry localized content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Component,
    Asset,
    TeamMember,
    Settings,
}

impl EntityKind {
    /// Kinds edited one working language at a time echo edits into all languages
    pub fn mirrors_edits(&self) -> bool {
        matches!(self, EntityKind::TeamMember)
    }

    pub fn fields(&self) -> &'static [Field] {
        match self {
            EntityKind::Component => ComponentFields::FIELDS,
            EntityKind::Asset => AssetFields::FIELDS,
            EntityKind::TeamMember => TeamMemberFields::FIELDS,
            EntityKind::Settings => SettingsFields::FIELDS,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Component => "component",
            EntityKind::Asset => "asset",
            EntityKind::TeamMember => "team_member",
            EntityKind::Settings => "settings",
        };
        f.write_str(name)
    }
}

/// Localized content of one entity instance, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "localizations", rename_all = "snake_case")]
pub enum LocalizedEntity {
    Component(LocalizationSet<ComponentFields>),
    Asset(LocalizationSet<AssetFields>),
    TeamMember(LocalizationSet<TeamMemberFields>),
    Settings(LocalizationSet<SettingsFields>),
}

impl LocalizedEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            LocalizedEntity::Component(_) => EntityKind::Component,
            LocalizedEntity::Asset(_) => EntityKind::Asset,
            LocalizedEntity::TeamMember(_) => EntityKind::TeamMember,
            LocalizedEntity::Settings(_) => EntityKind::Settings,
        }
    }

    pub fn languages(&self) -> Vec<LanguageCode> {
        match self {
            LocalizedEntity::Component(set) => set.languages(),
            LocalizedEntity::Asset(set) => set.languages(),
            LocalizedEntity::TeamMember(set) => set.languages(),
            LocalizedEntity::Settings(set) => set.languages(),
        }
    }
}
