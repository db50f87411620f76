use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::Path;

use crate::app_config::Config;
use crate::errors::ValidationError;
use crate::file_utils::FileManager;
use crate::localization::{
    EntityKind, Field, FieldSet, LanguageCode, LanguageRegistry, LocalizationSet, LocalizedEntity,
    ReconcileReport, reconcile_in_place,
};
use crate::session::EditingSession;
use crate::translation::{
    BatchOutcome, FanOutOrchestrator, NotificationLevel, TranslationService,
};

// @module: Application controller for localized entity files

/// Main application controller for translating and reconciling entity payloads
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation service, built from config unless injected
    service: Option<TranslationService>,

    // @field: Whether to draw a progress bar
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            service: None,
            show_progress: true,
        })
    }

    /// Create a controller around an existing translation service
    pub fn with_service(config: Config, service: TranslationService) -> Result<Self> {
        let mut controller = Self::with_config(config)?;
        controller.service = Some(service);
        Ok(controller)
    }

    /// Disable the progress bar, e.g. when output is not a terminal
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn orchestrator(&self) -> Result<FanOutOrchestrator> {
        let service = match &self.service {
            Some(service) => service.clone(),
            None => TranslationService::from_config(&self.config.translation)?,
        };
        Ok(FanOutOrchestrator::new(service))
    }

    fn registry(&self) -> Result<LanguageRegistry> {
        self.config.registry()
    }

    /// Translate an entity file from `source` (or the configured source language)
    /// into every other language, writing the result to `output` or back in place.
    ///
    /// An empty `fields` list means every field the entity's kind carries.
    pub async fn run_translate(
        &self,
        input: &Path,
        output: Option<&Path>,
        source: Option<&str>,
        fields: &[Field],
    ) -> Result<BatchOutcome> {
        let start_time = std::time::Instant::now();
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let source = LanguageCode::new(source.unwrap_or(&self.config.source_language))?;
        let entity = FileManager::load_entity(input)?;
        info!(
            "Translating {} from '{}' ({} language(s))",
            entity.kind(),
            source.display_name(),
            entity.languages().len()
        );

        let fields = if fields.is_empty() {
            entity.kind().fields()
        } else {
            fields
        };

        let orchestrator = self.orchestrator()?;
        let (entity, outcome) = self
            .translate_entity(entity, &orchestrator, &source, fields)
            .await?;

        let output = output.unwrap_or(input);
        FileManager::save_entity(output, &entity)?;

        self.report(&outcome);
        info!("Wrote {:?} in {:.1}s", output, start_time.elapsed().as_secs_f64());
        Ok(outcome)
    }

    /// Translate the localization set of an already loaded entity
    pub async fn translate_entity(
        &self,
        entity: LocalizedEntity,
        orchestrator: &FanOutOrchestrator,
        source: &LanguageCode,
        fields: &[Field],
    ) -> Result<(LocalizedEntity, BatchOutcome)> {
        let registry = self.registry()?;
        let result = match entity {
            LocalizedEntity::Component(set) => {
                let (set, outcome) = self
                    .translate_set(
                        EntityKind::Component,
                        set,
                        registry,
                        orchestrator,
                        source,
                        fields,
                    )
                    .await?;
                (LocalizedEntity::Component(set), outcome)
            }
            LocalizedEntity::Asset(set) => {
                let (set, outcome) = self
                    .translate_set(
                        EntityKind::Asset,
                        set,
                        registry,
                        orchestrator,
                        source,
                        fields,
                    )
                    .await?;
                (LocalizedEntity::Asset(set), outcome)
            }
            LocalizedEntity::TeamMember(set) => {
                let (set, outcome) = self
                    .translate_set(
                        EntityKind::TeamMember,
                        set,
                        registry,
                        orchestrator,
                        source,
                        fields,
                    )
                    .await?;
                (LocalizedEntity::TeamMember(set), outcome)
            }
            LocalizedEntity::Settings(set) => {
                let (set, outcome) = self
                    .translate_set(
                        EntityKind::Settings,
                        set,
                        registry,
                        orchestrator,
                        source,
                        fields,
                    )
                    .await?;
                (LocalizedEntity::Settings(set), outcome)
            }
        };
        Ok(result)
    }

    async fn translate_set<F: FieldSet>(
        &self,
        kind: EntityKind,
        set: LocalizationSet<F>,
        registry: LanguageRegistry,
        orchestrator: &FanOutOrchestrator,
        source: &LanguageCode,
        fields: &[Field],
    ) -> Result<(LocalizationSet<F>, BatchOutcome)> {
        if !set.contains(source) {
            return Err(ValidationError::MissingSourceRecord(source.clone()).into());
        }

        let mut session = EditingSession::edit(kind, set, registry);
        session.select_language(source);

        let progress_bar = self.progress_bar();
        let outcome = session
            .translate_with_progress(orchestrator, fields, |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let outcome = outcome?;
        Ok((session.into_set(), outcome))
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fields ({percent}%) {msg}",
            )
            .or_else(|_| {
                ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("##-"));
        progress_bar.set_message("Translating");
        progress_bar
    }

    /// Log the user-facing notifications of a batch
    fn report(&self, outcome: &BatchOutcome) {
        for notification in outcome.notifications() {
            match notification.level {
                NotificationLevel::Success => info!("{}", notification.message),
                NotificationLevel::Warning => warn!("{}", notification.message),
                NotificationLevel::Error => error!("{}", notification.message),
            }
        }
    }

    /// Append empty records for configured languages missing from an entity file
    pub fn run_reconcile(&self, input: &Path, output: Option<&Path>) -> Result<ReconcileReport> {
        let registry = self.registry()?;
        let mut entity = FileManager::load_entity(input)?;

        let report = match &mut entity {
            LocalizedEntity::Component(set) => reconcile_in_place(set, &registry),
            LocalizedEntity::Asset(set) => reconcile_in_place(set, &registry),
            LocalizedEntity::TeamMember(set) => reconcile_in_place(set, &registry),
            LocalizedEntity::Settings(set) => reconcile_in_place(set, &registry),
        };

        if !report.retained_orphans.is_empty() {
            warn!(
                "Kept records for languages no longer configured: {}",
                report
                    .retained_orphans
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let output = output.unwrap_or(input);
        if report.changed() || output != input {
            FileManager::save_entity(output, &entity)?;
            info!("Appended {} record(s), wrote {:?}", report.appended.len(), output);
        } else {
            debug!("{:?} already has a record for every configured language", input);
        }

        Ok(report)
    }
}
