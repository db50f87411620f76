/*!
 * Fan-out translation of a localization set.
 *
 * One batch translates the requested fields of a source record into every
 * other language of the set. All (language, field) tasks run concurrently,
 * each behind its own timeout and the session's cancellation token. A failed
 * task becomes a failure entry and never disturbs its siblings. Results are
 * merged into the set in one step once every task has settled.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{FailureKind, LocalizationError, MergeError, TaskFailure, ValidationError};
use crate::localization::{Field, FieldSet, LanguageCode, LocalizationSet};

use super::core::TranslationService;

/// One (target language, field) unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTask {
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    pub field: Field,
    pub source_text: String,
}

/// Settled result of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Failed { reason: TaskFailure },
}

/// A task together with how it ended
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task: TranslationTask,
    pub outcome: TranslationOutcome,
}

/// Failed (language, field) slot of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureEntry {
    pub language: LanguageCode,
    pub field: Field,
    pub reason: TaskFailure,
}

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// User-facing message produced from a batch outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Summary of a merged batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Number of target languages with at least one translated field
    pub successes: usize,
    /// Those languages, in set order
    pub updated_languages: Vec<LanguageCode>,
    pub failures: Vec<FailureEntry>,
}

impl BatchOutcome {
    /// No target language received anything
    pub fn is_failure(&self) -> bool {
        self.successes == 0
    }

    /// One summary message plus one message per distinct failing slot
    pub fn notifications(&self) -> Vec<Notification> {
        let mut notifications = Vec::with_capacity(self.failures.len() + 1);

        let (level, message) = if self.failures.is_empty() {
            (
                NotificationLevel::Success,
                format!("Translated into {} language(s)", self.successes),
            )
        } else if self.is_failure() {
            (
                NotificationLevel::Error,
                "Translation failed for every language".to_string(),
            )
        } else {
            (
                NotificationLevel::Warning,
                format!(
                    "Translated into {} language(s), {} field(s) failed",
                    self.successes,
                    self.failures.len()
                ),
            )
        };
        notifications.push(Notification { level, message });

        let mut seen = HashSet::new();
        for failure in &self.failures {
            if !seen.insert((failure.language.clone(), failure.field)) {
                continue;
            }

            let advice = if failure.reason.kind.is_outage() {
                "The translation service is unavailable right now, try again later."
            } else {
                "Try again."
            };
            notifications.push(Notification {
                level: NotificationLevel::Error,
                message: format!(
                    "Could not translate {} into {}: {}. {}",
                    failure.field,
                    failure.language.display_name(),
                    failure.reason.message,
                    advice
                ),
            });
        }

        notifications
    }
}

/// Settled results of an executed batch, not yet merged
#[derive(Debug, Clone, Default)]
pub struct TranslationBatch {
    results: Vec<TaskResult>,
}

impl TranslationBatch {
    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Merge every successful result into `set` in one step.
    ///
    /// All results are validated against the set before anything is written,
    /// so an error leaves the set untouched.
    pub fn apply_to<F: FieldSet>(
        &self,
        set: &mut LocalizationSet<F>,
    ) -> Result<BatchOutcome, MergeError> {
        let mut updates = Vec::new();
        let mut failures = Vec::new();
        let mut updated: HashSet<LanguageCode> = HashSet::new();

        for result in &self.results {
            let task = &result.task;
            match &result.outcome {
                TranslationOutcome::Translated(text) => {
                    updates.push((task.target_language.clone(), task.field, text.clone()));
                    updated.insert(task.target_language.clone());
                }
                TranslationOutcome::Failed { reason } => failures.push(FailureEntry {
                    language: task.target_language.clone(),
                    field: task.field,
                    reason: reason.clone(),
                }),
            }
        }

        set.merge(&updates)?;

        let updated_languages: Vec<LanguageCode> = set
            .languages()
            .into_iter()
            .filter(|code| updated.contains(code))
            .collect();

        Ok(BatchOutcome {
            successes: updated_languages.len(),
            updated_languages,
            failures,
        })
    }
}

/// Runs fan-out batches through a translation service
#[derive(Debug, Clone)]
pub struct FanOutOrchestrator {
    service: TranslationService,
}

impl FanOutOrchestrator {
    pub fn new(service: TranslationService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Build the task list for translating `fields` out of `source`.
    ///
    /// Targets are every other language already in the set, in set order.
    /// Fields left empty in the source record are skipped.
    pub fn plan<F: FieldSet>(
        &self,
        set: &LocalizationSet<F>,
        source: &LanguageCode,
        fields: &[Field],
    ) -> Result<Vec<TranslationTask>, ValidationError> {
        let record = set
            .get(source)
            .ok_or_else(|| ValidationError::MissingSourceRecord(source.clone()))?;

        if let Some(field) = fields.iter().find(|f| !F::supports(**f)) {
            return Err(ValidationError::UnsupportedField(*field));
        }

        let mut requested: Vec<Field> = Vec::with_capacity(fields.len());
        for field in fields {
            if !requested.contains(field) {
                requested.push(*field);
            }
        }

        let sources: Vec<(Field, &str)> = requested
            .iter()
            .filter_map(|field| {
                record
                    .get(*field)
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| (*field, text))
            })
            .collect();

        if sources.is_empty() {
            return Err(ValidationError::NothingToTranslate(source.clone()));
        }

        let tasks: Vec<TranslationTask> = set
            .iter()
            .filter(|target| &target.language != source)
            .flat_map(|target| {
                sources.iter().map(move |(field, text)| TranslationTask {
                    source_language: source.clone(),
                    target_language: target.language.clone(),
                    field: *field,
                    source_text: text.to_string(),
                })
            })
            .collect();

        debug!(
            "Planned {} task(s) from '{}' for {} field(s)",
            tasks.len(),
            source,
            sources.len()
        );
        Ok(tasks)
    }

    /// Run every task with no cancellation and no progress reporting
    pub async fn execute(&self, tasks: Vec<TranslationTask>) -> TranslationBatch {
        self.execute_with(tasks, &CancellationToken::new(), |_, _| {}).await
    }

    /// Run every task concurrently, bounded by `max_concurrent_requests`.
    ///
    /// `progress` is called with (completed, total) after each task settles.
    pub async fn execute_with<P>(
        &self,
        tasks: Vec<TranslationTask>,
        cancel: &CancellationToken,
        progress: P,
    ) -> TranslationBatch
    where
        P: Fn(usize, usize) + Send + Sync,
    {
        let total = tasks.len();
        let completed = AtomicUsize::new(0);
        let start_time = Instant::now();
        let concurrency = self.service.options.max_concurrent_requests.max(1);

        let mut results: Vec<(usize, TaskResult)> = stream::iter(tasks.into_iter().enumerate())
            .map(|(index, task)| {
                let completed = &completed;
                let progress = &progress;
                async move {
                    let outcome = self.run_task(&task, cancel).await;
                    if let TranslationOutcome::Failed { reason } = &outcome {
                        warn!(
                            "Translating {} into '{}' failed: {}",
                            task.field, task.target_language, reason
                        );
                    }
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress(done, total);
                    (index, TaskResult { task, outcome })
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        debug!("Batch of {} task(s) settled in {:?}", total, start_time.elapsed());

        TranslationBatch {
            results: results.into_iter().map(|(_, result)| result).collect(),
        }
    }

    async fn run_task(
        &self,
        task: &TranslationTask,
        cancel: &CancellationToken,
    ) -> TranslationOutcome {
        let (text, target, source) = (
            task.source_text.as_str(),
            &task.target_language,
            &task.source_language,
        );
        let work = async {
            if task.field.is_markup() {
                self.service.translate_markup(text, target, source).await
            } else {
                self.service.translate_text(text, target, source).await
            }
        };

        let task_timeout = self.service.options.task_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => TranslationOutcome::Failed {
                reason: TaskFailure::new(FailureKind::Cancelled, "Translation was cancelled"),
            },
            result = tokio::time::timeout(task_timeout, work) => match result {
                Ok(Ok(text)) => TranslationOutcome::Translated(text),
                Ok(Err(e)) => TranslationOutcome::Failed { reason: e.into() },
                Err(_) => TranslationOutcome::Failed {
                    reason: TaskFailure::new(
                        FailureKind::Timeout,
                        format!("Timed out after {:?}", task_timeout),
                    ),
                },
            },
        }
    }

    /// Plan, execute and merge in one call
    pub async fn translate<F: FieldSet>(
        &self,
        set: &mut LocalizationSet<F>,
        source: &LanguageCode,
        fields: &[Field],
    ) -> Result<BatchOutcome, LocalizationError> {
        self.translate_with(set, source, fields, &CancellationToken::new(), |_, _| {})
            .await
    }

    /// Plan, execute and merge with cancellation and progress reporting
    pub async fn translate_with<F, P>(
        &self,
        set: &mut LocalizationSet<F>,
        source: &LanguageCode,
        fields: &[Field],
        cancel: &CancellationToken,
        progress: P,
    ) -> Result<BatchOutcome, LocalizationError>
    where
        F: FieldSet,
        P: Fn(usize, usize) + Send + Sync,
    {
        let tasks = self.plan(set, source, fields)?;
        let batch = self.execute_with(tasks, cancel, progress).await;
        let outcome = batch.apply_to(set)?;

        if outcome.is_failure() && !outcome.failures.is_empty() {
            error!(
                "Translation from '{}' failed for every target ({} failure(s))",
                source,
                outcome.failures.len()
            );
        } else {
            info!(
                "Translation from '{}' updated {} language(s), {} failure(s)",
                source,
                outcome.successes,
                outcome.failures.len()
            );
        }

        Ok(outcome)
    }
}
