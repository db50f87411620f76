/*!
 * Common test utilities for the locsync test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Once;
use tempfile::TempDir;

use locsync::app_config::Config;
use locsync::localization::{
    ComponentFields, LanguageCode, LanguageRegistry, LocalizationSet, seed,
};
use locsync::providers::mock::MockTranslator;
use locsync::translation::{FanOutOrchestrator, TranslationOptions, TranslationService};

static INIT: Once = Once::new();

/// Route library logs through env_logger once per test binary
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

pub fn code(s: &str) -> LanguageCode {
    LanguageCode::new(s).unwrap()
}

pub fn registry(codes: &[&str]) -> LanguageRegistry {
    LanguageRegistry::new(codes.iter().copied()).unwrap()
}

/// Empty component set with one record per language
pub fn component_set(codes: &[&str]) -> LocalizationSet<ComponentFields> {
    seed(&registry(codes))
}

/// Service over a mock translator with default options
pub fn mock_service(mock: &MockTranslator) -> TranslationService {
    TranslationService::new(Arc::new(mock.clone()), TranslationOptions::default())
}

pub fn mock_orchestrator(mock: &MockTranslator) -> FanOutOrchestrator {
    FanOutOrchestrator::new(mock_service(mock))
}

/// Config with the given languages and the first one as source
pub fn config_with_languages(codes: &[&str]) -> Config {
    Config {
        languages: codes.iter().map(|c| c.to_string()).collect(),
        source_language: codes.first().map(|c| c.to_string()).unwrap_or_default(),
        ..Config::default()
    }
}

/// Sample component payload with Turkish content and an empty English record
pub const COMPONENT_JSON: &str = r#"{
  "kind": "component",
  "localizations": [
    {
      "language": "tr",
      "title": "Merhaba",
      "excerpt": "Kısa özet",
      "description": "<p>Merhaba <b>Dünya</b></p>",
      "subdescription": ""
    },
    {
      "language": "en",
      "title": "",
      "excerpt": "",
      "description": "",
      "subdescription": ""
    }
  ]
}"#;

/// Sample asset payload: title and description only
pub const ASSET_JSON: &str = r#"{
  "kind": "asset",
  "localizations": [
    { "language": "tr", "title": "Logo", "description": "<p>Ana <b>logo</b></p>" },
    { "language": "en", "title": "", "description": "" }
  ]
}"#;
