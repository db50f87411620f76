/*!
 * Tests for configuration loading and validation
 */

use std::time::Duration;

use locsync::app_config::{Config, LogLevel, TranslationProvider};
use locsync::translation::{TranslationOptions, TranslationService};

use crate::common::{config_with_languages, create_temp_dir, create_test_file};

#[test]
fn test_config_withThreeLanguages_shouldBuildRegistryInOrder() {
    let config = config_with_languages(&["tr", "en", "de"]);
    assert!(config.validate().is_ok());

    let registry = config.registry().unwrap();
    let codes: Vec<&str> = registry.codes().iter().map(|c| c.as_str()).collect();
    assert_eq!(codes, vec!["tr", "en", "de"]);
}

#[test]
fn test_validate_withUnknownIsoCode_shouldFail() {
    let config = config_with_languages(&["en", "zz"]);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroTaskTimeout_shouldFail() {
    let mut config = config_with_languages(&["en", "de"]);
    config.translation.common.task_timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = config_with_languages(&["en", "de"]);
    for provider in config.translation.available_providers.iter_mut() {
        provider.concurrent_requests = 0;
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withAnthropicKey_shouldPass() {
    let mut config = config_with_languages(&["en", "de"]);
    config.translation.provider = TranslationProvider::Anthropic;
    for provider in config.translation.available_providers.iter_mut() {
        if provider.provider_type == "anthropic" {
            provider.api_key = "sk-test".to_string();
        }
    }
    assert!(config.validate().is_ok());
    assert_eq!(config.translation.get_api_key(), "sk-test");
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "languages": ["tr", "en"],
            "source_language": "tr",
            "log_level": "debug",
            "translation": {
                "provider": "ollama",
                "available_providers": [
                    { "type": "ollama", "model": "qwen2.5:7b", "endpoint": "http://gpu-box:11434", "concurrent_requests": 4 }
                ],
                "common": { "task_timeout_secs": 12, "cache_enabled": false }
            }
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.get_model(), "qwen2.5:7b");
    assert_eq!(config.translation.get_endpoint(), "http://gpu-box:11434");
    assert_eq!(config.translation.optimal_concurrent_requests(), 4);

    let options = TranslationOptions::from_config(&config.translation);
    assert_eq!(options.task_timeout, Duration::from_secs(12));
    assert!(!options.cache_enabled);
}

#[test]
fn test_fromConfig_withAnthropic_shouldBuildAnthropicTranslator() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    let service = TranslationService::from_config(&config.translation).unwrap();
    assert_eq!(service.provider_name(), "anthropic");
}

#[test]
fn test_provider_fromStr_shouldBeCaseInsensitive() {
    assert_eq!("Anthropic".parse::<TranslationProvider>().unwrap(), TranslationProvider::Anthropic);
    assert!("openai".parse::<TranslationProvider>().is_err());
}
