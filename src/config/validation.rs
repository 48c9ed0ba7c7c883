use crate::config::types::{ClassifierConfig, Config, FetcherConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for any configured request timeout (seconds)
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_classifier_config(&config.classifier)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates classification service configuration
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid classifier base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Classifier base-url '{}' must use http or https",
            config.base_url
        )));
    }

    validate_timeout("classifier.timeout-secs", config.timeout_secs)?;

    if config.target_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target-label cannot be empty".to_string(),
        ));
    }

    // Labels from the model are upper-cased before comparison
    if config.target_label != config.target_label.to_uppercase() {
        return Err(ConfigError::Validation(format!(
            "target-label must be upper-case, got '{}'",
            config.target_label
        )));
    }

    Ok(())
}

/// Validates page fetch configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    validate_timeout("fetcher.timeout-secs", config.timeout_secs)
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{DEFAULT_TARGET_LABEL, DEFAULT_TIMEOUT_SECS};

    fn valid_config() -> Config {
        Config {
            classifier: ClassifierConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                target_label: DEFAULT_TARGET_LABEL.to_string(),
            },
            fetcher: FetcherConfig::default(),
            storage: StorageConfig {
                database_path: "./spidey.db".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = valid_config();
        config.classifier.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.classifier.base_url = "ftp://models.example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_timeouts() {
        let mut config = valid_config();
        config.classifier.timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.fetcher.timeout_secs = MAX_TIMEOUT_SECS + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_lowercase_target_label() {
        let mut config = valid_config();
        config.classifier.target_label = "personal_blog".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_empty_fields() {
        let mut config = valid_config();
        config.fetcher.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.storage.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
