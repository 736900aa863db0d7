use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::WeightsError;
use crate::models::WeightConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Serve from an in-memory catalog instead of PostgreSQL
    #[serde(default)]
    pub demo: bool,
    pub demo_fixture: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_path_entries")]
    pub min_path_entries: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_path_entries: default_min_path_entries(),
        }
    }
}

fn default_min_path_entries() -> usize { 3 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// JSON or TOML weight artifact; overrides `weights` when set
    pub weights_file: Option<PathBuf>,
}

impl ScoringSettings {
    /// Resolve the weight configuration to use for scoring
    pub fn resolve_weights(&self) -> Result<WeightConfig, WeightsError> {
        match &self.weights_file {
            Some(path) => load_weight_artifact(path),
            None => {
                let weights = WeightConfig::from(self.weights.clone());
                match weights.invalid_field() {
                    Some(field) => Err(WeightsError::Negative { field }),
                    None => Ok(weights),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_language_weight")]
    pub language: f64,
    #[serde(default = "default_learning_style_weight")]
    pub learning_style: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_weight(),
            availability: default_availability_weight(),
            price: default_price_weight(),
            language: default_language_weight(),
            learning_style: default_learning_style_weight(),
        }
    }
}

impl From<WeightsConfig> for WeightConfig {
    fn from(value: WeightsConfig) -> Self {
        Self {
            rating: value.rating,
            availability: value.availability,
            price: value.price,
            language: value.language,
            learning_style: value.learning_style,
        }
    }
}

fn default_rating_weight() -> f64 { 0.35 }
fn default_availability_weight() -> f64 { 0.25 }
fn default_price_weight() -> f64 { 0.15 }
fn default_language_weight() -> f64 { 0.15 }
fn default_learning_style_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_issue_threshold")]
    pub issue_threshold: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_classifier_timeout(),
            issue_threshold: default_issue_threshold(),
        }
    }
}

fn default_classifier_timeout() -> u64 { 30 }
fn default_issue_threshold() -> f64 { 0.3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TUTOREAL__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TUTOREAL__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TUTOREAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TUTOREAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// `DATABASE_URL` takes precedence over the configured database URL
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}

/// Load a weight configuration artifact
///
/// The artifact is a flat key-value document (`rating_weight`,
/// `availability_weight`, `price_weight`, `language_weight`,
/// `learning_style_weight`) in JSON or TOML, chosen by file extension.
/// Every weight must be finite and non-negative.
pub fn load_weight_artifact<P: AsRef<Path>>(path: P) -> Result<WeightConfig, WeightsError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;

    let weights: WeightConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)?,
        Some("toml") => toml::from_str(&raw)?,
        _ => return Err(WeightsError::UnsupportedFormat(path.display().to_string())),
    };

    if let Some(field) = weights.invalid_field() {
        return Err(WeightsError::Negative { field });
    }

    tracing::info!("Loaded weight artifact from {}", path.display());
    Ok(weights)
}

/// Write a weight configuration artifact readable by [`load_weight_artifact`]
///
/// The format follows the file extension, as on load.
pub fn export_weight_artifact<P: AsRef<Path>>(weights: &WeightConfig, path: P) -> Result<(), WeightsError> {
    let path = path.as_ref();

    if let Some(field) = weights.invalid_field() {
        return Err(WeightsError::Negative { field });
    }

    let encoded = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::to_string_pretty(weights)?,
        Some("toml") => toml::to_string(weights)?,
        _ => return Err(WeightsError::UnsupportedFormat(path.display().to_string())),
    };

    std::fs::write(path, encoded)?;
    tracing::info!("Wrote weight artifact to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tutoreal-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.rating, 0.35);
        assert_eq!(weights.availability, 0.25);
        assert_eq!(weights.price, 0.15);
        assert_eq!(weights.language, 0.15);
        assert_eq!(weights.learning_style, 0.10);
        assert_eq!(WeightConfig::from(weights), WeightConfig::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_json_weight_artifact() {
        let path = write_temp(
            "weights.json",
            r#"{"rating_weight": 0.4, "availability_weight": 0.3, "price_weight": 0.2,
                "language_weight": 0.1, "learning_style_weight": 0.0}"#,
        );

        let weights = load_weight_artifact(&path).unwrap();
        assert_eq!(weights.rating, 0.4);
        assert_eq!(weights.learning_style, 0.0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_toml_weight_artifact() {
        let path = write_temp(
            "weights.toml",
            "rating_weight = 1.0\navailability_weight = 2.0\nprice_weight = 0.5\n\
             language_weight = 0.0\nlearning_style_weight = 0.25\n",
        );

        let weights = load_weight_artifact(&path).unwrap();
        assert_eq!(weights.availability, 2.0);
        assert!((weights.sum() - 3.75).abs() < 1e-9);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_negative_weight_artifact_rejected() {
        let path = write_temp(
            "negative.json",
            r#"{"rating_weight": 0.4, "availability_weight": -0.3, "price_weight": 0.2,
                "language_weight": 0.1, "learning_style_weight": 0.0}"#,
        );

        let err = load_weight_artifact(&path).unwrap_err();
        assert!(matches!(err, WeightsError::Negative { field: "availability_weight" }));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_unsupported_artifact_format() {
        let path = write_temp("weights.yaml", "rating_weight: 1");
        assert!(matches!(
            load_weight_artifact(&path),
            Err(WeightsError::UnsupportedFormat(_))
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_export_fitted_weights_round_trips_through_loader() {
        use crate::core::training::{fit_weights, predict_reward, TrainingExample, TrainingOptions};

        let truth = [0.4, 0.3, 0.2, 0.1, 0.0];
        let examples: Vec<TrainingExample> = [
            [1.0, 1.0, 1.0, 1.0, 1.0],
            [1.0, 0.0, 0.5, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0, 0.0],
            [0.5, 0.5, 1.0, 0.0, 1.0],
            [0.0, 0.0, 0.5, 1.0, 1.0],
        ]
        .into_iter()
        .map(|features| TrainingExample { features, reward: predict_reward(&features, &truth) })
        .collect();
        let fitted = fit_weights(&examples, &TrainingOptions::default());

        for name in ["fitted.json", "fitted.toml"] {
            let path = std::env::temp_dir().join(format!("tutoreal-{}-{}", std::process::id(), name));
            export_weight_artifact(&fitted, &path).unwrap();

            let raw = std::fs::read_to_string(&path).unwrap();
            assert!(raw.contains("learning_style_weight"));
            assert_eq!(load_weight_artifact(&path).unwrap(), fitted);
            std::fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_export_rejects_invalid_weights_and_formats() {
        let path = std::env::temp_dir().join(format!("tutoreal-{}-never.json", std::process::id()));
        let negative = WeightConfig { price: -0.5, ..WeightConfig::default() };
        assert!(matches!(
            export_weight_artifact(&negative, &path),
            Err(WeightsError::Negative { field: "price_weight" })
        ));
        assert!(!path.exists());

        let yaml = std::env::temp_dir().join("weights.yaml");
        assert!(matches!(
            export_weight_artifact(&WeightConfig::default(), &yaml),
            Err(WeightsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = write_temp(
            "settings.toml",
            r#"
                [server]
                host = "127.0.0.1"
                port = 9090
                demo = true
                demo_fixture = "demos/catalog.json"

                [scoring.weights]
                rating = 0.5

                [matching]
                min_path_entries = 0
            "#,
        );

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert!(settings.server.demo);
        assert_eq!(settings.matching.min_path_entries, 0);
        assert_eq!(settings.scoring.weights.rating, 0.5);
        assert_eq!(settings.scoring.weights.availability, 0.25);
        assert_eq!(settings.classifier.issue_threshold, 0.3);
        assert!(settings.classifier.endpoint.is_none());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_resolve_inline_weights() {
        let scoring = ScoringSettings::default();
        assert_eq!(scoring.resolve_weights().unwrap(), WeightConfig::default());

        let negative = ScoringSettings {
            weights: WeightsConfig {
                price: -1.0,
                ..WeightsConfig::default()
            },
            weights_file: None,
        };
        assert!(negative.resolve_weights().is_err());
    }
}
