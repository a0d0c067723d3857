use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::tormaystarkastelu::DurationPolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub calculation: CalculationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let duration_policy = match env::var("TORMAYS_DURATION_POLICY") {
            Ok(value) => DurationPolicy::from_label(&value)
                .ok_or(ConfigError::InvalidDurationPolicy(value))?,
            Err(_) => DurationPolicy::default(),
        };

        let reference_layers = env::var("TORMAYS_REFERENCE_LAYERS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            calculation: CalculationConfig {
                duration_policy,
                reference_layers,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the nuisance-index calculation.
#[derive(Debug, Clone)]
pub struct CalculationConfig {
    pub duration_policy: DurationPolicy,
    /// Default reference-layer GeoJSON file, overridable per invocation.
    pub reference_layers: Option<PathBuf>,
}

impl CalculationConfig {
    /// Reference-layer file to load, preferring an explicit override.
    pub fn reference_layers_or(&self, explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        explicit
            .or_else(|| self.reference_layers.clone())
            .ok_or(ConfigError::MissingReferenceLayers)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDurationPolicy(String),
    MissingReferenceLayers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDurationPolicy(value) => write!(
                f,
                "TORMAYS_DURATION_POLICY must be 'report_only' or 'weighted', got '{}'",
                value
            ),
            ConfigError::MissingReferenceLayers => write!(
                f,
                "no reference layers given; pass --layers or set TORMAYS_REFERENCE_LAYERS"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("TORMAYS_DURATION_POLICY");
        env::remove_var("TORMAYS_REFERENCE_LAYERS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(
            config.calculation.duration_policy,
            DurationPolicy::ReportOnly
        );
        assert!(config.calculation.reference_layers.is_none());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_duration_policy_and_layer_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("TORMAYS_DURATION_POLICY", " Weighted ");
        env::set_var("TORMAYS_REFERENCE_LAYERS", "/srv/layers/helsinki.geojson");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.calculation.duration_policy, DurationPolicy::Weighted);
        assert_eq!(
            config.calculation.reference_layers,
            Some(PathBuf::from("/srv/layers/helsinki.geojson"))
        );
        reset_env();
    }

    #[test]
    fn explicit_layer_path_overrides_configured_one() {
        let calculation = CalculationConfig {
            duration_policy: DurationPolicy::ReportOnly,
            reference_layers: Some(PathBuf::from("/srv/layers/helsinki.geojson")),
        };
        assert_eq!(
            calculation
                .reference_layers_or(Some(PathBuf::from("layers.geojson")))
                .expect("explicit path"),
            PathBuf::from("layers.geojson")
        );
        assert_eq!(
            calculation.reference_layers_or(None).expect("configured path"),
            PathBuf::from("/srv/layers/helsinki.geojson")
        );

        let unset = CalculationConfig {
            reference_layers: None,
            ..calculation
        };
        assert!(matches!(
            unset.reference_layers_or(None),
            Err(ConfigError::MissingReferenceLayers)
        ));
    }

    #[test]
    fn rejects_unknown_duration_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TORMAYS_DURATION_POLICY", "multiply");
        match AppConfig::load() {
            Err(ConfigError::InvalidDurationPolicy(value)) => assert_eq!(value, "multiply"),
            other => panic!("expected invalid duration policy, got {other:?}"),
        }
        reset_env();
    }
}
