use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::tormaystarkastelu::{GeometryError, LayerError, TormaystarkasteluError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Layers(LayerError),
    Geometry(GeometryError),
    Calculation(TormaystarkasteluError),
}

impl AppError {
    /// Whether repeating the same invocation may succeed without changing its inputs.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Calculation(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid JSON input: {}", err),
            AppError::Csv(err) => write!(f, "csv export error: {}", err),
            AppError::Layers(err) => write!(f, "reference layer error: {}", err),
            AppError::Geometry(err) => write!(f, "geometry error: {}", err),
            AppError::Calculation(err) => write!(f, "calculation error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Layers(err) => Some(err),
            AppError::Geometry(err) => Some(err),
            AppError::Calculation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<LayerError> for AppError {
    fn from(value: LayerError) -> Self {
        Self::Layers(value)
    }
}

impl From<GeometryError> for AppError {
    fn from(value: GeometryError) -> Self {
        Self::Geometry(value)
    }
}

impl From<TormaystarkasteluError> for AppError {
    fn from(value: TormaystarkasteluError) -> Self {
        Self::Calculation(value)
    }
}
