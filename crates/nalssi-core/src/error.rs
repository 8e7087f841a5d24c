//! Centralized error types for the nalssi application.
//!
//! Library crates keep their own error enums; the binary maps them into
//! [`AppError`] and shows `user_message()` to the user while logging the
//! full error.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short, non-technical message for the terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The forecast server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Data file unavailable: {0}")]
    DataFile(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
            ConfigError::DataFile(_) => {
                "Region data could not be loaded. Check the data paths in your settings."
            }
        }
    }
}

/// Forecast lookup errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No forecast available")]
    NoData,

    #[error("Forecast API error: {0}")]
    ApiError(String),

    #[error("Invalid service key")]
    InvalidServiceKey,

    #[error("Unknown location: {0}")]
    LocationNotFound(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::NoData => "날씨 정보를 불러올 수 없습니다. (No forecast available.)",
            WeatherError::ApiError(_) => "Weather service error. Please try again.",
            WeatherError::InvalidServiceKey => {
                "The forecast service key is missing or invalid. Check settings."
            }
            WeatherError::LocationNotFound(_) => "Location not found. Check and try again.",
        }
    }
}

/// Local state errors (favorites).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Favorites full ({0} entries)")]
    FavoritesFull(usize),

    #[error("Duplicate favorite: {0}")]
    DuplicateFavorite(String),

    #[error("Storage failed: {0}")]
    Failed(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::FavoritesFull(_) => {
                "즐겨찾기는 최대 6개까지 추가할 수 있습니다. (Favorites are full.)"
            }
            StorageError::DuplicateFavorite(_) => "That location is already a favorite.",
            StorageError::Failed(_) => "Failed to save favorites. Please try again.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = [
            AppError::Network(NetworkError::Timeout),
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Weather(WeatherError::NoData),
            AppError::Storage(StorageError::FavoritesFull(6)),
            AppError::Other(anyhow::anyhow!("boom")),
        ];

        for err in &errors {
            assert!(!err.user_message().is_empty(), "{err:?}");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = StorageError::DuplicateFavorite("청운동".into()).into();
        assert!(matches!(
            app_err,
            AppError::Storage(StorageError::DuplicateFavorite(_))
        ));
    }

    #[test]
    fn test_server_error_messages_by_status() {
        let outage = NetworkError::ServerError {
            status: 503,
            message: String::new(),
        };
        let rejected = NetworkError::ServerError {
            status: 400,
            message: String::new(),
        };
        assert_ne!(outage.user_message(), rejected.user_message());
    }
}
