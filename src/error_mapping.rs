//! Library errors → [`AppError`].

use nalssi_core::error::ReqwestErrorExt;
use nalssi_core::{AppError, ConfigError, NetworkError, StorageError, WeatherError};
use nalssi_weather::{FavoritesError, RegionError};

/// Gateway reason codes for key problems (unregistered, expired, IP not allowed)
const SERVICE_KEY_CODES: [&str; 3] = ["30", "31", "32"];

pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for nalssi_weather::WeatherError {
    fn into_app_error(self) -> AppError {
        use nalssi_weather::WeatherError as Lib;
        match self {
            Lib::Network(e) => AppError::Network(e.into_network_error()),
            Lib::Http { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            Lib::Api { code, .. } if SERVICE_KEY_CODES.contains(&code.as_str()) => {
                AppError::Weather(WeatherError::InvalidServiceKey)
            }
            Lib::Api { code, message } => {
                AppError::Weather(WeatherError::ApiError(format!("{code} {message}")))
            }
            Lib::NoData => AppError::Weather(WeatherError::NoData),
            Lib::MissingApiKey => AppError::Weather(WeatherError::InvalidServiceKey),
            Lib::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
        }
    }
}

impl IntoAppError for FavoritesError {
    fn into_app_error(self) -> AppError {
        match self {
            FavoritesError::Full(n) => AppError::Storage(StorageError::FavoritesFull(n)),
            FavoritesError::Duplicate(name) => {
                AppError::Storage(StorageError::DuplicateFavorite(name))
            }
            FavoritesError::Store(e) => AppError::Storage(StorageError::Failed(e.to_string())),
            FavoritesError::Encode(e) => AppError::Storage(StorageError::Failed(e.to_string())),
        }
    }
}

impl IntoAppError for RegionError {
    fn into_app_error(self) -> AppError {
        AppError::Config(ConfigError::DataFile(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;

    #[test]
    fn test_key_errors_map_to_invalid_key() {
        let err = nalssi_weather::WeatherError::Api {
            code: "30".to_string(),
            message: "SERVICE_KEY_IS_NOT_REGISTERED_ERROR".to_string(),
        };
        assert!(matches!(
            err.into_app_error(),
            AppError::Weather(WeatherError::InvalidServiceKey)
        ));
    }

    #[test]
    fn test_other_api_errors_keep_code() {
        let err = nalssi_weather::WeatherError::Api {
            code: "10".to_string(),
            message: "INVALID_REQUEST_PARAMETER_ERROR".to_string(),
        };
        match err.into_app_error() {
            AppError::Weather(WeatherError::ApiError(msg)) => assert!(msg.starts_with("10")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_favorites_full() {
        let app = FavoritesError::Full(6).into_app_error();
        assert!(matches!(app, AppError::Storage(StorageError::FavoritesFull(6))));
    }

    #[test]
    fn test_http_status_preserved() {
        let err = nalssi_weather::WeatherError::Http {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert!(matches!(
            err.into_app_error(),
            AppError::Network(NetworkError::ServerError { status: 502, .. })
        ));
    }
}
