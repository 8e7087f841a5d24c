use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Cell on the provider's 5 km forecast lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub nx: i32,
    pub ny: i32,
}

impl GridCell {
    pub fn new(nx: i32, ny: i32) -> Self {
        Self { nx, ny }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.nx, self.ny)
    }
}

/// Forecast variable code as published by the short-term forecast service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Hourly temperature (°C)
    Temperature,
    /// Daily minimum temperature (°C)
    MinTemperature,
    /// Daily maximum temperature (°C)
    MaxTemperature,
    /// Sky condition code
    Sky,
    /// Precipitation type code
    PrecipitationType,
    /// Precipitation probability (%)
    PrecipitationProbability,
    /// One-hour precipitation amount
    Precipitation,
    /// One-hour snowfall
    Snowfall,
    /// Relative humidity (%)
    Humidity,
    /// East-west wind component (m/s)
    WindU,
    /// North-south wind component (m/s)
    WindV,
    /// Wind direction (deg)
    WindDirection,
    /// Wind speed (m/s)
    WindSpeed,
    /// Wave height (m)
    WaveHeight,
    Other(String),
}

impl Category {
    pub fn from_code(code: &str) -> Self {
        match code {
            "TMP" => Self::Temperature,
            "TMN" => Self::MinTemperature,
            "TMX" => Self::MaxTemperature,
            "SKY" => Self::Sky,
            "PTY" => Self::PrecipitationType,
            "POP" => Self::PrecipitationProbability,
            "PCP" => Self::Precipitation,
            "SNO" => Self::Snowfall,
            "REH" => Self::Humidity,
            "UUU" => Self::WindU,
            "VVV" => Self::WindV,
            "VEC" => Self::WindDirection,
            "WSD" => Self::WindSpeed,
            "WAV" => Self::WaveHeight,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Temperature => "TMP",
            Self::MinTemperature => "TMN",
            Self::MaxTemperature => "TMX",
            Self::Sky => "SKY",
            Self::PrecipitationType => "PTY",
            Self::PrecipitationProbability => "POP",
            Self::Precipitation => "PCP",
            Self::Snowfall => "SNO",
            Self::Humidity => "REH",
            Self::WindU => "UUU",
            Self::WindV => "VVV",
            Self::WindDirection => "VEC",
            Self::WindSpeed => "WSD",
            Self::WaveHeight => "WAV",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// One item of a `getVilageFcst` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub category: Category,
    pub base_date: String,
    pub base_time: String,
    pub fcst_date: String,
    pub fcst_time: String,
    pub fcst_value: String,
    #[serde(default)]
    pub nx: i32,
    #[serde(default)]
    pub ny: i32,
}

impl ForecastRecord {
    /// Lexicographic ordering key, `YYYYMMDDHHMM`
    pub fn timestamp(&self) -> ForecastTimestamp {
        ForecastTimestamp::new(&self.fcst_date, &self.fcst_time)
    }
}

/// Forecast date and time concatenated into a fixed-width key.
///
/// Ordering is plain string ordering, which only matches chronological
/// ordering while every key has the same width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForecastTimestamp(String);

impl ForecastTimestamp {
    pub fn new(date: &str, time: &str) -> Self {
        Self(format!("{date}{time}"))
    }

    pub fn from_datetime(dt: chrono::NaiveDateTime) -> Self {
        Self(dt.format("%Y%m%d%H%M").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `YYYYMMDD` part
    pub fn date(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }

    /// `HHMM` part
    pub fn time(&self) -> &str {
        self.0.get(8..).unwrap_or("")
    }
}

impl fmt::Display for ForecastTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issuance a forecast batch belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTime {
    /// `YYYYMMDD`
    pub base_date: String,
    /// `HHMM`
    pub base_time: String,
}

impl fmt::Display for BaseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base_date, self.base_time)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },
    #[error("No forecast data for this request")]
    NoData,
    #[error("Service key is not configured")]
    MissingApiKey,
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Whether the failure means "nothing to show" rather than a broken request
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_category_codes_round_trip() {
        for code in ["TMP", "TMN", "TMX", "SKY", "PTY", "POP", "REH", "WSD"] {
            assert_eq!(Category::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_unknown_category_is_preserved() {
        let cat = Category::from_code("LGT");
        assert_eq!(cat, Category::Other("LGT".to_string()));
        assert_eq!(cat.to_string(), "LGT");
    }

    #[test]
    fn test_record_deserializes_from_provider_item() {
        let json = r#"{
            "baseDate": "20240601",
            "baseTime": "0500",
            "category": "TMP",
            "fcstDate": "20240601",
            "fcstTime": "0600",
            "fcstValue": "18",
            "nx": 60,
            "ny": 127
        }"#;
        let record: ForecastRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, Category::Temperature);
        assert_eq!(record.fcst_value, "18");
        assert_eq!(record.timestamp().as_str(), "202406010600");
    }

    #[test]
    fn test_timestamp_parts() {
        let ts = ForecastTimestamp::new("20240601", "1500");
        assert_eq!(ts.date(), "20240601");
        assert_eq!(ts.time(), "1500");
    }

    #[test]
    fn test_timestamp_from_datetime() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(ForecastTimestamp::from_datetime(dt).as_str(), "202406010905");
    }

    #[test]
    fn test_no_data_classification() {
        assert!(WeatherError::NoData.is_no_data());
        assert!(!WeatherError::MissingApiKey.is_no_data());
    }
}
