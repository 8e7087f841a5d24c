use serde::{Deserialize, Serialize};

/// Sky code assumed when a timestamp carries no SKY value
pub const DEFAULT_SKY: &str = "1";
/// Precipitation-type code meaning "none"
pub const NO_PRECIPITATION: &str = "0";

/// Weather condition derived from the SKY and PTY category codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    MostlyCloudy,
    Overcast,
    Rain,
    RainSnow,
    Snow,
    Shower,
    /// Precipitation of a type without a dedicated mapping
    Precipitation,
}

impl WeatherCondition {
    /// Classify a SKY/PTY pair.
    ///
    /// A precipitation type other than `"0"` wins over the sky state.
    /// Unknown precipitation codes map to [`Self::Precipitation`], unknown
    /// sky codes to [`Self::Clear`].
    pub fn classify(sky: &str, pty: &str) -> Self {
        if pty != NO_PRECIPITATION {
            return match pty {
                "1" => Self::Rain,
                "2" => Self::RainSnow,
                "3" => Self::Snow,
                "4" => Self::Shower,
                _ => Self::Precipitation,
            };
        }

        match sky {
            "1" => Self::Clear,
            "3" => Self::MostlyCloudy,
            "4" => Self::Overcast,
            _ => Self::Clear,
        }
    }

    /// Korean label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "맑음",
            Self::MostlyCloudy => "구름많음",
            Self::Overcast => "흐림",
            Self::Rain => "비",
            Self::RainSnow => "비/눈",
            Self::Snow => "눈",
            Self::Shower => "소나기",
            Self::Precipitation => "강수",
        }
    }

    /// Get a human-readable English description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::MostlyCloudy => "Mostly Cloudy",
            Self::Overcast => "Overcast",
            Self::Rain => "Rain",
            Self::RainSnow => "Rain/Snow",
            Self::Snow => "Snow",
            Self::Shower => "Shower",
            Self::Precipitation => "Precipitation",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::MostlyCloudy => "⛅",
            Self::Overcast => "☁️",
            Self::Rain => "🌧️",
            Self::RainSnow => "🌨️",
            Self::Snow => "❄️",
            Self::Shower => "🌦️",
            Self::Precipitation => "☔",
        }
    }
}
