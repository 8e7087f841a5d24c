//! The assembled view of one location's forecast.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::condition::WeatherCondition;
use crate::region::RegionName;
use crate::selector::{ForecastIndex, HourlyEntry};
use crate::types::{BaseTime, Category, ForecastRecord, ForecastTimestamp};

/// Shown when a numeric field is missing from the selected slot
const ZERO_VALUE: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Degrees Celsius, as sent by the provider
    pub temperature: String,
    /// Relative humidity, percent
    pub humidity: String,
    pub condition: WeatherCondition,
    pub min_temp: String,
    pub max_temp: String,
    pub hourly: Vec<HourlyEntry>,
    pub location: RegionName,
    pub forecast_time: ForecastTimestamp,
    pub base_time: BaseTime,
    pub fetched_at: NaiveDateTime,
}

impl WeatherReport {
    /// Build a report from a fetched series.
    ///
    /// Returns `None` when `records` is empty.
    pub fn build(
        records: &[ForecastRecord],
        now: NaiveDateTime,
        location: RegionName,
        base: BaseTime,
    ) -> Option<Self> {
        let index = ForecastIndex::build(records);
        let selected = index.select(now)?;
        let range = index.daily_range(selected.timestamp.date());

        Some(Self {
            temperature: selected
                .value_or(&Category::Temperature, ZERO_VALUE)
                .to_string(),
            humidity: selected.value_or(&Category::Humidity, ZERO_VALUE).to_string(),
            condition: selected.condition(),
            min_temp: range.min,
            max_temp: range.max,
            hourly: index.hourly(),
            location,
            forecast_time: selected.timestamp,
            base_time: base,
            fetched_at: now,
        })
    }

    pub fn label(&self) -> &'static str {
        self.condition.label()
    }

    pub fn icon(&self) -> &'static str {
        self.condition.icon()
    }
}
