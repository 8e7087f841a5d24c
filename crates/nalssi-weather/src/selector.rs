//! Reduction of a forecast time series to what the client displays.
//!
//! Records are indexed once by timestamp and category; every extraction
//! below reads from that index.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::condition::{WeatherCondition, DEFAULT_SKY, NO_PRECIPITATION};
use crate::types::{Category, ForecastRecord, ForecastTimestamp};

/// Maximum number of entries in the hourly series
pub const HOURLY_LIMIT: usize = 12;
/// Placeholder for a value the feed did not provide
pub const MISSING_VALUE: &str = "-";

/// Category values at the chosen forecast timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedForecast {
    pub timestamp: ForecastTimestamp,
    pub fields: BTreeMap<Category, String>,
}

impl SelectedForecast {
    pub fn get(&self, category: &Category) -> Option<&str> {
        self.fields.get(category).map(String::as_str)
    }

    pub fn value_or<'a>(&'a self, category: &Category, fallback: &'a str) -> &'a str {
        self.get(category).unwrap_or(fallback)
    }

    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::classify(
            self.value_or(&Category::Sky, DEFAULT_SKY),
            self.value_or(&Category::PrecipitationType, NO_PRECIPITATION),
        )
    }
}

/// One column of the hourly strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    /// `YYYYMMDD`
    pub date: String,
    /// `HHMM`
    pub time: String,
    pub temperature: String,
    pub condition: WeatherCondition,
}

impl HourlyEntry {
    pub fn label(&self) -> &'static str {
        self.condition.label()
    }

    pub fn icon(&self) -> &'static str {
        self.condition.icon()
    }

    /// Display hour, e.g. `"15시"`
    pub fn hour_label(&self) -> String {
        format!("{}시", self.time.get(..2).unwrap_or(&self.time))
    }
}

/// Daily minimum / maximum temperature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRange {
    pub min: String,
    pub max: String,
}

/// Forecast records keyed by (timestamp, category).
#[derive(Debug, Clone, Default)]
pub struct ForecastIndex {
    slots: BTreeMap<ForecastTimestamp, BTreeMap<Category, String>>,
    /// Timestamps carrying a temperature, in order of first appearance
    temperature_order: Vec<ForecastTimestamp>,
}

impl ForecastIndex {
    /// Index `records`. A later record replaces an earlier one with the
    /// same timestamp and category.
    pub fn build(records: &[ForecastRecord]) -> Self {
        let mut index = Self::default();

        for record in records {
            let ts = record.timestamp();
            let slot = index.slots.entry(ts.clone()).or_default();

            if record.category == Category::Temperature
                && !slot.contains_key(&Category::Temperature)
            {
                index.temperature_order.push(ts);
            }

            slot.insert(record.category.clone(), record.fcst_value.clone());
        }

        index
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &ForecastTimestamp> {
        self.slots.keys()
    }

    pub fn get(&self, ts: &ForecastTimestamp, category: &Category) -> Option<&str> {
        self.slots
            .get(ts)
            .and_then(|slot| slot.get(category))
            .map(String::as_str)
    }

    /// Earliest timestamp at or after `now`, else the latest one available.
    pub fn target_timestamp(&self, now: &ForecastTimestamp) -> Option<&ForecastTimestamp> {
        self.slots
            .range(now..)
            .next()
            .map(|(ts, _)| ts)
            .or_else(|| self.slots.keys().next_back())
    }

    pub fn select_at(&self, now: &ForecastTimestamp) -> Option<SelectedForecast> {
        let ts = self.target_timestamp(now)?;
        let fields = self.slots.get(ts).cloned().unwrap_or_default();
        Some(SelectedForecast {
            timestamp: ts.clone(),
            fields,
        })
    }

    pub fn select(&self, now: NaiveDateTime) -> Option<SelectedForecast> {
        self.select_at(&ForecastTimestamp::from_datetime(now))
    }

    /// Up to [`HOURLY_LIMIT`] temperature timestamps, each classified with
    /// the SKY/PTY values of that same timestamp.
    pub fn hourly(&self) -> Vec<HourlyEntry> {
        self.temperature_order
            .iter()
            .take(HOURLY_LIMIT)
            .map(|ts| {
                let sky = self.get(ts, &Category::Sky).unwrap_or(DEFAULT_SKY);
                let pty = self
                    .get(ts, &Category::PrecipitationType)
                    .unwrap_or(NO_PRECIPITATION);

                HourlyEntry {
                    date: ts.date().to_string(),
                    time: ts.time().to_string(),
                    temperature: self
                        .get(ts, &Category::Temperature)
                        .unwrap_or(MISSING_VALUE)
                        .to_string(),
                    condition: WeatherCondition::classify(sky, pty),
                }
            })
            .collect()
    }

    /// Minimum and maximum temperature for `date` (`YYYYMMDD`).
    ///
    /// TMN/TMX win when the day has them; otherwise the extremes of the
    /// day's hourly temperatures are used.
    pub fn daily_range(&self, date: &str) -> DailyRange {
        let day: Vec<&BTreeMap<Category, String>> = self
            .slots
            .iter()
            .filter(|(ts, _)| ts.date() == date)
            .map(|(_, slot)| slot)
            .collect();

        let first_of = |category: &Category| {
            day.iter()
                .find_map(|slot| slot.get(category))
                .map(String::as_str)
        };

        let hourly: Vec<(f64, &str)> = day
            .iter()
            .filter_map(|slot| slot.get(&Category::Temperature))
            .filter_map(|v| v.trim().parse::<f64>().ok().map(|t| (t, v.as_str())))
            .collect();

        let coldest = hourly
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, v)| *v);
        let warmest = hourly
            .iter()
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, v)| *v);

        DailyRange {
            min: first_of(&Category::MinTemperature)
                .or(coldest)
                .unwrap_or(MISSING_VALUE)
                .to_string(),
            max: first_of(&Category::MaxTemperature)
                .or(warmest)
                .unwrap_or(MISSING_VALUE)
                .to_string(),
        }
    }
}

/// Pick the forecast slot closest to `now` from `records`.
///
/// Returns `None` for an empty series.
pub fn select_forecast(records: &[ForecastRecord], now: NaiveDateTime) -> Option<SelectedForecast> {
    ForecastIndex::build(records).select(now)
}
