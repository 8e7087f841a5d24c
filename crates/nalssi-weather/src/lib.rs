//! Short-term forecast lookups for Korean locations
//!
//! Converts coordinates to the forecast grid, fetches the matching issuance
//! from the forecast API and reduces it to a displayable report. Region
//! names, district search and saved favorites live here too.

pub mod base_time;
pub mod client;
pub mod condition;
pub mod district;
pub mod favorites;
pub mod grid;
pub mod region;
pub mod report;
pub mod retry;
pub mod selector;
pub mod service;
pub mod store;
pub mod types;

pub use base_time::{base_time_for, now_kst};
pub use client::{ClientOptions, KmaClient};
pub use condition::WeatherCondition;
pub use district::{DistrictIndex, DistrictMatch};
pub use favorites::{FavoriteLocation, Favorites, FavoritesError, MAX_FAVORITES};
pub use grid::{to_geo, to_grid, LambertGrid};
pub use region::{RegionError, RegionName, RegionTable};
pub use report::WeatherReport;
pub use retry::RetryConfig;
pub use selector::{select_forecast, ForecastIndex, HourlyEntry, SelectedForecast};
pub use service::WeatherService;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use types::*;
