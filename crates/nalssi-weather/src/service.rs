//! Coordinates → region → issuance → fetch → report.

use chrono::{DateTime, FixedOffset};

use crate::base_time::{base_time_for, kst};
use crate::client::KmaClient;
use crate::district::{DistrictIndex, DistrictMatch};
use crate::favorites::FavoriteLocation;
use crate::grid::LambertGrid;
use crate::region::{RegionName, RegionTable};
use crate::report::WeatherReport;
use crate::types::{GeoPoint, GridCell};

/// Weather lookups for the binary.
///
/// Every failure on the fetch path is logged and reported as "no data"
/// (`None`); callers only decide what to show.
#[derive(Debug, Clone)]
pub struct WeatherService {
    client: KmaClient,
    regions: RegionTable,
    districts: DistrictIndex,
    grid: LambertGrid,
}

impl WeatherService {
    pub fn new(client: KmaClient, regions: RegionTable, districts: DistrictIndex) -> Self {
        Self {
            client,
            regions,
            districts,
            grid: LambertGrid::kma(),
        }
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn districts(&self) -> &DistrictIndex {
        &self.districts
    }

    pub fn grid_for(&self, point: GeoPoint) -> GridCell {
        self.grid.to_grid(point.latitude, point.longitude)
    }

    /// Report for a coordinate pair.
    pub async fn report_for_point(
        &self,
        point: GeoPoint,
        now: DateTime<FixedOffset>,
    ) -> Option<WeatherReport> {
        let cell = self.grid_for(point);
        let region = self.regions.describe(cell);
        tracing::debug!(
            "({}, {}) -> {} {}",
            point.latitude,
            point.longitude,
            cell,
            region.full()
        );
        self.report_for_cell(cell, region, now).await
    }

    /// Report for an already resolved grid cell.
    ///
    /// `now` may carry any offset; issuance and slot are both chosen on
    /// KST wall-clock time.
    pub async fn report_for_cell(
        &self,
        cell: GridCell,
        region: RegionName,
        now: DateTime<FixedOffset>,
    ) -> Option<WeatherReport> {
        let base = base_time_for(&now);
        let local = now.with_timezone(&kst()).naive_local();

        match self.client.fetch_forecast(cell, &base).await {
            Ok(records) => {
                let report = WeatherReport::build(&records, local, region, base);
                if report.is_none() {
                    tracing::warn!("Forecast for {} had no usable records", cell);
                }
                report
            }
            Err(e) if e.is_no_data() => {
                tracing::warn!("No forecast data for {} at {}", cell, base);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to fetch forecast for {}: {}", cell, e);
                None
            }
        }
    }

    pub fn search(&self, term: &str) -> Vec<DistrictMatch> {
        self.districts.search(term)
    }

    /// Report for a district entry; `None` when the district is unknown
    /// or the fetch fails.
    pub async fn report_for_district(
        &self,
        entry: &str,
        now: DateTime<FixedOffset>,
    ) -> Option<WeatherReport> {
        let Some((cell, name)) = self.regions.resolve_district(entry) else {
            tracing::warn!("No grid cell for district {}", entry);
            return None;
        };
        self.report_for_cell(cell, name, now).await
    }

    /// Reports for every favorite, in list order.
    pub async fn reports_for_favorites(
        &self,
        favorites: &[FavoriteLocation],
        now: DateTime<FixedOffset>,
    ) -> Vec<(FavoriteLocation, Option<WeatherReport>)> {
        let mut reports = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            let report = self
                .report_for_cell(favorite.grid, favorite.region.clone(), now)
                .await;
            reports.push((favorite.clone(), report));
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::client::ClientOptions;
    use crate::region::RegionRow;

    fn service() -> WeatherService {
        let client = KmaClient::new(ClientOptions {
            service_key: "test-key".to_string(),
            ..ClientOptions::default()
        })
        .unwrap();
        let regions = RegionTable::from_rows(vec![
            RegionRow {
                city: "서울특별시".to_string(),
                gu: "종로구".to_string(),
                dong: "청운효자동".to_string(),
                nx: 60,
                ny: 127,
            },
            RegionRow {
                city: "부산광역시".to_string(),
                gu: "중구".to_string(),
                dong: String::new(),
                nx: 97,
                ny: 74,
            },
        ]);
        let districts = DistrictIndex::new(vec![
            "서울특별시-종로구-청운효자동".to_string(),
            "부산광역시-중구-중앙동".to_string(),
        ]);
        WeatherService::new(client, regions, districts)
    }

    #[test]
    fn test_grid_for_seoul() {
        let cell = service().grid_for(GeoPoint::new(37.5665, 126.9780));
        assert_eq!(cell, GridCell::new(60, 127));
    }

    #[test]
    fn test_search_uses_district_index() {
        let hits = service().search("중앙동");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].city, "부산광역시");
    }
}
