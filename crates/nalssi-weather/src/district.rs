//! Substring search over the static list of administrative districts.
//!
//! Entries are hyphen-separated paths such as `서울특별시-종로구-청운동`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::region::{RegionError, RegionName};

/// Maximum number of search results
pub const SEARCH_LIMIT: usize = 6;
/// Shortest (trimmed) term that triggers a search
pub const MIN_TERM_CHARS: usize = 2;

const SEPARATOR: char = '-';

/// A search hit, split for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictMatch {
    /// Original entry, e.g. `서울특별시-종로구-청운동`
    pub full: String,
    pub city: String,
    /// Everything below the city, space separated
    pub sub: String,
    /// Last path component
    pub main_name: String,
}

impl DistrictMatch {
    fn from_entry(entry: &str) -> Self {
        let parts: Vec<&str> = entry.split(SEPARATOR).collect();
        Self {
            full: entry.to_string(),
            city: parts.first().copied().unwrap_or_default().to_string(),
            sub: parts.get(1..).map(|p| p.join(" ")).unwrap_or_default(),
            main_name: parts.last().copied().unwrap_or_default().to_string(),
        }
    }

    /// Breadcrumb form, `서울특별시 > 종로구 > 청운동`
    pub fn breadcrumb(&self) -> String {
        self.full.split(SEPARATOR).collect::<Vec<_>>().join(" > ")
    }

    pub fn region_name(&self) -> RegionName {
        parse_district(&self.full)
    }
}

/// Split a district path into city / gu / dong.
///
/// Paths deeper than three levels keep the remainder in `dong`.
pub fn parse_district(entry: &str) -> RegionName {
    let mut parts = entry.splitn(3, SEPARATOR).map(str::trim);
    let city = parts.next().unwrap_or_default();
    let gu = parts.next().unwrap_or_default();
    let dong = parts.next().unwrap_or_default().replace(SEPARATOR, " ");
    RegionName::new(city, gu, dong)
}

/// In-memory district list
#[derive(Debug, Clone, Default)]
pub struct DistrictIndex {
    entries: Vec<String>,
    /// Entries with separators removed, same order as `entries`
    normalized: Vec<String>,
}

impl DistrictIndex {
    pub fn new(entries: Vec<String>) -> Self {
        let normalized = entries.iter().map(|e| e.replace(SEPARATOR, "")).collect();
        Self {
            entries,
            normalized,
        }
    }

    /// Load a JSON array of district paths.
    pub fn load(path: &Path) -> Result<Self, RegionError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| RegionError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries containing `term`, ignoring whitespace in the term and
    /// separators in the entries. Terms shorter than
    /// [`MIN_TERM_CHARS`] return nothing.
    pub fn search(&self, term: &str) -> Vec<DistrictMatch> {
        let term = term.trim();
        if term.chars().count() < MIN_TERM_CHARS {
            return Vec::new();
        }
        let needle: String = term.chars().filter(|c| !c.is_whitespace()).collect();

        self.entries
            .iter()
            .zip(&self.normalized)
            .filter(|(_, normalized)| normalized.contains(&needle))
            .take(SEARCH_LIMIT)
            .map(|(entry, _)| DistrictMatch::from_entry(entry))
            .collect()
    }

    /// Every entry, in file order
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Whether `entry` is one of the known districts
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DistrictIndex {
        DistrictIndex::new(
            [
                "서울특별시",
                "서울특별시-종로구",
                "서울특별시-종로구-청운동",
                "서울특별시-종로구-사직동",
                "서울특별시-중구-명동",
                "충청남도-서산시-보안면",
                "충청북도-청주시상당구-하입석리",
                "부산광역시-중구-중앙동",
                "부산광역시-해운대구-우동",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }

    #[test]
    fn test_short_terms_return_nothing() {
        assert!(index().search("").is_empty());
        assert!(index().search(" 동 ").is_empty());
    }

    #[test]
    fn test_match_ignores_separators_and_spaces() {
        let hits = index().search("서울특별시 종로");
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].full, "서울특별시-종로구");

        let hits = index().search("종로구청운");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].main_name, "청운동");
    }

    #[test]
    fn test_results_capped() {
        let hits = index().search("특별시");
        assert!(hits.len() <= SEARCH_LIMIT);
        assert_eq!(hits.len(), 5);

        let hits = index().search("구");
        assert!(hits.is_empty());

        let hits = index().search("중구");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_overflowing_matches_truncated_in_order() {
        let entries: Vec<String> = (1..=8)
            .map(|i| format!("서울특별시-종로구-청운{i}동"))
            .collect();
        let districts = DistrictIndex::new(entries.clone());

        let hits = districts.search("청운");
        assert_eq!(hits.len(), SEARCH_LIMIT);
        let fulls: Vec<&str> = hits.iter().map(|h| h.full.as_str()).collect();
        let expected: Vec<&str> = entries[..SEARCH_LIMIT].iter().map(String::as_str).collect();
        assert_eq!(fulls, expected);
    }

    #[test]
    fn test_entries_in_file_order() {
        let districts = index();
        assert_eq!(districts.entries().count(), districts.len());
        assert_eq!(districts.entries().next(), Some("서울특별시"));
    }

    #[test]
    fn test_match_parts() {
        let hits = index().search("청운동");
        let hit = &hits[0];
        assert_eq!(hit.city, "서울특별시");
        assert_eq!(hit.sub, "종로구 청운동");
        assert_eq!(hit.main_name, "청운동");
        assert_eq!(hit.breadcrumb(), "서울특별시 > 종로구 > 청운동");
    }

    #[test]
    fn test_city_only_entry() {
        let hit = DistrictMatch::from_entry("세종특별자치시");
        assert_eq!(hit.city, "세종특별자치시");
        assert_eq!(hit.sub, "");
        assert_eq!(hit.main_name, "세종특별자치시");
    }

    #[test]
    fn test_parse_district() {
        let name = parse_district("서울특별시-종로구-청운동");
        assert_eq!(name, RegionName::new("서울특별시", "종로구", "청운동"));

        let name = parse_district("충청북도-청주시-상당구-하입석리");
        assert_eq!(name.gu, "청주시");
        assert_eq!(name.dong, "상당구 하입석리");

        let name = parse_district("서울특별시");
        assert_eq!(name.full(), "서울특별시");
    }
}
