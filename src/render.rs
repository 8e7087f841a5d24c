//! Plain-text rendering for the terminal.

use nalssi_weather::{DistrictMatch, FavoriteLocation, WeatherReport};

const NO_DATA: &str = "날씨 정보를 불러올 수 없습니다.";

pub fn report(report: &WeatherReport) -> String {
    let mut out = format!(
        "📍 {}\n{} {}  {}°C  ({})\n최저 {}°C / 최고 {}°C  습도 {}%\n",
        report.location.full(),
        report.icon(),
        report.label(),
        report.temperature,
        report.condition.description(),
        report.min_temp,
        report.max_temp,
        report.humidity
    );

    if !report.hourly.is_empty() {
        out.push('\n');
        for entry in &report.hourly {
            out.push_str(&format!(
                "  {:>4}  {} {:<6} {:>5}°C\n",
                entry.hour_label(),
                entry.icon(),
                entry.label(),
                entry.temperature
            ));
        }
    }

    out.push_str(&format!(
        "\n발표 {}  예보 {}",
        report.base_time, report.forecast_time
    ));
    out
}

pub fn missing_report(name: &str) -> String {
    format!("📍 {name}\n{NO_DATA}")
}

pub fn search_results(term: &str, matches: &[DistrictMatch]) -> String {
    if matches.is_empty() {
        return format!("No districts match \"{term}\"");
    }
    matches
        .iter()
        .map(|m| format!("{}  ({})", m.main_name, m.breadcrumb()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn favorites(list: &[FavoriteLocation]) -> String {
    if list.is_empty() {
        return "No favorites yet".to_string();
    }
    list.iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {}  {}", i + 1, f.name, f.grid))
        .collect::<Vec<_>>()
        .join("\n")
}
