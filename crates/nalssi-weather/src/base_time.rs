//! Issuance schedule of the short-term forecast.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Timelike, Utc};

use crate::types::BaseTime;

/// Hours (KST) at which a new short-term forecast is issued
pub const ISSUANCE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Minutes after the first daily issuance before it can be requested
const FIRST_ISSUANCE_DELAY_MINUTES: u32 = 10;

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Korea Standard Time (UTC+9)
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Wall-clock time in KST
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

/// Latest issuance available at `now`.
///
/// Before 02:10 KST the previous day's 23:00 run is used.
pub fn base_time_for<Tz: TimeZone>(now: &DateTime<Tz>) -> BaseTime {
    base_time_for_local(now.with_timezone(&kst()).naive_local())
}

/// Same as [`base_time_for`] for a time already expressed in KST.
pub fn base_time_for_local(now: NaiveDateTime) -> BaseTime {
    let hour = now.hour();
    let before_first_run = hour < ISSUANCE_HOURS[0]
        || (hour == ISSUANCE_HOURS[0] && now.minute() < FIRST_ISSUANCE_DELAY_MINUTES);

    if before_first_run {
        let yesterday = now.date() - Duration::days(1);
        return BaseTime {
            base_date: yesterday.format("%Y%m%d").to_string(),
            base_time: "2300".to_string(),
        };
    }

    let issuance = ISSUANCE_HOURS
        .iter()
        .copied()
        .filter(|h| *h <= hour)
        .last()
        .unwrap_or(ISSUANCE_HOURS[0]);

    BaseTime {
        base_date: now.date().format("%Y%m%d").to_string(),
        base_time: format!("{issuance:02}00"),
    }
}
