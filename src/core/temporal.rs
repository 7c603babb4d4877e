//! Pure calendar and clock rules. Nothing here reads the system clock;
//! "now" is always passed in by the caller.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use std::sync::LazyLock;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

static HIRE_DATE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());

/// 嚴格解析 `YYYY-MM-DD`；格式不符或日期不存在（例如 2023-02-30）時回傳 `None`
pub fn parse_hire_date(value: &str) -> Option<NaiveDate> {
    let pattern = HIRE_DATE_PATTERN.as_ref()?;
    if !pattern.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// 解析 `YYYY-MM-DD HH:MM:SS`，日期與時間之間的空白先換成 `T`
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let normalized = value.trim().replacen(' ', "T", 1);
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 兩端皆包含
pub fn within_business_hours(time: NaiveTime, open: NaiveTime, close: NaiveTime) -> bool {
    time >= open && time <= close
}

/// 本週星期一 00:00；今天若是星期一就是今天 00:00
pub fn week_start(now: NaiveDateTime) -> NaiveDateTime {
    let back = u64::from(now.weekday().num_days_from_monday());
    let monday = now.date() - Days::new(back);
    monday.and_time(NaiveTime::MIN)
}

pub fn within_current_week(timestamp: NaiveDateTime, now: NaiveDateTime) -> bool {
    timestamp >= week_start(now) && timestamp <= now
}

pub fn same_calendar_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}
