use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

/// A wall-clock time in New York, the default zone.
pub fn new_york(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Tz> {
    New_York
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .unwrap_or_else(|| panic!("Expected {:0>4}-{:0>2}-{:0>2} {:0>2}:{:0>2}:{:0>2} to be a single valid New York time",
                                  year, month, day, hour, minute, second))
}

/// The UTC instant of a New York wall-clock time.
pub fn new_york_utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    new_york(year, month, day, hour, minute, second).with_timezone(&Utc)
}
