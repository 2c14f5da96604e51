use std::fmt::{Display, Formatter};

use chrono::{DateTime, TimeZone, Timelike};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScheduleWindowConfig {
    start_hour: u32,
    end_hour: u32,
    offset_f: f64,
}

/// An hour range `[start_hour, end_hour)` of local wall-clock time during which
/// `offset_f` is added to the setpoint.
/// Only the hour is looked at, so 08:00:00 is outside a 6-8 window.
/// A window whose start is after its end runs over midnight.
#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(try_from = "ScheduleWindowConfig")]
pub struct ScheduleWindow {
    start_hour: u32,
    end_hour: u32,
    offset_f: f64,
}

impl ScheduleWindow {
    pub fn new(start_hour: u32, end_hour: u32, offset_f: f64) -> Result<Self, String> {
        if start_hour > 23 {
            return Err(format!("start_hour must be between 0 and 23, got {}", start_hour));
        }
        if end_hour > 24 {
            return Err(format!("end_hour must be between 0 and 24, got {}", end_hour));
        }
        if !offset_f.is_finite() {
            return Err(format!("offset_f must be a number, got {}", offset_f));
        }
        Ok(Self {
            start_hour,
            end_hour,
            offset_f,
        })
    }

    /// 06:00-08:00, +5°F.
    pub fn morning_warm_up() -> Self {
        Self {
            start_hour: 6,
            end_hour: 8,
            offset_f: 5.0,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            self.start_hour <= hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    pub fn contains<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.contains_hour(now.hour())
    }

    pub fn get_offset_f(&self) -> f64 {
        self.offset_f
    }
}

impl TryFrom<ScheduleWindowConfig> for ScheduleWindow {
    type Error = String;

    fn try_from(config: ScheduleWindowConfig) -> Result<Self, Self::Error> {
        ScheduleWindow::new(config.start_hour, config.end_hour, config.offset_f)
    }
}

impl Display for ScheduleWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0>2}:00-{:0>2}:00 ({:+}°F)", self.start_hour, self.end_hour, self.offset_f)
    }
}
