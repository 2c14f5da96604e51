use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use crate::time::window::ScheduleWindow;

/// Time-of-day adjustments to the setpoint.
///
/// The offsets of every window containing the current hour are added to the base
/// setpoint. With no windows the setpoint is passed through untouched.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct SetpointSchedule {
    windows: Vec<ScheduleWindow>,
}

impl SetpointSchedule {
    pub fn new(windows: Vec<ScheduleWindow>) -> Self {
        Self { windows }
    }

    pub fn get_windows(&self) -> &[ScheduleWindow] {
        &self.windows
    }

    pub fn adjusted_setpoint<Tz: TimeZone>(&self, base_setpoint_f: f64, now: &DateTime<Tz>) -> f64 {
        self.windows.iter()
            .filter(|window| window.contains(now))
            .fold(base_setpoint_f, |setpoint, window| setpoint + window.get_offset_f())
    }
}

impl Default for SetpointSchedule {
    /// Warm the room up a little more first thing in the morning.
    fn default() -> Self {
        Self::new(vec![ScheduleWindow::morning_warm_up()])
    }
}
