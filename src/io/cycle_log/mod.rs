use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::info;

use crate::brain::HeaterState;
use crate::io::IoError;
use crate::math::units::{celsius_to_fahrenheit, fahrenheit_to_celsius};

pub mod file;
#[cfg(test)]
pub mod dummy;

/// What a completed cycle did about the heater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleAction {
    /// The heater was already in the desired state.
    NoAction,
    /// A command was sent to put the heater in this state.
    Commanded(HeaterState),
    /// The last state is unknown and the temperature is inside the dead-band,
    /// so nothing could be decided.
    SkippedUnknown,
}

impl Display for CycleAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleAction::NoAction => write!(f, "no action"),
            CycleAction::Commanded(state) => write!(f, "turned {}", state),
            CycleAction::SkippedUnknown => write!(f, "skipped, state unknown"),
        }
    }
}

/// Record of one completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummary {
    timestamp: DateTime<FixedOffset>,
    current_temp_c: f64,
    current_temp_f: f64,
    base_setpoint_f: f64,
    setpoint_c: f64,
    setpoint_f: f64,
    previous_state: HeaterState,
    new_state: HeaterState,
    action: CycleAction,
}

impl CycleSummary {
    /// `setpoint_f` is the setpoint after any schedule adjustment.
    pub fn new(timestamp: DateTime<FixedOffset>,
               current_temp_c: f64,
               base_setpoint_f: f64,
               setpoint_f: f64,
               previous_state: HeaterState,
               new_state: HeaterState,
               action: CycleAction) -> Self {
        Self {
            timestamp,
            current_temp_c,
            current_temp_f: celsius_to_fahrenheit(current_temp_c),
            base_setpoint_f,
            setpoint_c: fahrenheit_to_celsius(setpoint_f),
            setpoint_f,
            previous_state,
            new_state,
            action,
        }
    }

    pub fn get_timestamp(&self) -> &DateTime<FixedOffset> {
        &self.timestamp
    }

    pub fn get_current_temp_c(&self) -> f64 {
        self.current_temp_c
    }

    pub fn get_current_temp_f(&self) -> f64 {
        self.current_temp_f
    }

    pub fn get_base_setpoint_f(&self) -> f64 {
        self.base_setpoint_f
    }

    pub fn get_setpoint_c(&self) -> f64 {
        self.setpoint_c
    }

    pub fn get_setpoint_f(&self) -> f64 {
        self.setpoint_f
    }

    pub fn get_previous_state(&self) -> HeaterState {
        self.previous_state
    }

    pub fn get_new_state(&self) -> HeaterState {
        self.new_state
    }

    pub fn get_action(&self) -> CycleAction {
        self.action
    }
}

impl Display for CycleSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: Current Temp={}°C ({:.1}°F), Setpoint={:.2}°C ({}°F), Heater {} -> {} ({})",
               self.timestamp.format("%a %b %e %H:%M:%S %Y"),
               self.current_temp_c, self.current_temp_f,
               self.setpoint_c, self.setpoint_f,
               self.previous_state, self.new_state, self.action)
    }
}

/// Append-only destination for cycle summaries.
/// Failing to record must never fail the cycle.
#[async_trait]
pub trait CycleLog: Send + Sync {
    async fn record(&self, summary: &CycleSummary) -> Result<(), IoError>;
}

/// Writes the summary as a structured tracing event.
#[derive(Default)]
pub struct TracingCycleLog {}

#[async_trait]
impl CycleLog for TracingCycleLog {
    async fn record(&self, summary: &CycleSummary) -> Result<(), IoError> {
        info!(target: "cycle",
            timestamp = %summary.get_timestamp().to_rfc3339(),
            current_temp_c = summary.get_current_temp_c(),
            current_temp_f = summary.get_current_temp_f(),
            base_setpoint_f = summary.get_base_setpoint_f(),
            setpoint_c = summary.get_setpoint_c(),
            setpoint_f = summary.get_setpoint_f(),
            previous_state = %summary.get_previous_state(),
            new_state = %summary.get_new_state(),
            action = %summary.get_action(),
            "{}", summary);
        Ok(())
    }
}
