use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::brain::HeaterState;

/// Half-width (in Celsius) of the dead-band around the setpoint.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(try_from = "f64")]
pub struct ToleranceBand {
    half_width_c: f64,
}

impl ToleranceBand {
    pub fn new(half_width_c: f64) -> Option<Self> {
        if half_width_c.is_finite() && half_width_c >= 0.0 {
            Some(Self { half_width_c })
        } else {
            None
        }
    }

    pub fn get_half_width(&self) -> f64 {
        self.half_width_c
    }

    pub fn lower(&self, setpoint_c: f64) -> f64 {
        setpoint_c - self.half_width_c
    }

    pub fn upper(&self, setpoint_c: f64) -> f64 {
        setpoint_c + self.half_width_c
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self { half_width_c: 0.5 }
    }
}

impl TryFrom<f64> for ToleranceBand {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        ToleranceBand::new(value)
            .ok_or_else(|| format!("tolerance must be a non-negative number, got {}", value))
    }
}

/// Where the current temperature sits relative to the dead-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Below,
    Within,
    Above,
}

impl Display for Band {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Below => write!(f, "below dead-band"),
            Band::Within => write!(f, "within dead-band"),
            Band::Above => write!(f, "above dead-band"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    desired: HeaterState,
    command_needed: bool,
    band: Band,
}

impl Decision {
    pub fn desired(&self) -> HeaterState {
        self.desired
    }

    pub fn command_needed(&self) -> bool {
        self.command_needed
    }

    pub fn band(&self) -> Band {
        self.band
    }
}

/// Decides what state the heater should be in.
///
/// Below the dead-band the heater should be on, above it off. Inside the band
/// (edges included) whatever was last commanded holds, which for an unknown
/// state means no decision is made at all and nothing gets sent.
/// A command is only needed when the desired state differs from the last one.
pub fn decide(current_c: f64, setpoint_c: f64, tolerance: ToleranceBand, last: HeaterState) -> Decision {
    let band = if current_c < tolerance.lower(setpoint_c) {
        Band::Below
    } else if current_c > tolerance.upper(setpoint_c) {
        Band::Above
    } else {
        Band::Within
    };

    let desired = match band {
        Band::Below => HeaterState::On,
        Band::Above => HeaterState::Off,
        Band::Within => last,
    };

    Decision {
        desired,
        command_needed: desired != last,
        band,
    }
}
