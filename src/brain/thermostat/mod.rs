use chrono::Offset;
use log::{debug, error, info, warn};

use crate::brain::hysteresis::{self, Band};
use crate::brain::{CycleError, CycleOutcome, HeaterState};
use crate::config::ControlConfig;
use crate::io::{IOBundle, IoError};
use crate::io::cycle_log::{CycleAction, CycleSummary};
use crate::math::units::{celsius_to_fahrenheit, fahrenheit_to_celsius};
use crate::time::mytime::TimeProvider;


/// Runs one pass of the thermostat: gate, acquire, adjust, decide, act, report.
///
/// Holds nothing between cycles. The only memory is the heater state feed,
/// which is read at the start of a cycle and only written after a command succeeds.
pub struct ThermostatBrain {
    config: ControlConfig,
}

impl ThermostatBrain {
    pub fn new(config: ControlConfig) -> Self {
        Self { config }
    }

    pub async fn run_cycle(&self, io_bundle: &IOBundle, time_provider: &impl TimeProvider) -> Result<CycleOutcome, CycleError> {
        let result = self.cycle(io_bundle, time_provider).await;
        match &result {
            Ok(CycleOutcome::Disabled) => info!("Thermostat disabled, skipping cycle."),
            Ok(CycleOutcome::Completed(summary)) => debug!("Cycle completed: {}", summary.get_action()),
            Ok(CycleOutcome::DeviceNotFound(what)) => warn!("{} not found, heater not commanded this cycle.", what),
            Err(err) => error!("Cycle failed, nothing persisted: {}", err),
        }
        result
    }

    async fn cycle(&self, io_bundle: &IOBundle, time_provider: &impl TimeProvider) -> Result<CycleOutcome, CycleError> {
        // Gate
        if let Some(enable_feed) = io_bundle.enable_feed() {
            let enabled = enable_feed.get_system_enabled().await
                .map_err(|source| CycleError::FeedRead { feed: "enable", source })?;
            if !enabled {
                return Ok(CycleOutcome::Disabled);
            }
        }

        // Acquire
        // Discovery failures surface through whichever collaborator first needed the device.
        let current_c = match io_bundle.sensor().get_current_temperature_c().await {
            Ok(current_c) => current_c,
            Err(IoError::DeviceNotFound(what)) => return Ok(CycleOutcome::DeviceNotFound(what)),
            Err(err) => return Err(CycleError::SensorUnavailable(err)),
        };
        info!("Current Temperature: {}°C ({:.1}°F)", current_c, celsius_to_fahrenheit(current_c));

        let base_setpoint_f = io_bundle.setpoint_feed().get_setpoint_f().await
            .map_err(|source| CycleError::FeedRead { feed: "setpoint", source })?;

        let last_state = if self.config.is_tracking_state() {
            io_bundle.heater_state_feed().get_heater_state().await
                .map_err(|source| CycleError::FeedRead { feed: "heater state", source })?
        } else {
            HeaterState::Unknown
        };
        debug!("Last commanded heater state: {}", last_state);

        // Adjust
        let now = time_provider.get_time_in(self.config.get_time_zone());
        let schedule = self.config.get_schedule();
        let setpoint_f = schedule.adjusted_setpoint(base_setpoint_f, &now);
        for window in schedule.get_windows().iter().filter(|window| window.contains(&now)) {
            info!("Schedule window {} active at {}", window, now.format("%H:%M %Z"));
        }
        if setpoint_f != base_setpoint_f {
            info!("Setpoint {}°F adjusted to {}°F", base_setpoint_f, setpoint_f);
        }
        let setpoint_c = fahrenheit_to_celsius(setpoint_f);
        info!("Temperature Setpoint: {}°F ({:.2}°C)", setpoint_f, setpoint_c);

        // Decide
        let decision = hysteresis::decide(current_c, setpoint_c, self.config.get_tolerance(), last_state);
        debug!("Temperature is {} (±{}°C): desired {}", decision.band(), self.config.get_tolerance().get_half_width(), decision.desired());

        // Act
        let action = if decision.command_needed() {
            let desired = decision.desired();
            match io_bundle.heater().send_power_command(desired).await {
                Ok(()) => {}
                Err(IoError::DeviceNotFound(what)) => return Ok(CycleOutcome::DeviceNotFound(what)),
                Err(source) => return Err(CycleError::Actuator { desired, source }),
            }
            info!("Heater turned {}.", desired);

            if self.config.is_tracking_state() {
                io_bundle.heater_state_feed().set_heater_state(desired).await
                    .map_err(|source| CycleError::StatePersist { state: desired, source })?;
            }
            CycleAction::Commanded(desired)
        } else if decision.band() == Band::Within && !last_state.is_known() {
            warn!("Heater state unknown and temperature within the dead-band, not guessing. Heater left alone.");
            CycleAction::SkippedUnknown
        } else {
            info!("Heater state unchanged.");
            CycleAction::NoAction
        };

        // Report
        let new_state = match action {
            CycleAction::Commanded(state) => state,
            _ => last_state,
        };
        let timestamp = now.with_timezone(&now.offset().fix());
        let summary = CycleSummary::new(timestamp, current_c, base_setpoint_f, setpoint_f, last_state, new_state, action);
        report(io_bundle, &summary).await;

        Ok(CycleOutcome::Completed(summary))
    }
}

/// Best-effort, failures are only warned about.
async fn report(io_bundle: &IOBundle, summary: &CycleSummary) {
    if let Some(telemetry) = io_bundle.telemetry() {
        if let Err(err) = telemetry.publish(summary.get_current_temp_f()).await {
            warn!("Failed to publish current temperature: {}", err);
        }
    }

    for cycle_log in io_bundle.cycle_logs() {
        if let Err(err) = cycle_log.record(summary).await {
            warn!("Failed to record cycle summary: {}", err);
        }
    }
}
