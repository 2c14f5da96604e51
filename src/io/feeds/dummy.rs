use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::brain::HeaterState;
use crate::io;
use crate::io::IoError;
use crate::io::dummy::{Call, CallLedger, DummyIO};
use crate::io::feeds::{parse_enabled, parse_setpoint, EnableFeed, HeaterStateFeed, SetpointFeed, TelemetrySink};

pub enum ModifyState {
    /// Raw feed values; `None` means the feed has no value.
    SetSetpoint(Option<String>),
    SetHeaterState(Option<String>),
    SetEnabled(Option<String>),
    FailReads(bool),
    FailWrites(bool),
    FailTelemetry(bool),
}

#[derive(Default)]
struct FeedValues {
    setpoint: Option<String>,
    heater_state: Option<String>,
    enabled: Option<String>,
    fail_reads: bool,
    fail_writes: bool,
    fail_telemetry: bool,
}

struct Inner {
    receiver: Mutex<Receiver<ModifyState>>,
    values: Mutex<FeedValues>,
    ledger: CallLedger,
}

/// In-memory stand-in for every feed. Clones share the same values.
#[derive(Clone)]
pub struct DummyFeeds {
    inner: Arc<Inner>,
}

impl DummyIO for DummyFeeds {
    type MessageType = ModifyState;
    type Config = CallLedger;

    fn new(receiver: Receiver<Self::MessageType>, ledger: &Self::Config) -> Self {
        let values = FeedValues {
            setpoint: Some("70".to_owned()),
            enabled: Some("ON".to_owned()),
            ..FeedValues::default()
        };
        Self {
            inner: Arc::new(Inner {
                receiver: Mutex::new(receiver),
                values: Mutex::new(values),
                ledger: ledger.clone(),
            }),
        }
    }
}

impl DummyFeeds {
    fn update_state(&self) {
        let guard = self.inner.receiver.lock().unwrap();
        io::dummy::read_all(&*guard, |message| {
            let mut values = self.inner.values.lock().unwrap();
            match message {
                ModifyState::SetSetpoint(value) => values.setpoint = value,
                ModifyState::SetHeaterState(value) => values.heater_state = value,
                ModifyState::SetEnabled(value) => values.enabled = value,
                ModifyState::FailReads(fail) => values.fail_reads = fail,
                ModifyState::FailWrites(fail) => values.fail_writes = fail,
                ModifyState::FailTelemetry(fail) => values.fail_telemetry = fail,
            }
        })
    }

    fn read<T>(&self, call: Call, read: impl FnOnce(&FeedValues) -> Result<T, IoError>) -> Result<T, IoError> {
        self.update_state();
        self.inner.ledger.push(call);
        let values = self.inner.values.lock().unwrap();
        if values.fail_reads {
            return Err(IoError::Other("feed service unreachable".to_owned()));
        }
        read(&*values)
    }

    /// What is currently stored on the heater state feed.
    pub fn stored_heater_state(&self) -> Option<String> {
        self.update_state();
        self.inner.values.lock().unwrap().heater_state.clone()
    }
}

#[async_trait]
impl SetpointFeed for DummyFeeds {
    async fn get_setpoint_f(&self) -> Result<f64, IoError> {
        self.read(Call::ReadSetpoint, |values| parse_setpoint("setpoint", values.setpoint.clone()))
    }
}

#[async_trait]
impl HeaterStateFeed for DummyFeeds {
    async fn get_heater_state(&self) -> Result<HeaterState, IoError> {
        self.read(Call::ReadHeaterState, |values| {
            Ok(values.heater_state.as_deref()
                .map(HeaterState::from_feed_value)
                .unwrap_or(HeaterState::Unknown))
        })
    }

    async fn set_heater_state(&self, state: HeaterState) -> Result<(), IoError> {
        self.update_state();
        let mut values = self.inner.values.lock().unwrap();
        if values.fail_writes {
            return Err(IoError::Other("feed write rejected".to_owned()));
        }
        self.inner.ledger.push(Call::WriteHeaterState(state));
        values.heater_state = Some(state.to_string());
        Ok(())
    }
}

#[async_trait]
impl EnableFeed for DummyFeeds {
    async fn get_system_enabled(&self) -> Result<bool, IoError> {
        self.read(Call::ReadEnabled, |values| Ok(parse_enabled(values.enabled.as_deref())))
    }
}

#[async_trait]
impl TelemetrySink for DummyFeeds {
    async fn publish(&self, current_temp_f: f64) -> Result<(), IoError> {
        self.update_state();
        if self.inner.values.lock().unwrap().fail_telemetry {
            return Err(IoError::Other("telemetry feed throttled".to_owned()));
        }
        self.inner.ledger.push(Call::Publish(current_temp_f));
        Ok(())
    }
}
