use std::sync::Mutex;
use std::sync::mpsc::Receiver;

use async_trait::async_trait;

use crate::io;
use crate::io::IoError;
use crate::io::dummy::{Call, CallLedger, DummyIO};
use crate::io::temperatures::TemperatureSensor;

pub enum ModifyState {
    SetTemp(f64),
    /// Reads fail with this message until a temperature is set again.
    Fail(String),
    /// Reads fail as if the hub could not be found.
    Missing,
}

enum Reading {
    Temp(f64),
    Fail(String),
    Missing,
}

pub struct Dummy {
    receiver: Mutex<Receiver<ModifyState>>,
    reading: Mutex<Reading>,
    ledger: CallLedger,
}

#[async_trait]
impl TemperatureSensor for Dummy {
    async fn get_current_temperature_c(&self) -> Result<f64, IoError> {
        self.update_state();
        self.ledger.push(Call::ReadTemperature);
        match &*self.reading.lock().unwrap() {
            Reading::Temp(temp) => Ok(*temp),
            Reading::Fail(msg) => Err(IoError::Other(msg.clone())),
            Reading::Missing => Err(IoError::DeviceNotFound("Hub 2".to_owned())),
        }
    }
}

impl DummyIO for Dummy {
    type MessageType = ModifyState;
    type Config = CallLedger;

    fn new(receiver: Receiver<Self::MessageType>, ledger: &Self::Config) -> Self {
        Dummy {
            receiver: Mutex::new(receiver),
            reading: Mutex::new(Reading::Temp(20.0)),
            ledger: ledger.clone(),
        }
    }
}

impl Dummy {
    fn update_state(&self) {
        let guard = self.receiver.lock().unwrap();
        io::dummy::read_all(&*guard, |message| {
            *self.reading.lock().unwrap() = match message {
                ModifyState::SetTemp(temp) => Reading::Temp(temp),
                ModifyState::Fail(msg) => Reading::Fail(msg),
                ModifyState::Missing => Reading::Missing,
            };
        })
    }
}
