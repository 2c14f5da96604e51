use std::sync::Mutex;
use std::sync::mpsc::Receiver;

use async_trait::async_trait;
use log::debug;

use crate::brain::HeaterState;
use crate::io;
use crate::io::IoError;
use crate::io::controls::HeaterControl;
use crate::io::dummy::{Call, CallLedger, DummyIO};

pub enum ModifyState {
    /// Commands fail while this is true.
    SetFailing(bool),
    /// Commands fail as if the heater's remote could not be found while this is true.
    SetMissing(bool),
}

pub struct DummyHeater {
    receiver: Mutex<Receiver<ModifyState>>,
    failing: Mutex<bool>,
    missing: Mutex<bool>,
    ledger: CallLedger,
}

#[async_trait]
impl HeaterControl for DummyHeater {
    async fn send_power_command(&self, desired: HeaterState) -> Result<(), IoError> {
        self.update_state();
        if *self.missing.lock().unwrap() {
            return Err(IoError::DeviceNotFound("Heater 'Lasko Heater'".to_owned()));
        }
        if *self.failing.lock().unwrap() {
            return Err(IoError::Other("IR command rejected".to_owned()));
        }
        debug!("Dummy: Heater turned {}", desired);
        self.ledger.push(Call::Command(desired));
        Ok(())
    }
}

impl DummyIO for DummyHeater {
    type MessageType = ModifyState;
    type Config = CallLedger;

    fn new(receiver: Receiver<Self::MessageType>, ledger: &Self::Config) -> Self {
        Self {
            receiver: Mutex::new(receiver),
            failing: Mutex::new(false),
            missing: Mutex::new(false),
            ledger: ledger.clone(),
        }
    }
}

impl DummyHeater {
    fn update_state(&self) {
        let guard = self.receiver.lock().unwrap();
        io::dummy::read_all(&*guard, |message| {
            match message {
                ModifyState::SetFailing(failing) => *self.failing.lock().unwrap() = failing,
                ModifyState::SetMissing(missing) => *self.missing.lock().unwrap() = missing,
            }
        })
    }
}
