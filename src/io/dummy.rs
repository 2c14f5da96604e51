use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

use crate::brain::HeaterState;
use crate::io::cycle_log::CycleAction;

pub trait DummyIO {
    type MessageType;
    type Config;

    fn create(config: &Self::Config) -> (Self, Sender<Self::MessageType>) where Self: Sized {
        let (sender, receiver) = mpsc::channel();
        let dummy_obj = Self::new(receiver, config);
        (dummy_obj, sender)
    }

    fn new(receiver: Receiver<Self::MessageType>, config: &Self::Config) -> Self;
}

pub fn read_all<T, F>(receiver: &Receiver<T>, mut on_value: F)
    where F: FnMut(T) {
    loop {
        match receiver.try_recv() {
            Ok(x) => on_value(x),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => break,
        }
    }
}

/// Every call a dummy collaborator received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ReadEnabled,
    ReadTemperature,
    ReadSetpoint,
    ReadHeaterState,
    WriteHeaterState(HeaterState),
    Command(HeaterState),
    Publish(f64),
    Record(CycleAction),
}

/// Shared between all the dummies of one bundle so tests can see the order of calls.
#[derive(Debug, Clone, Default)]
pub struct CallLedger {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLedger {
    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}
