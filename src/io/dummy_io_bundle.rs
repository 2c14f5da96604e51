use std::sync::mpsc::Sender;

use super::controls::dummy::DummyHeater;
use super::cycle_log::dummy::MemoryCycleLog;
use super::dummy::{Call, CallLedger, DummyIO};
use super::feeds::dummy::DummyFeeds;
use super::{IOBundle, controls, feeds, temperatures};

pub struct DummyIOBundleHandle {
    temp_handle: Sender<temperatures::dummy::ModifyState>,
    heater_handle: Sender<controls::dummy::ModifyState>,
    feeds_handle: Sender<feeds::dummy::ModifyState>,
    feeds: DummyFeeds,
    cycle_log: MemoryCycleLog,
    ledger: CallLedger,
}

impl DummyIOBundleHandle {
    pub fn send_temps(&mut self, msg: temperatures::dummy::ModifyState) {
        self.temp_handle.send(msg).unwrap();
    }

    pub fn send_heater(&mut self, msg: controls::dummy::ModifyState) {
        self.heater_handle.send(msg).unwrap();
    }

    pub fn send_feeds(&mut self, msg: feeds::dummy::ModifyState) {
        self.feeds_handle.send(msg).unwrap();
    }

    pub fn stored_heater_state(&self) -> Option<String> {
        self.feeds.stored_heater_state()
    }

    pub fn cycle_log(&self) -> &MemoryCycleLog {
        &self.cycle_log
    }

    pub fn calls(&self) -> Vec<Call> {
        self.ledger.calls()
    }
}

/// A bundle with every optional collaborator attached.
pub fn new_dummy_io() -> (IOBundle, DummyIOBundleHandle) {
    let (io_bundle, handle) = new_dummy_io_without_extras();
    let io_bundle = io_bundle
        .with_enable_feed(handle.feeds.clone())
        .with_telemetry(handle.feeds.clone());
    (io_bundle, handle)
}

/// A bundle with no enable feed or telemetry, only a cycle log.
pub fn new_dummy_io_without_extras() -> (IOBundle, DummyIOBundleHandle) {
    let ledger = CallLedger::default();
    let (sensor, temp_handle) = temperatures::dummy::Dummy::create(&ledger);
    let (heater, heater_handle) = DummyHeater::create(&ledger);
    let (feeds, feeds_handle) = DummyFeeds::create(&ledger);
    let cycle_log = MemoryCycleLog::new(&ledger);

    let io_bundle = IOBundle::new(sensor, heater, feeds.clone(), feeds.clone())
        .with_cycle_log(cycle_log.clone());

    let handle = DummyIOBundleHandle {
        temp_handle,
        heater_handle,
        feeds_handle,
        feeds,
        cycle_log,
        ledger,
    };

    (io_bundle, handle)
}
