use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::io::IoError;
use crate::io::cycle_log::{CycleLog, CycleSummary};
use crate::io::dummy::{Call, CallLedger};

/// Keeps every summary in memory, optionally failing instead.
#[derive(Clone)]
pub struct MemoryCycleLog {
    summaries: Arc<Mutex<Vec<CycleSummary>>>,
    failing: bool,
    ledger: CallLedger,
}

impl MemoryCycleLog {
    pub fn new(ledger: &CallLedger) -> Self {
        Self {
            summaries: Arc::new(Mutex::new(Vec::new())),
            failing: false,
            ledger: ledger.clone(),
        }
    }

    pub fn failing(ledger: &CallLedger) -> Self {
        Self {
            failing: true,
            ..Self::new(ledger)
        }
    }

    pub fn summaries(&self) -> Vec<CycleSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CycleLog for MemoryCycleLog {
    async fn record(&self, summary: &CycleSummary) -> Result<(), IoError> {
        if self.failing {
            return Err(IoError::Other("log sink full".to_owned()));
        }
        self.ledger.push(Call::Record(summary.get_action()));
        self.summaries.lock().unwrap().push(summary.clone());
        Ok(())
    }
}
