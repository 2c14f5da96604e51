use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::io::IoError;
use crate::io::cycle_log::{CycleLog, CycleSummary};

/// Appends one JSON object per cycle to a file.
pub struct JsonLinesCycleLog {
    file: PathBuf,
}

impl JsonLinesCycleLog {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }
}

#[async_trait]
impl CycleLog for JsonLinesCycleLog {
    async fn record(&self, summary: &CycleSummary) -> Result<(), IoError> {
        let mut line = serde_json::to_string(summary)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
