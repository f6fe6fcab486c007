use tracing::{error, info};

use crate::ports::{DeliveryLog, LOG_CHANNEL, LogEntry};

/// Writes delivery entries to `tracing` under the fixed channel target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDeliveryLog;

impl DeliveryLog for TracingDeliveryLog {
    fn record(&self, entry: LogEntry) {
        match &entry {
            LogEntry::Error(_) => error!(target: LOG_CHANNEL, entry = entry.tag(), "{entry}"),
            LogEntry::DataToSend(_) | LogEntry::Response(_) => {
                info!(target: LOG_CHANNEL, entry = entry.tag(), "{entry}")
            }
        }
    }
}
