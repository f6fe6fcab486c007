//! DeliveryLog port - the log channel delivery entries are written to.

use std::fmt;

/// Channel every delivery entry is tagged with.
pub const LOG_CHANNEL: &str = "woocommerce_wc-aop_scheduler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    DataToSend(String),
    Error(String),
    Response(String),
}

impl LogEntry {
    /// Structured tag of the entry.
    pub fn tag(&self) -> &'static str {
        match self {
            LogEntry::DataToSend(_) => "data_to_send",
            LogEntry::Error(_) => "error",
            LogEntry::Response(_) => "response",
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::DataToSend(json) => write!(f, "Data to send: {json}"),
            LogEntry::Error(reason) => write!(f, "Something went wrong: {reason}"),
            LogEntry::Response(json) => write!(f, "Response: {json}"),
        }
    }
}

pub trait DeliveryLog: Send + Sync {
    fn record(&self, entry: LogEntry);
}
