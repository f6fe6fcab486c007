use thiserror::Error;

use crate::domain::{Hook, OrderId, TaskId};

/// Failure talking to a host store (orders, products, settings).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Settings validation. Surfaced to the admin as a notice; never blocks saving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Looks like you made a mistake with the URL field. Make sure it's an url with the correct format!")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// No response was obtained from the endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid destination url {0:?}")]
    InvalidUrl(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidUrl(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("queue closed")]
    Closed,
}

/// Why a deferred job ended in failure. Terminal for the invocation.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("handler not found for hook={0}")]
    HandlerNotFound(Hook),

    #[error("duplicate handler for hook={0}")]
    DuplicateHandler(Hook),

    #[error("job args do not carry an order id: {0}")]
    BadArgs(String),

    #[error("settings unavailable: {0}")]
    Settings(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("could not read settings at boot: {0}")]
    Settings(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] JobError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}
