//! aop-core
//!
//! Relays store orders to an external webhook. When an order enters a
//! watched status a deferred job is queued; the job flattens the order into
//! one report record per line item and POSTs the batch to the configured URL.
//!
//! # Modules
//! - **domain**: orders, report records, delivery envelope, settings, job records
//! - **ports**: host services as traits (OrderStore, SettingsStore, SiteInfo, Transport, ...)
//! - **impls**: in-memory adapters of the ports
//! - **exporter** / **delivery**: the two pipeline stages
//! - **listener** / **job** / **plugin**: event wiring
//! - **queue** / **runtime** / **worker**: the development task queue and its consumers

pub mod config;
pub mod delivery;
pub mod domain;
pub mod error;
pub mod exporter;
pub mod impls;
pub mod integration;
pub mod job;
pub mod listener;
pub mod observability;
pub mod plugin;
pub mod ports;
pub mod queue;
pub mod runtime;
pub mod source;
pub mod worker;
