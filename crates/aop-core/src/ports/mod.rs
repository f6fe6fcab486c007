//! Ports - the seams to the host platform.
//!
//! Every host service the relay touches is a trait here and is handed to the
//! components that need it at construction time. Nothing is looked up
//! ambiently, so the pipeline runs without a host in tests.

pub mod clock;
pub mod delivery_log;
pub mod id_generator;
pub mod order_store;
pub mod settings_store;
pub mod site;
pub mod task_queue;
pub mod transport;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::delivery_log::{DeliveryLog, LOG_CHANNEL, LogEntry};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::order_store::OrderStore;
pub use self::settings_store::SettingsStore;
pub use self::site::SiteInfo;
pub use self::task_queue::TaskQueue;
pub use self::transport::{DeliveryRequest, Transport};
