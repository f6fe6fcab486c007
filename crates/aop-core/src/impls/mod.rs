//! Impls - in-process adapters of the ports.
//!
//! Used by the tests and by the demo binary. A real host integration
//! provides its own `OrderStore`, `SettingsStore` and `SiteInfo`.

pub mod memory_log;
pub mod memory_settings;
pub mod memory_store;
pub mod static_site;

pub use self::memory_log::MemoryDeliveryLog;
pub use self::memory_settings::InMemorySettingsStore;
pub use self::memory_store::InMemoryOrderStore;
pub use self::static_site::StaticSite;
