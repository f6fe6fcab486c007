//! Domain model: orders as read from the host, the report rows built from
//! them, the delivery envelope, settings, and the queue's job records.

pub mod attempt;
pub mod envelope;
pub mod ids;
pub mod order;
pub mod outcome;
pub mod report;
pub mod settings;
pub mod task;

pub use attempt::{AttemptRecord, DecisionRecord};
pub use envelope::DeliveryEnvelope;
pub use ids::{AttemptId, OrderId, ProductId, TaskId};
pub use order::{Address, Contact, LineItem, Order, OrderDates, OrderStatus, Product};
pub use outcome::{DeliveryOutcome, ResponseSummary};
pub use report::{ReportRecord, SKU_PLACEHOLDER, SourceTag, money, shipping_share};
pub use settings::{SETTINGS_OPTION_KEY, Settings};
pub use task::{AOP_GROUP, Hook, TaskEnvelope};
