//! Identifiers.
//!
//! Queue-side ids (`TaskId`, `AttemptId`) are ULID based and share one
//! generic `Id<T>` that is tagged by a zero-sized marker, so the two cannot be
//! mixed up. Host-side ids (`OrderId`, `ProductId`) are the integer keys the
//! store hands us and are kept as plain newtypes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Provides the display prefix of an id kind ("task-", "attempt-").
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attempt {}

impl IdMarker for Attempt {
    fn prefix() -> &'static str {
        "attempt-"
    }
}

/// Identifier of a deferred job sitting in the task queue.
pub type TaskId = Id<Task>;

/// Identifier of one execution try of a deferred job.
pub type AttemptId = Id<Attempt>;

/// Order key in the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product (or product variation) key in the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The host uses 0 for "no product" (e.g. a line item without variation).
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_ids_carry_their_prefix() {
        let task = TaskId::from_ulid(Ulid::new());
        let attempt = AttemptId::from_ulid(Ulid::new());

        assert!(task.to_string().starts_with("task-"));
        assert!(attempt.to_string().starts_with("attempt-"));
        // let _: TaskId = attempt; // <- does not compile
    }

    #[test]
    fn phantom_marker_is_zero_sized() {
        use std::mem::size_of;
        assert_eq!(size_of::<TaskId>(), size_of::<Ulid>());
        assert_eq!(size_of::<AttemptId>(), 16);
    }

    #[test]
    fn order_id_serializes_as_bare_integer() {
        let id = OrderId::new(123);
        assert_eq!(serde_json::to_string(&id).unwrap(), "123");
        let back: OrderId = serde_json::from_str("123").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn zero_product_id_is_unset() {
        assert!(ProductId::new(0).is_unset());
        assert!(!ProductId::new(55).is_unset());
    }
}
