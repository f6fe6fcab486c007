use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskId;
use super::ids::OrderId;
use super::order::OrderStatus;

/// Queue group all relay jobs are filed under.
pub const AOP_GROUP: &str = "wc-aop";

/// Name of a deferred job; handlers are registered per hook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hook(String);

impl Hook {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// `wc_aop_process_{status}_order`, one hook per watched status.
    pub fn process_order(status: OrderStatus) -> Self {
        Self(format!("wc_aop_process_{}_order", status.slug()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hook + positional args + group, as handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    task_id: TaskId,
    hook: Hook,
    args: Vec<serde_json::Value>,
    group: String,
}

impl TaskEnvelope {
    pub fn new(
        task_id: TaskId,
        hook: Hook,
        args: Vec<serde_json::Value>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            hook,
            args,
            group: group.into(),
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    pub fn args(&self) -> &[serde_json::Value] {
        &self.args
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// First positional arg as an order id. The host may hand it back as a
    /// number or as a numeric string.
    pub fn order_id(&self) -> Option<OrderId> {
        match self.args.first()? {
            serde_json::Value::Number(n) => n.as_u64().map(OrderId::new),
            serde_json::Value::String(s) => s.trim().parse().ok().map(OrderId::new),
            _ => None,
        }
    }
}
