use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Hook, TaskEnvelope};
use crate::error::JobError;

/// A handler for one hook.
///
/// Takes the whole `TaskEnvelope` so the handler decodes its positional args
/// as it likes.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, envelope: &TaskEnvelope) -> Result<(), JobError>;
}

/// Registry of handlers (hook -> handler).
///
/// Built during boot, read-only once workers run.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Hook, Arc<dyn TaskHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, hook: Hook, handler: Arc<dyn TaskHandler>) -> Result<(), JobError> {
        if self.handlers.contains_key(&hook) {
            return Err(JobError::DuplicateHandler(hook));
        }
        self.handlers.insert(hook, handler);
        Ok(())
    }

    pub fn get(&self, hook: &Hook) -> Option<&Arc<dyn TaskHandler>> {
        self.handlers.get(hook)
    }

    pub fn contains(&self, hook: &Hook) -> bool {
        self.handlers.contains_key(hook)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Runtime executes a `TaskEnvelope` by dispatching to a registered handler.
pub struct Runtime {
    registry: Arc<HandlerRegistry>,
}

impl Runtime {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub async fn execute(&self, envelope: &TaskEnvelope) -> Result<(), JobError> {
        let hook = envelope.hook();
        let handler = self
            .registry
            .get(hook)
            .ok_or_else(|| JobError::HandlerNotFound(hook.clone()))?;

        handler.handle(envelope).await
    }
}
