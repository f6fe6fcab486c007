//! InMemorySettingsStore - option store stand-in.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Settings;
use crate::error::StoreError;
use crate::ports::SettingsStore;

#[derive(Default)]
pub struct InMemorySettingsStore {
    current: RwLock<Settings>,
}

impl InMemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        Ok(self.current.read().await.clone())
    }

    async fn save(&self, settings: Settings) -> Result<(), StoreError> {
        *self.current.write().await = settings;
        Ok(())
    }
}
