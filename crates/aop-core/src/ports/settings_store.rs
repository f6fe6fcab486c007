//! SettingsStore port - the host option store holding `enabled` and `url`.

use async_trait::async_trait;

use crate::domain::Settings;
use crate::error::StoreError;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings. Never cached by callers.
    async fn load(&self) -> Result<Settings, StoreError>;

    async fn save(&self, settings: Settings) -> Result<(), StoreError>;
}
