//! Admin settings form of the integration.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::domain::Settings;
use crate::domain::settings::yes_no;
use crate::error::{SettingsError, StoreError};
use crate::ports::SettingsStore;

pub const INTEGRATION_ID: &str = "wc-aop";
pub const INTEGRATION_TITLE: &str = "Automate Order Process";
pub const INTEGRATION_DESCRIPTION: &str = "Settings for Automate Order Process integration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Checkbox,
    Text,
}

/// Static description of one form field, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub kind: FieldKind,
    pub title: &'static str,
    pub label: Option<&'static str>,
    pub description: Option<&'static str>,
    pub default: &'static str,
}

pub const FORM_FIELDS: [FormField; 2] = [
    FormField {
        key: "enabled",
        kind: FieldKind::Checkbox,
        title: "Enable/Disable",
        label: Some("Enable Automate Order Process integration"),
        description: None,
        default: "no",
    },
    FormField {
        key: "url",
        kind: FieldKind::Text,
        title: "URL for submitting completed order",
        label: None,
        description: Some(
            "Enter the URL for processing completed order (ex. https://demo.pentacode.dev/api/process_order)",
        ),
        default: "",
    },
];

/// Absolute `http`/`https` URL with a host.
pub fn validate_url_field(value: &str) -> Result<(), SettingsError> {
    let invalid = || SettingsError::InvalidUrl(value.to_string());
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(invalid()),
    }
}

pub struct SettingsForm {
    store: Arc<dyn SettingsStore>,
}

impl SettingsForm {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub fn fields(&self) -> &'static [FormField] {
        &FORM_FIELDS
    }

    /// Save a submitted form and return the notices to show the admin.
    ///
    /// Validation never blocks saving: an invalid URL is stored as typed and
    /// reported through the returned notices. An unticked checkbox is absent
    /// from the submission and reads as `no`.
    pub async fn process<'a, I>(&self, submitted: I) -> Result<Vec<SettingsError>, StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Settings::default();
        for (key, value) in submitted {
            match key {
                "enabled" => settings.enabled = yes_no::parse(value).unwrap_or(false),
                "url" => settings.url = value.trim().to_string(),
                _ => {}
            }
        }

        let mut notices = Vec::new();
        if let Err(err) = validate_url_field(&settings.url) {
            warn!(url = %settings.url, "settings saved with an invalid url");
            notices.push(err);
        }

        info!(enabled = settings.enabled, "integration settings saved");
        self.store.save(settings).await?;
        Ok(notices)
    }
}
