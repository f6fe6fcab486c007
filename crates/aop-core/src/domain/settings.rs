//! Integration settings as kept in the host option store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Option key the host stores the settings record under.
pub const SETTINGS_OPTION_KEY: &str = "woocommerce_wc-aop_settings";

/// Singleton settings record. Read fresh by every deferred job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, with = "yes_no")]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
}

impl Settings {
    pub fn new(enabled: bool, url: impl Into<String>) -> Self {
        Self {
            enabled,
            url: url.into(),
        }
    }
}

/// The host stores checkboxes as "yes"/"no"; older records may hold a bool.
pub mod yes_no {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    pub fn parse(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "1" | "true" | "on" => Some(true),
            "no" | "0" | "false" | "off" | "" => Some(false),
            _ => None,
        }
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "yes" } else { "no" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Text(s) => parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("expected yes/no, got {s:?}"))),
        }
    }
}
