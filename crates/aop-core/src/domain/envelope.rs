//! Delivery envelope: what actually goes over the wire.

use serde::Serialize;

use super::report::{ReportRecord, SourceTag};

/// `origin` + `data` for one delivery attempt. Built per attempt, never kept.
///
/// `data` holds the records pre-serialized as JSON. serde_json never escapes
/// `/`, which existing consumers rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryEnvelope {
    origin: SourceTag,
    data: String,
}

impl DeliveryEnvelope {
    pub fn new(origin: SourceTag, records: &[ReportRecord]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            origin,
            data: serde_json::to_string(records)?,
        })
    }

    pub fn origin(&self) -> &SourceTag {
        &self.origin
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Form fields in the order the host posts them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("origin".to_string(), self.origin.form_value()),
            ("data".to_string(), self.data.clone()),
        ]
    }
}
