//! Source tag: which store a delivery came from.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::SourceTag;

/// A label of 2..=64 chars followed by a short dotted suffix at the end of
/// the host ("example" in "shop.example.co.uk").
static REGISTRABLE_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z0-9][a-z0-9\-]{1,63})\.[a-z.]{2,6}$")
        .expect("registrable domain pattern is valid")
});

/// Leftmost label of the registrable domain of `site_url`, or
/// `SourceTag::Unknown` when the URL has no host or the host does not look
/// like a domain.
pub fn extract_source(site_url: &str) -> SourceTag {
    let Ok(parsed) = Url::parse(site_url.trim()) else {
        return SourceTag::Unknown;
    };
    let Some(host) = parsed.host_str() else {
        return SourceTag::Unknown;
    };

    REGISTRABLE_DOMAIN
        .captures(host)
        .and_then(|caps| caps.get(1))
        .map(|label| SourceTag::Label(label.as_str().to_string()))
        .unwrap_or(SourceTag::Unknown)
}
