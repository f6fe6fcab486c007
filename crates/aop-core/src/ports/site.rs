//! SiteInfo port - facts about the host site itself.

/// Public URL of the store, the input of the source tag.
pub trait SiteInfo: Send + Sync {
    fn site_url(&self) -> String;
}
