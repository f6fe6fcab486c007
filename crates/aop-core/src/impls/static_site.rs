use crate::ports::SiteInfo;

/// Site whose URL is fixed at construction (from config).
#[derive(Debug, Clone)]
pub struct StaticSite {
    url: String,
}

impl StaticSite {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl SiteInfo for StaticSite {
    fn site_url(&self) -> String {
        self.url.clone()
    }
}
