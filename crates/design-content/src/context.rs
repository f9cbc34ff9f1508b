//! Per-request rendering context.

use crate::config::SiteConfig;

/// What the fetcher needs to know about the request being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Module handling the request.
    pub module: String,
    /// Language of the request.
    pub lang: String,
    /// Current page URL prepared for a language parameter, e.g.
    /// `https://example.com/search?l=`. Language ids are appended to it.
    pub lang_switch_url: String,
}

impl RenderContext {
    /// Context for a public page.
    pub fn new(module: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            lang: lang.into(),
            lang_switch_url: "?l=".to_string(),
        }
    }

    /// Set the language switch base URL.
    pub fn with_lang_switch_url(mut self, url: impl Into<String>) -> Self {
        self.lang_switch_url = url.into();
        self
    }

    /// Check if the request is inside the administrative area.
    pub fn is_admin(&self, site: &SiteConfig) -> bool {
        self.module == site.admin_module
    }
}
