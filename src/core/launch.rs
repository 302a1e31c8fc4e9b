//! Active document → Playground launch URL.

use tracing::debug;

use crate::core::encode;
use crate::core::mode::ActiveDocument;

/// Public Playground instance.
pub const DEFAULT_BASE_URL: &str = "https://playground.wordpress.net/";

/// Holds the last good launch URL. Invalid documents never replace it.
#[derive(Debug, Clone)]
pub struct LaunchProjector {
    base_url: String,
    last_url: Option<String>,
}

impl LaunchProjector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), last_url: None }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    /// Project `doc`. Returns the new URL, or `None` (leaving the previous
    /// URL in place) for the invalid sentinel.
    pub fn project(&mut self, doc: &ActiveDocument) -> Option<&str> {
        let json = doc.to_compact_json()?;
        let url = launch_url(&self.base_url, &json);
        debug!(len = url.len(), "projected launch URL");
        self.last_url = Some(url);
        self.last_url.as_deref()
    }
}

impl Default for LaunchProjector {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// `<base>#<encoded json>`.
pub fn launch_url(base_url: &str, compact_json: &str) -> String {
    format!("{base_url}#{}", encode::encode(compact_json))
}
