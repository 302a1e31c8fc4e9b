//! The explicit input record the builder consumes.
//!
//! Every option a user can pick lives here; the CLI (or any other front-end)
//! assembles one `FormState` and hands it to [`crate::core::builder::build`].

use serde::{Deserialize, Serialize};

/// Admin path used when a custom landing page is left empty.
pub const DEFAULT_ADMIN_PATH: &str = "/wp-admin/";

/// Locale that needs no `setSiteLanguage` step.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Where Playground lands after boot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandingPage {
    #[default]
    Dashboard,
    Home,
    Plugins,
    NewPost,
    Settings,
    Custom(String),
}

impl LandingPage {
    /// The fixed choices, in presentation order.
    pub const CHOICES: [LandingPage; 5] = [
        LandingPage::Dashboard,
        LandingPage::Home,
        LandingPage::Plugins,
        LandingPage::NewPost,
        LandingPage::Settings,
    ];

    /// Route written into the blueprint.
    pub fn path(&self) -> &str {
        match self {
            LandingPage::Dashboard => DEFAULT_ADMIN_PATH,
            LandingPage::Home => "/",
            LandingPage::Plugins => "/wp-admin/plugins.php",
            LandingPage::NewPost => "/wp-admin/post-new.php",
            LandingPage::Settings => "/wp-admin/options-general.php",
            LandingPage::Custom(p) if p.is_empty() => DEFAULT_ADMIN_PATH,
            LandingPage::Custom(p) => p,
        }
    }

    /// Map a route back onto a fixed choice, falling back to `Custom`.
    pub fn from_path(path: &str) -> Self {
        Self::CHOICES
            .into_iter()
            .find(|c| c.path() == path)
            .unwrap_or_else(|| LandingPage::Custom(path.to_string()))
    }
}

/// Which plugin input group is active. Only that group's fields are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginSource {
    #[default]
    #[serde(rename = "wporg")]
    WordPressOrg,
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "proxy")]
    Proxy,
}

/// `WP_DEBUG` and its dependent switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugOptions {
    pub enabled: bool,
    pub log: bool,
    pub display: bool,
    pub script_debug: bool,
    pub save_queries: bool,
}

/// Inputs for every plugin source; `PluginSource` picks which one counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInputs {
    pub source: PluginSource,
    pub slug: String,
    pub github_repo: String,
    pub github_ref: String,
    pub proxy_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub php_version: String,
    pub wp_version: String,
    pub landing: LandingPage,
    pub networking: bool,
    pub auto_login: bool,
    pub language: String,
    pub set_timezone: bool,
    pub debug: DebugOptions,
    pub plugin: PluginInputs,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            php_version: "8.3".to_string(),
            wp_version: "latest".to_string(),
            landing: LandingPage::default(),
            networking: true,
            auto_login: true,
            language: DEFAULT_LOCALE.to_string(),
            set_timezone: false,
            debug: DebugOptions::default(),
            plugin: PluginInputs::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_custom_landing_falls_back_to_admin() {
        assert_eq!(LandingPage::Custom(String::new()).path(), "/wp-admin/");
        assert_eq!(LandingPage::Custom("/shop/".into()).path(), "/shop/");
    }

    #[test]
    fn from_path_prefers_fixed_choices() {
        assert_eq!(LandingPage::from_path("/"), LandingPage::Home);
        assert_eq!(LandingPage::from_path("/wp-admin/plugins.php"), LandingPage::Plugins);
        assert_eq!(
            LandingPage::from_path("/wp-admin/edit.php"),
            LandingPage::Custom("/wp-admin/edit.php".into())
        );
    }
}
