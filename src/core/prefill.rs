//! Pre-fill form state from a share-link query string.
//!
//! Recognized parameters: `plugin`, `github`, `php`, `wp`, `landing`,
//! `debug`, `autostart`. Unknown parameters are ignored. When a key repeats,
//! the first value wins.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use tracing::debug;

use crate::core::form::{FormState, LandingPage, PluginSource};

static GITHUB_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/]+/[^/]+)").expect("static regex")
});

const PROXY_HOST: &str = "github-proxy.com";
const GITHUB_HOST: &str = "github.com";

/// Decoded query parameters, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    params: Vec<(String, String)>,
}

impl Prefill {
    /// Parse `a=b&c=d`. A leading `?` or a full URL are accepted.
    ///
    /// Follows the `application/x-www-form-urlencoded` rules: pairs split on
    /// `&`, key and value split at the first `=` (a bare key has an empty
    /// value), `+` is a space, then percent-decoding with invalid UTF-8
    /// replaced.
    pub fn from_query(query: &str) -> Self {
        let query = if let Some(q) = query.strip_prefix('?') {
            q
        } else if looks_like_url(query) {
            let after = query.split_once('?').map(|(_, q)| q).unwrap_or_default();
            after.split('#').next().unwrap_or_default()
        } else {
            query
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k), decode_component(v))
            })
            .collect();

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `autostart=true` was present.
    pub fn autostart(&self) -> bool {
        self.get("autostart") == Some("true")
    }

    /// Write recognized parameters into `form`.
    pub fn apply(&self, form: &mut FormState) {
        if let Some(plugin) = self.get("plugin") {
            apply_plugin(plugin, form);
        }

        if let Some(repo) = self.get("github") {
            form.plugin.source = PluginSource::GitHub;
            form.plugin.github_repo = repo.to_string();
        }

        if let Some(php) = self.get("php") {
            form.php_version = php.to_string();
        }

        if let Some(wp) = self.get("wp") {
            form.wp_version = wp.to_string();
        }

        if let Some(landing) = self.get("landing") {
            form.landing = LandingPage::from_path(landing);
        }

        if self.get("debug") == Some("true") {
            form.debug.enabled = true;
        }

        debug!(params = self.params.len(), "applied query prefill");
    }
}

/// `plugin=` may be a proxy URL, a GitHub URL, or a registry slug.
fn apply_plugin(plugin: &str, form: &mut FormState) {
    if plugin.contains(PROXY_HOST) {
        form.plugin.source = PluginSource::Proxy;
        form.plugin.proxy_url = plugin.to_string();
    } else if plugin.contains(GITHUB_HOST) {
        form.plugin.source = PluginSource::GitHub;
        if let Some(m) = GITHUB_REPO_RE.captures(plugin).and_then(|c| c.get(1)) {
            form.plugin.github_repo = m.as_str().to_string();
        }
    } else {
        form.plugin.slug = plugin.to_string();
    }
}

/// A scheme appears before the first `=`, so this is a URL rather than a bare query.
fn looks_like_url(s: &str) -> bool {
    match (s.find("://"), s.find('=')) {
        (Some(scheme), Some(eq)) => scheme < eq,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// `application/x-www-form-urlencoded` component: `+` is a space.
fn decode_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_and_debug() {
        let mut form = FormState::default();
        Prefill::from_query("?php=8.1&wp=6.4&debug=true").apply(&mut form);
        assert_eq!(form.php_version, "8.1");
        assert_eq!(form.wp_version, "6.4");
        assert!(form.debug.enabled);
    }

    #[test]
    fn debug_other_than_true_is_ignored() {
        let mut form = FormState::default();
        Prefill::from_query("debug=1").apply(&mut form);
        assert!(!form.debug.enabled);
    }

    #[test]
    fn plugin_slug_keeps_active_source() {
        let mut form = FormState::default();
        form.plugin.source = PluginSource::Proxy;
        Prefill::from_query("plugin=akismet").apply(&mut form);
        assert_eq!(form.plugin.slug, "akismet");
        assert_eq!(form.plugin.source, PluginSource::Proxy);
    }

    #[test]
    fn plugin_github_url_selects_github() {
        let mut form = FormState::default();
        Prefill::from_query("plugin=https%3A%2F%2Fgithub.com%2Facme%2Fwidgets%2Ftree%2Fmain").apply(&mut form);
        assert_eq!(form.plugin.source, PluginSource::GitHub);
        assert_eq!(form.plugin.github_repo, "acme/widgets");
    }

    #[test]
    fn plugin_proxy_url_selects_proxy() {
        let mut form = FormState::default();
        let url = "https://github-proxy.com/proxy/?repo=acme/widgets";
        Prefill::from_query(&format!("plugin={url}")).apply(&mut form);
        assert_eq!(form.plugin.source, PluginSource::Proxy);
        assert_eq!(form.plugin.proxy_url, url);
    }

    #[test]
    fn landing_known_and_custom() {
        let mut form = FormState::default();
        Prefill::from_query("landing=%2F").apply(&mut form);
        assert_eq!(form.landing, LandingPage::Home);

        Prefill::from_query("landing=/shop/").apply(&mut form);
        assert_eq!(form.landing, LandingPage::Custom("/shop/".into()));
    }

    #[test]
    fn first_value_wins_and_plus_is_space() {
        let p = Prefill::from_query("https://tool.example/?wp=6.5&wp=6.4&x=a+b");
        assert_eq!(p.get("wp"), Some("6.5"));
        assert_eq!(p.get("x"), Some("a b"));
        assert!(!p.autostart());
        assert!(Prefill::from_query("autostart=true").autostart());
    }

    #[test]
    fn form_urlencoded_pairs() {
        let p = Prefill::from_query("flag&q=a%2Bb+c%20d&eq=x=y");
        assert_eq!(p.get("flag"), Some(""));
        assert_eq!(p.get("q"), Some("a+b c d"));
        assert_eq!(p.get("eq"), Some("x=y"));
    }
}
