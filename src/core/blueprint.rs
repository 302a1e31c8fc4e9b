//! Playground blueprint document model.
//!
//! The JSON shape follows the Playground blueprint format: camelCase keys, a
//! `step` discriminant on each step and a `resource` discriminant on plugin
//! data. Field order is the serialization order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of the Playground plugins directory.
pub const PLUGINS_DIR: &str = "/wordpress/wp-content/plugins";

/// The configuration document handed to Playground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub landing_page: String,
    pub preferred_versions: PreferredVersions,
    pub features: Features,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredVersions {
    pub php: String,
    pub wp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub networking: bool,
}

/// One provisioning action. Playground runs them in sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum Step {
    Login {
        username: String,
        password: String,
    },
    SetSiteLanguage {
        language: String,
    },
    #[serde(rename = "runPHP")]
    RunPhp {
        code: String,
    },
    DefineWpConfigConsts {
        consts: IndexMap<String, bool>,
    },
    #[serde(rename_all = "camelCase")]
    InstallPlugin {
        plugin_data: PluginResource,
    },
    #[serde(rename_all = "camelCase")]
    Mv {
        from_path: String,
        to_path: String,
    },
    #[serde(rename_all = "camelCase")]
    ActivatePlugin {
        plugin_path: String,
    },
}

impl Step {
    /// The `step` discriminant as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Login { .. } => "login",
            Step::SetSiteLanguage { .. } => "setSiteLanguage",
            Step::RunPhp { .. } => "runPHP",
            Step::DefineWpConfigConsts { .. } => "defineWpConfigConsts",
            Step::InstallPlugin { .. } => "installPlugin",
            Step::Mv { .. } => "mv",
            Step::ActivatePlugin { .. } => "activatePlugin",
        }
    }
}

/// Where an `installPlugin` step fetches the plugin from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource")]
pub enum PluginResource {
    #[serde(rename = "wordpress.org/plugins")]
    WordPressOrg { slug: String },
    #[serde(rename = "git:directory")]
    GitDirectory {
        url: String,
        #[serde(rename = "ref")]
        git_ref: String,
        path: String,
    },
    #[serde(rename = "url")]
    Url { url: String },
}

impl Blueprint {
    /// Compact single-line JSON, the form embedded in launch URLs.
    pub fn to_compact_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Two-space indented JSON, the form shown in previews.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Step kinds in order, handy for summaries and assertions.
    pub fn step_kinds(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .map(Step::kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn step_wire_names() {
        let mut consts = IndexMap::new();
        consts.insert("WP_DEBUG".to_string(), true);
        let steps = vec![
            Step::RunPhp { code: "<?php ?>".into() },
            Step::DefineWpConfigConsts { consts },
            Step::Mv { from_path: "/a".into(), to_path: "/b".into() },
            Step::ActivatePlugin { plugin_path: "x".into() },
        ];
        let v = serde_json::to_value(&steps).unwrap();
        assert_eq!(
            v,
            json!([
                { "step": "runPHP", "code": "<?php ?>" },
                { "step": "defineWpConfigConsts", "consts": { "WP_DEBUG": true } },
                { "step": "mv", "fromPath": "/a", "toPath": "/b" },
                { "step": "activatePlugin", "pluginPath": "x" }
            ])
        );
    }

    #[test]
    fn git_directory_uses_ref_key() {
        let step = Step::InstallPlugin {
            plugin_data: PluginResource::GitDirectory {
                url: "https://github.com/acme/widgets".into(),
                git_ref: "refs/heads/main".into(),
                path: ".".into(),
            },
        };
        assert_eq!(
            step_json(&step),
            r#"{"step":"installPlugin","pluginData":{"resource":"git:directory","url":"https://github.com/acme/widgets","ref":"refs/heads/main","path":"."}}"#
        );
    }

    #[test]
    fn document_key_order_is_stable() {
        let bp = Blueprint {
            landing_page: "/wp-admin/".into(),
            preferred_versions: PreferredVersions { php: "8.3".into(), wp: "latest".into() },
            features: Features { networking: true },
            steps: vec![],
        };
        assert_eq!(
            bp.to_compact_json(),
            r#"{"landingPage":"/wp-admin/","preferredVersions":{"php":"8.3","wp":"latest"},"features":{"networking":true},"steps":[]}"#
        );
    }

    #[test]
    fn parses_back_from_json() {
        let text = r#"{"step":"installPlugin","pluginData":{"resource":"wordpress.org/plugins","slug":"akismet"}}"#;
        let step: Step = serde_json::from_str(text).unwrap();
        assert_eq!(
            step,
            Step::InstallPlugin {
                plugin_data: PluginResource::WordPressOrg { slug: "akismet".into() }
            }
        );
    }

    fn step_json(step: &Step) -> String {
        serde_json::to_string(step).unwrap()
    }
}
