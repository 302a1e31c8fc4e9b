//! Form state → blueprint derivation.
//!
//! `build` is pure and total: a missing or unusable field drops the steps
//! that depend on it and never produces an error. Steps are always emitted
//! in this relative order: login, language, timezone, debug constants,
//! plugin steps.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::cli::{AppContext, BuildArgs};
use crate::core::blueprint::{Blueprint, Features, PLUGINS_DIR, PluginResource, PreferredVersions, Step};
use crate::core::form::{DEFAULT_LOCALE, DebugOptions, FormState, PluginInputs, PluginSource};

/// Placeholder credentials for the auto-login step.
///
/// These are Playground's well-known defaults and are NOT secret. Any site
/// booted with auto-login is open to whoever holds the launch URL.
pub const LOGIN_USERNAME: &str = "admin";
pub const LOGIN_PASSWORD: &str = "password";

/// Fixed timezone script. The zone and offset do not come from any input.
pub const TIMEZONE_PHP: &str = "<?php
require_once 'wp-load.php';
update_option('timezone_string', 'Asia/Taipei');
update_option('gmt_offset', 8);
?>";

/// Ref used when the user gives none (or `HEAD`).
pub const DEFAULT_GIT_REF: &str = "refs/heads/main";

const GITHUB_PREFIX: &str = "https://github.com/";
const SECURE_SCHEME: &str = "https://";

/// `repo=<owner/>name` inside a proxy URL; only `name` is kept.
static PROXY_REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"repo=([^&/]+/)?([^&/]+)").expect("static regex")
});

/// Derive a blueprint from the form.
pub fn build(form: &FormState) -> Blueprint {
    let mut steps = Vec::new();

    if form.auto_login {
        steps.push(Step::Login {
            username: LOGIN_USERNAME.to_string(),
            password: LOGIN_PASSWORD.to_string(),
        });
    }

    let language = form.language.trim();
    if !language.is_empty() && language != DEFAULT_LOCALE {
        steps.push(Step::SetSiteLanguage { language: language.to_string() });
    }

    if form.set_timezone {
        steps.push(Step::RunPhp { code: TIMEZONE_PHP.to_string() });
    }

    if let Some(step) = debug_step(&form.debug) {
        steps.push(step);
    }

    steps.extend(plugin_steps(&form.plugin));

    debug!(steps = steps.len(), "derived blueprint");

    Blueprint {
        landing_page: form.landing.path().to_string(),
        preferred_versions: PreferredVersions {
            php: form.php_version.clone(),
            wp: form.wp_version.clone(),
        },
        features: Features { networking: form.networking },
        steps,
    }
}

/// One `defineWpConfigConsts` step, or nothing when debugging is off.
fn debug_step(debug: &DebugOptions) -> Option<Step> {
    if !debug.enabled {
        return None;
    }

    let mut consts = IndexMap::new();
    consts.insert("WP_DEBUG".to_string(), true);

    let dependents = [
        ("WP_DEBUG_LOG", debug.log),
        ("WP_DEBUG_DISPLAY", debug.display),
        ("SCRIPT_DEBUG", debug.script_debug),
        ("SAVEQUERIES", debug.save_queries),
    ];
    for (name, on) in dependents {
        if on {
            consts.insert(name.to_string(), true);
        }
    }

    Some(Step::DefineWpConfigConsts { consts })
}

/// Steps for the active plugin source only.
fn plugin_steps(plugin: &PluginInputs) -> Vec<Step> {
    match plugin.source {
        PluginSource::WordPressOrg => {
            let slug = plugin.slug.trim();
            if slug.is_empty() {
                return Vec::new();
            }
            vec![Step::InstallPlugin {
                plugin_data: PluginResource::WordPressOrg { slug: slug.to_string() },
            }]
        }
        PluginSource::GitHub => {
            let repo = plugin.github_repo.trim();
            if repo.is_empty() {
                return Vec::new();
            }
            vec![Step::InstallPlugin {
                plugin_data: PluginResource::GitDirectory {
                    url: normalize_repo_url(repo),
                    git_ref: normalize_git_ref(&plugin.github_ref),
                    path: ".".to_string(),
                },
            }]
        }
        PluginSource::Proxy => {
            let url = plugin.proxy_url.trim();
            if url.is_empty() {
                return Vec::new();
            }
            let mut steps = vec![Step::InstallPlugin {
                plugin_data: PluginResource::Url { url: url.to_string() },
            }];
            // The archive is assumed to unpack as `<name>-main`.
            if let Some(name) = extract_repo_name(url) {
                steps.push(Step::Mv {
                    from_path: format!("{PLUGINS_DIR}/{name}-main"),
                    to_path: format!("{PLUGINS_DIR}/{name}"),
                });
                steps.push(Step::ActivatePlugin { plugin_path: name.to_string() });
            }
            steps
        }
    }
}

/// `owner/repo` → `https://github.com/owner/repo`; `https://...` passes through.
pub fn normalize_repo_url(repo: &str) -> String {
    let repo = repo.trim();
    if repo.starts_with(SECURE_SCHEME) {
        repo.to_string()
    } else {
        format!("{GITHUB_PREFIX}{repo}")
    }
}

/// Fully qualify a branch ref. Empty and `HEAD` mean the `main` branch.
pub fn normalize_git_ref(git_ref: &str) -> String {
    match git_ref.trim() {
        "" | "HEAD" => DEFAULT_GIT_REF.to_string(),
        r if r.starts_with("refs/") => r.to_string(),
        r => format!("refs/heads/{r}"),
    }
}

/// Repository name from a proxy URL's `repo=` parameter, owner dropped.
pub fn extract_repo_name(proxy_url: &str) -> Option<&str> {
    PROXY_REPO_RE
        .captures(proxy_url)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
}

/// `wpbp build`: print the auto-derived blueprint, ignoring any manual edit.
pub fn run(args: BuildArgs, ctx: &AppContext) -> Result<()> {
    let form = args.form.resolve(&ctx.config);
    let blueprint = build(&form);

    let text = if args.compact {
        blueprint.to_compact_json()
    } else {
        blueprint.to_pretty_json()
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &text)
            .with_context(|| format!("Failed to write blueprint to {}", path.display()))?;
        if !ctx.quiet {
            eprintln!("Wrote blueprint to {}", path.display());
        }
    } else {
        println!("{text}");
    }

    if args.clipboard {
        crate::infra::clipboard::copy_to_clipboard(&text, ctx)?;
    }

    Ok(())
}
