use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::form::{DEFAULT_LOCALE, FormState, LandingPage};
use crate::core::launch::DEFAULT_BASE_URL;
use crate::core::snapshot::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Playground instance the launch URL points at
    pub base_url: String,

    /// Directory holding the blueprint snapshot (supports ~ and $VAR)
    pub state_dir: String,

    /// Snapshot key; one snapshot per key
    pub storage_key: String,

    /// Form values used when a flag is not given
    pub defaults: FormDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults
{
    pub php: String,
    pub wp: String,
    pub language: String,
    pub landing: String,
    pub networking: bool,
    pub auto_login: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            state_dir: "~/.wpblueprint".to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            defaults: FormDefaults::default(),
        }
    }
}

impl Default for FormDefaults
{
    fn default() -> Self
    {
        let form = FormState::default();
        Self {
            php: form.php_version,
            wp: form.wp_version,
            language: DEFAULT_LOCALE.to_string(),
            landing: form.landing.path().to_string(),
            networking: form.networking,
            auto_login: form.auto_login,
        }
    }
}

impl FormDefaults
{
    /// Starting form before prefill and flags are applied.
    pub fn to_form(&self) -> FormState
    {
        FormState {
            php_version: self.php.clone(),
            wp_version: self.wp.clone(),
            landing: LandingPage::from_path(&self.landing),
            networking: self.networking,
            auto_login: self.auto_login,
            language: self.language.clone(),
            ..FormState::default()
        }
    }
}

impl Config
{
    /// `state_dir` with `~` and environment variables expanded.
    pub fn state_dir_path(&self) -> PathBuf
    {
        let expanded = shellexpand::full(&self.state_dir)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| {
                shellexpand::tilde(&self.state_dir).into_owned()
            });
        PathBuf::from(expanded)
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = [
        "wpblueprint.toml",
        "wpblueprint.yaml",
        "wpblueprint.json",
        ".wpblueprint.toml",
    ];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // WPBP_BASE_URL, WPBP_DEFAULTS__PHP, ...
    builder = builder.add_source(
        config::Environment::with_prefix("WPBP")
            .prefix_separator("_")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("wpblueprint.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: would create {}", config_path.display());
        }
        return Ok(());
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml()
    {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.base_url, DEFAULT_BASE_URL);
        assert_eq!(back.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(back.defaults.to_form(), FormState::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults()
    {
        let back: Config = toml::from_str("[defaults]\nphp = \"7.4\"\n").unwrap();
        assert_eq!(back.defaults.php, "7.4");
        assert_eq!(back.defaults.wp, "latest");
        assert_eq!(back.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn absolute_state_dir_passes_through()
    {
        let cfg = Config { state_dir: "/tmp/wpbp-state".into(), ..Config::default() };
        assert_eq!(cfg.state_dir_path(), PathBuf::from("/tmp/wpbp-state"));
    }
}
