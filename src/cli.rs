use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::form::{FormState, LandingPage, PluginSource};
use crate::core::prefill::Prefill;
use crate::core::snapshot::SnapshotStore;
use crate::infra::config::Config;
use crate::infra::prompt::Prompt;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
    pub yes: bool,      // global --yes
    pub restore: RestorePolicy,
    pub config: Config,
}

impl AppContext {
    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.config.state_dir_path(), self.config.storage_key.clone())
    }

    /// Answers the startup "restore previous edits?" question.
    pub fn restore_confirm(&self) -> Prompt {
        match self.restore {
            RestorePolicy::Always => Prompt::Fixed(true),
            RestorePolicy::Never => Prompt::Fixed(false),
            RestorePolicy::Ask => Prompt::Interactive { fallback: true },
        }
    }

    /// Answers the "discard manual edits?" question.
    pub fn reset_confirm(&self) -> Prompt {
        if self.yes {
            Prompt::Fixed(true)
        } else {
            Prompt::Interactive { fallback: false }
        }
    }
}

#[derive(Parser)]
#[command(name = "wpbp")]
#[command(about = "Generate WordPress Playground blueprints and launch URLs")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to the reset confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// How to answer the prompt to restore a saved manual blueprint
    #[arg(long, global = true, value_enum, default_value_t = RestorePolicy::Ask)]
    pub restore: RestorePolicy,

    /// Directory holding the blueprint snapshot (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RestorePolicy {
    /// Prompt on a terminal; restore when not interactive
    Ask,
    /// Restore without asking
    Always,
    /// Discard the saved blueprint
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the blueprint derived from the given options
    Build(BuildArgs),

    /// Print the Playground launch URL for the active blueprint
    Url(UrlArgs),

    /// Show the active blueprint, its mode and launch URL
    Preview(PreviewArgs),

    /// Replace the blueprint with manually edited JSON
    Edit(EditArgs),

    /// Discard manual edits and go back to the generated blueprint
    Reset,

    /// Show the stored blueprint snapshot
    Status(StatusArgs),

    /// Decode a launch URL or fragment back into blueprint JSON
    Decode(DecodeArgs),

    /// Initialize a wpblueprint.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// WordPress.org plugin directory slug
    Wporg,
    /// GitHub repository
    Github,
    /// Zip URL served by a GitHub proxy
    Proxy,
}

impl From<SourceArg> for PluginSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Wporg => PluginSource::WordPressOrg,
            SourceArg::Github => PluginSource::GitHub,
            SourceArg::Proxy => PluginSource::Proxy,
        }
    }
}

/// Blueprint options. Unset options fall back to the config defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// PHP version (e.g. 8.3)
    #[arg(long)]
    pub php: Option<String>,

    /// WordPress version (e.g. 6.5, latest)
    #[arg(long)]
    pub wp: Option<String>,

    /// Landing page path (e.g. /wp-admin/plugins.php)
    #[arg(long)]
    pub landing: Option<String>,

    /// Enable network access inside Playground
    #[arg(long, action = clap::ArgAction::Set, value_name = "BOOL")]
    pub networking: Option<bool>,

    /// Log in automatically as admin/password (insecure, for throwaway sites)
    #[arg(long, action = clap::ArgAction::Set, value_name = "BOOL")]
    pub auto_login: Option<bool>,

    /// Site language (e.g. zh_TW)
    #[arg(long)]
    pub language: Option<String>,

    /// Set the site timezone (fixed to Asia/Taipei, UTC+8)
    #[arg(long)]
    pub timezone: bool,

    /// Enable WP_DEBUG
    #[arg(long)]
    pub debug: bool,

    /// Enable WP_DEBUG_LOG (needs --debug)
    #[arg(long)]
    pub debug_log: bool,

    /// Enable WP_DEBUG_DISPLAY (needs --debug)
    #[arg(long)]
    pub debug_display: bool,

    /// Enable SCRIPT_DEBUG (needs --debug)
    #[arg(long)]
    pub script_debug: bool,

    /// Enable SAVEQUERIES (needs --debug)
    #[arg(long)]
    pub save_queries: bool,

    /// Active plugin source; inferred from the plugin flag given if omitted
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// WordPress.org plugin slug
    #[arg(long)]
    pub slug: Option<String>,

    /// GitHub repository (owner/repo or https URL)
    #[arg(long)]
    pub github_repo: Option<String>,

    /// Branch or ref (defaults to refs/heads/main)
    #[arg(long)]
    pub github_ref: Option<String>,

    /// GitHub proxy zip URL
    #[arg(long)]
    pub proxy_url: Option<String>,

    /// Share-link query string to pre-fill from (e.g. "php=8.2&plugin=akismet")
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,
}

impl FormArgs {
    pub fn prefill(&self) -> Option<Prefill> {
        self.query
            .as_deref()
            .map(Prefill::from_query)
    }

    /// Config defaults, then query prefill, then explicit flags.
    pub fn resolve(&self, config: &Config) -> FormState {
        let mut form = config.defaults.to_form();

        if let Some(prefill) = self.prefill() {
            prefill.apply(&mut form);
        }

        if let Some(php) = &self.php {
            form.php_version = php.clone();
        }
        if let Some(wp) = &self.wp {
            form.wp_version = wp.clone();
        }
        if let Some(landing) = &self.landing {
            form.landing = LandingPage::from_path(landing);
        }
        if let Some(networking) = self.networking {
            form.networking = networking;
        }
        if let Some(auto_login) = self.auto_login {
            form.auto_login = auto_login;
        }
        if let Some(language) = &self.language {
            form.language = language.clone();
        }
        form.set_timezone |= self.timezone;

        form.debug.enabled |= self.debug;
        form.debug.log |= self.debug_log;
        form.debug.display |= self.debug_display;
        form.debug.script_debug |= self.script_debug;
        form.debug.save_queries |= self.save_queries;

        if let Some(slug) = &self.slug {
            form.plugin.slug = slug.clone();
            form.plugin.source = PluginSource::WordPressOrg;
        }
        if let Some(repo) = &self.github_repo {
            form.plugin.github_repo = repo.clone();
            form.plugin.source = PluginSource::GitHub;
        }
        if let Some(git_ref) = &self.github_ref {
            form.plugin.github_ref = git_ref.clone();
        }
        if let Some(url) = &self.proxy_url {
            form.plugin.proxy_url = url.clone();
            form.plugin.source = PluginSource::Proxy;
        }
        if let Some(source) = self.source {
            form.plugin.source = source.into();
        }

        form
    }
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Print single-line JSON instead of indented
    #[arg(long)]
    pub compact: bool,

    /// Write the blueprint to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy result to clipboard
    #[arg(long)]
    pub clipboard: bool,
}

#[derive(Parser, Debug)]
pub struct UrlArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Copy result to clipboard
    #[arg(long)]
    pub clipboard: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Copy the blueprint JSON to clipboard
    #[arg(long)]
    pub clipboard: bool,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// File with the edited blueprint; reads stdin when omitted or `-`
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Launch URL or bare base64 fragment
    pub input: String,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::parse_from(argv)
    }

    #[test]
    fn build_flags_resolve_into_form() {
        let cli = parse(&[
            "wpbp", "build", "--php", "8.1", "--debug", "--debug-log", "--github-repo", "acme/widgets",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        let form = args.form.resolve(&Config::default());
        assert_eq!(form.php_version, "8.1");
        assert!(form.debug.enabled && form.debug.log);
        assert_eq!(form.plugin.source, PluginSource::GitHub);
        assert_eq!(form.plugin.github_repo, "acme/widgets");
    }

    #[test]
    fn explicit_source_beats_inference() {
        let args = FormArgs {
            slug: Some("akismet".into()),
            source: Some(SourceArg::Proxy),
            ..FormArgs::default()
        };
        assert_eq!(args.resolve(&Config::default()).plugin.source, PluginSource::Proxy);
    }

    #[test]
    fn flags_override_query_prefill() {
        let args = FormArgs {
            query: Some("php=7.4&wp=6.0".into()),
            php: Some("8.2".into()),
            ..FormArgs::default()
        };
        let form = args.resolve(&Config::default());
        assert_eq!(form.php_version, "8.2");
        assert_eq!(form.wp_version, "6.0");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["wpbp", "reset", "--yes", "--state-dir", "/tmp/x", "--restore", "never"]);
        assert!(cli.yes);
        assert_eq!(cli.restore, RestorePolicy::Never);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/x")));
    }
}
