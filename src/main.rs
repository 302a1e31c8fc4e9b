use anyhow::Result;
use clap::Parser;
use wpblueprint::cli::{AppContext, Cli, Commands};
use wpblueprint::infra::{load_config, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut config = load_config().unwrap_or_else(|e| {
        tracing::warn!("{e:#}; using default configuration");
        Default::default()
    });
    if let Some(dir) = &cli.state_dir {
        config.state_dir = dir.to_string_lossy().into_owned();
    }

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
        yes: cli.yes,
        restore: cli.restore,
        config,
    };

    match cli.command {
        Commands::Build(args) => wpblueprint::core::build_run(args, &ctx),
        Commands::Url(args) => wpblueprint::core::session::url_run(args, &ctx),
        Commands::Preview(args) => wpblueprint::core::session::preview_run(args, &ctx),
        Commands::Edit(args) => wpblueprint::core::session::edit_run(args, &ctx),
        Commands::Reset => wpblueprint::core::session::reset_run(&ctx),
        Commands::Status(args) => wpblueprint::core::session::status_run(args, &ctx),
        Commands::Decode(args) => wpblueprint::core::session::decode_run(args, &ctx),
        Commands::Init(args) => wpblueprint::infra::config::init(args, &ctx),
        Commands::Completions(args) => wpblueprint::completion::run(args, &ctx),
    }
}
