use clap::Parser;
use color_eyre::Result;
use daily_memory::{
    Config, GitPublisher, Profile, Repository,
    cli::{self, Cli, Commands},
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(Path::new(path))?,
        None => Config::load_with_profile(profile)?,
    };

    let mut options = config.repository_options();
    if let Some(root) = &cli.root {
        options.root = daily_memory::utils::expand_path(root);
    }
    tracing::debug!(root = %options.root.display(), "using journal repository");
    let repo = Repository::new(options);

    match cli.command {
        Commands::Add {
            completed,
            in_progress,
            notes,
            tags,
            continue_link,
            title,
            date,
        } => {
            cli::handle_add(completed, in_progress, notes, tags, continue_link, title, date, &repo)?;
        }
        Commands::AddTopic { topic, content, date } => {
            cli::handle_add_topic(topic, content, date, &repo)?;
        }
        Commands::UpdateToc => {
            cli::handle_update_toc(&repo)?;
        }
        Commands::SearchTags { tag, json } => {
            cli::handle_search_tags(tag, json, &repo)?;
        }
        Commands::Latest => {
            cli::handle_latest(&repo)?;
        }
        Commands::Path { date } => {
            cli::handle_path(date, &repo)?;
        }
        Commands::Commit { message } => {
            cli::handle_commit(message, &repo, &GitPublisher::new())?;
        }
    }

    Ok(())
}

/// Stderr logging; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
