use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::ConfigError;
use crate::entry::{AddEntryRequest, EntryWritten, parse_tag_list, parse_task_list};
use crate::models::CalendarDate;
use crate::publish::{self, PublishError, PublishOutcome, Publisher};
use crate::repository::{JournalError, Repository};
use crate::toc::TocOutcome;
use crate::topic::TopicAttached;

#[derive(Parser)]
#[command(name = "daily-memory")]
#[command(about = "Daily Memory - date-partitioned markdown journal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Journal repository root (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Use development mode (uses a separate dev config)
    #[arg(long, global = true)]
    pub dev: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the day's entry (overwrites an existing one)
    Add {
        /// Completed tasks (comma-separated)
        #[arg(short, long, default_value = "")]
        completed: String,
        /// In-progress tasks (comma-separated)
        #[arg(short, long, default_value = "")]
        in_progress: String,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Tags (space-separated)
        #[arg(short, long, default_value = "")]
        tags: String,
        /// Link to the previous entry
        #[arg(short = 'C', long = "continue")]
        continue_link: bool,
        /// Entry title
        #[arg(long)]
        title: Option<String>,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Attach a topic page to an existing entry
    AddTopic {
        /// Topic name
        topic: String,
        /// Topic body
        #[arg(short, long)]
        content: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Regenerate the recent-entries section of the master document
    UpdateToc,
    /// List markdown files containing a tag
    SearchTags {
        /// Tag to search for, matched literally
        tag: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the most recent entry (today or yesterday)
    Latest,
    /// Print the directory for a date
    Path {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Commit and push the repository
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Journal error: {0}")]
    JournalError(#[from] JournalError),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Publish error: {0}")]
    PublishError(#[from] PublishError),
    #[error("Failed to serialize output: {0}")]
    OutputError(#[from] serde_json::Error),
}

/// Resolve an optional `YYYY-MM-DD` argument, defaulting to today
pub fn resolve_date(date: Option<&str>) -> Result<CalendarDate, CliError> {
    match date {
        Some(raw) => Ok(CalendarDate::parse(raw)?),
        None => Ok(CalendarDate::today()),
    }
}

/// Handle the add command
#[allow(clippy::too_many_arguments)]
pub fn handle_add(
    completed: String,
    in_progress: String,
    notes: String,
    tags: String,
    continue_link: bool,
    title: Option<String>,
    date: Option<String>,
    repo: &Repository,
) -> Result<EntryWritten, CliError> {
    // Reject a bad date before touching the filesystem
    let date = resolve_date(date.as_deref())?;

    let request = AddEntryRequest {
        date: Some(date),
        title,
        completed: parse_task_list(&completed),
        in_progress: parse_task_list(&in_progress),
        notes,
        tags: parse_tag_list(&tags),
        continue_link,
    };

    let written = repo.add_entry(request)?;
    println!("✅ Created: {}", written.path.display());
    if let Some(backlink) = &written.backlink {
        println!("   ← linked to {}", backlink.date);
    } else if continue_link {
        println!("   No previous entry within {} days", repo.options().backlink_window_days);
    }
    print_toc_outcome(repo, &written.toc);

    Ok(written)
}

/// Handle the add-topic command
pub fn handle_add_topic(
    topic: String,
    content: String,
    date: Option<String>,
    repo: &Repository,
) -> Result<TopicAttached, CliError> {
    let date = resolve_date(date.as_deref())?;

    let attached = repo.attach_topic(&date, &topic, &content)?;
    println!("✅ Created: {}", attached.path.display());
    if attached.linked {
        println!("✅ Updated: {}", repo.entry_path(&date).display());
    }

    Ok(attached)
}

/// Handle the update-toc command
pub fn handle_update_toc(repo: &Repository) -> Result<TocOutcome, CliError> {
    let outcome = repo.sync_toc()?;
    print_toc_outcome(repo, &outcome);
    Ok(outcome)
}

fn print_toc_outcome(repo: &Repository, outcome: &TocOutcome) {
    match outcome {
        TocOutcome::Updated { .. } => println!("✅ Updated TOC: {}", repo.master_path().display()),
        TocOutcome::Unchanged { .. } => println!("TOC already up to date"),
        TocOutcome::SkippedMissingMaster => println!(
            "⚠️ {} not found, skipping TOC update",
            repo.master_path().display()
        ),
    }
}

/// Handle the search-tags command
pub fn handle_search_tags(tag: String, json: bool, repo: &Repository) -> Result<Vec<PathBuf>, CliError> {
    let results = repo.search_tags(&tag)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No files found with tag {}", tag);
    } else {
        println!("Found {} files with tag {}:", results.len(), tag);
        for path in &results {
            println!("  - {}", path.display());
        }
    }

    Ok(results)
}

/// Handle the latest command
pub fn handle_latest(repo: &Repository) -> Result<Option<CalendarDate>, CliError> {
    let latest = repo.latest_entry(CalendarDate::today())?;
    match latest {
        Some(date) => println!("{} {}", date, repo.entry_path(&date).display()),
        None => println!("No entry for today or yesterday"),
    }
    Ok(latest)
}

/// Handle the path command
pub fn handle_path(date: Option<String>, repo: &Repository) -> Result<PathBuf, CliError> {
    let date = resolve_date(date.as_deref())?;
    let path = repo.path_for(&date);
    println!("{}", path.display());
    Ok(path)
}

/// Handle the commit command
pub fn handle_commit(
    message: Option<String>,
    repo: &Repository,
    publisher: &dyn Publisher,
) -> Result<PublishOutcome, CliError> {
    let message = message.unwrap_or_else(|| publish::commit_message(&CalendarDate::today()));

    let outcome = publisher.publish(repo.root(), &message)?;
    match outcome {
        PublishOutcome::Published => println!("✅ Committed and pushed: {}", message),
        PublishOutcome::NothingToCommit => println!("No changes to commit"),
    }

    Ok(outcome)
}
