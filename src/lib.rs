pub mod backlink;
pub mod cli;
pub mod config;
pub mod entry;
pub mod models;
pub mod publish;
pub mod repository;
pub mod search;
pub mod toc;
pub mod topic;
pub mod utils;

pub use backlink::Backlink;
pub use config::Config;
pub use entry::{AddEntryRequest, EntryWritten, render_entry};
pub use models::{CalendarDate, JournalEntry, Topic, TopicLinkMode};
pub use publish::{GitPublisher, PublishOutcome, Publisher};
pub use repository::{JournalError, Repository, RepositoryOptions};
pub use toc::TocOutcome;
pub use topic::{TopicAttached, sanitize_slug};
pub use utils::Profile;
