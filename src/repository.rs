use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;
use crate::models::{CalendarDate, TopicLinkMode};

/// File name of the canonical entry inside a day directory
pub const ENTRY_FILE: &str = "index.md";

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("No entry for {0}")]
    MissingEntry(CalendarDate),
    #[error("Topic name '{0}' would overwrite the day's entry file")]
    ReservedTopicName(String),
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to walk journal tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl JournalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        JournalError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Runtime settings for a journal repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOptions {
    pub root: PathBuf,
    pub docs_dir: String,
    pub master_file: String,
    pub backlink_window_days: u32,
    pub toc_limit: usize,
    pub title_template: String,
    pub topic_link_mode: TopicLinkMode,
}

impl RepositoryOptions {
    /// Default options rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Config::default().repository_options()
        }
    }
}

/// A journal stored as `<root>/<docs>/<YYYY>/<MM>/<DD>/index.md`.
///
/// The root is always passed in; nothing here reads process-wide state.
/// Operations are blocking and assume a single writer.
#[derive(Debug, Clone)]
pub struct Repository {
    options: RepositoryOptions,
}

impl Repository {
    pub fn new(options: RepositoryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    pub fn root(&self) -> &Path {
        &self.options.root
    }

    /// Directory holding the year/month/day tree
    pub fn docs_dir(&self) -> PathBuf {
        self.options.root.join(&self.options.docs_dir)
    }

    /// Master document carrying the recent-entries section
    pub fn master_path(&self) -> PathBuf {
        self.options.root.join(&self.options.master_file)
    }

    /// Directory for a date. Pure; touches no files.
    pub fn path_for(&self, date: &CalendarDate) -> PathBuf {
        let [year, month, day] = date.segments();
        self.docs_dir().join(year).join(month).join(day)
    }

    pub fn entry_path(&self, date: &CalendarDate) -> PathBuf {
        self.path_for(date).join(ENTRY_FILE)
    }

    /// Whether the canonical entry file exists for `date`
    pub fn entry_file_exists(&self, date: &CalendarDate) -> Result<bool, JournalError> {
        let path = self.entry_path(date);
        path.try_exists().map_err(|e| JournalError::io(path, e))
    }

    /// Title used when the caller supplies none
    pub fn default_title(&self, date: &CalendarDate) -> String {
        self.options
            .title_template
            .replace("{date}", &date.to_string())
    }

    /// Every date with an entry file, in no particular order.
    ///
    /// Only canonical numeric `YYYY/MM/DD` directories are considered; a
    /// missing docs directory means an empty journal.
    pub fn list_entry_dates(&self) -> Result<Vec<CalendarDate>, JournalError> {
        let docs = self.docs_dir();
        let mut dates = Vec::new();
        for year in numeric_subdirs(&docs)? {
            for month in numeric_subdirs(&docs.join(&year))? {
                for day in numeric_subdirs(&docs.join(&year).join(&month))? {
                    let Some(date) = CalendarDate::from_segments(&year, &month, &day) else {
                        tracing::debug!(year = %year, month = %month, day = %day, "skipping non-date directory");
                        continue;
                    };
                    if self.entry_file_exists(&date)? {
                        dates.push(date);
                    }
                }
            }
        }
        Ok(dates)
    }

    /// Today's entry if it exists, otherwise yesterday's
    pub fn latest_entry(&self, today: CalendarDate) -> Result<Option<CalendarDate>, JournalError> {
        if self.entry_file_exists(&today)? {
            return Ok(Some(today));
        }
        match today.offset_by_days(-1) {
            Some(yesterday) if self.entry_file_exists(&yesterday)? => Ok(Some(yesterday)),
            _ => Ok(None),
        }
    }
}

/// Names of the fully numeric subdirectories of `dir`
fn numeric_subdirs(dir: &Path) -> Result<Vec<String>, JournalError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(JournalError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| JournalError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| JournalError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            names.push(name);
        }
    }
    Ok(names)
}

pub(crate) fn read_file(path: &Path) -> Result<String, JournalError> {
    fs::read_to_string(path).map_err(|e| JournalError::io(path, e))
}

/// Write via a sibling temp file and rename so readers never see a partial file
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), JournalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| JournalError::io(parent, e))?;
    }
    let tmp = path.with_extension("md.tmp");
    fs::write(&tmp, contents).map_err(|e| JournalError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| JournalError::io(path, e))
}
