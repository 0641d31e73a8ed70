use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::repository::JournalError;

/// A calendar day, rendered as zero-padded `YYYY`/`MM`/`DD` path segments.
///
/// Ordering is chronological, which coincides with the lexicographic order of
/// the zero-padded segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a date from numeric year/month/day values
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in the local timezone
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parse a `YYYY-MM-DD` string
    pub fn parse(input: &str) -> Result<Self, JournalError> {
        crate::utils::parse_date(input.trim())
            .map(Self)
            .map_err(|_| JournalError::InvalidDate(input.to_string()))
    }

    /// Inverse of the directory mapping. Only canonical zero-padded,
    /// fully numeric segments that form a real date are accepted.
    pub fn from_segments(year: &str, month: &str, day: &str) -> Option<Self> {
        let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !(numeric(year) && numeric(month) && numeric(day)) {
            return None;
        }
        let date = Self::from_ymd(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
        let [y, m, d] = date.segments();
        (y == year && m == month && d == day).then_some(date)
    }

    /// Shift by a signed number of days; `None` if the result leaves chrono's range
    pub fn offset_by_days(&self, days: i64) -> Option<Self> {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Self)
    }

    pub fn year(&self) -> String {
        format!("{:04}", self.0.year())
    }

    pub fn month(&self) -> String {
        format!("{:02}", self.0.month())
    }

    pub fn day(&self) -> String {
        format!("{:02}", self.0.day())
    }

    /// The `[year, month, day]` directory segments
    pub fn segments(&self) -> [String; 3] {
        [self.year(), self.month(), self.day()]
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year(), self.month(), self.day())
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = JournalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// One day's journal entry, rendered to `index.md`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub date: CalendarDate,
    pub title: String,
    pub completed: Vec<String>,
    pub in_progress: Vec<String>,
    pub notes: String,
    /// Relative link to the previous entry's `index.md`
    pub backlink: Option<String>,
    tags: Vec<String>,
}

impl JournalEntry {
    pub fn new(date: CalendarDate, title: String) -> Self {
        Self {
            date,
            title,
            completed: Vec::new(),
            in_progress: Vec::new(),
            notes: String::new(),
            backlink: None,
            tags: Vec::new(),
        }
    }

    /// Add a tag unless it is already present
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn extend_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A detail page attached to an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub date: CalendarDate,
    pub name: String,
    pub slug: String,
    pub body: String,
}

impl Topic {
    pub fn new(date: CalendarDate, name: impl Into<String>, body: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            date,
            slug: crate::topic::sanitize_slug(&name),
            name,
            body: body.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }
}

/// How the topic attacher treats an existing link line for the same topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicLinkMode {
    /// Always append a new link line, even if one already exists
    #[default]
    AppendAlways,
    /// Skip the link line when an identical one is already present
    AppendIfAbsent,
}
