use std::sync::LazyLock;

use regex::Regex;

use crate::models::CalendarDate;
use crate::repository::{self, JournalError, Repository};

pub const TOC_HEADING: &str = "## 最近の日報";
pub const TOC_FOOTER: &str = "_このファイルはリンク集です。詳細は各日報を参照してください。_";

/// Heading through the first terminator, non-greedy. Group 1 is the
/// terminator, which is kept.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s){}.*?(\n---|\n_[^_\n]*_\n*\z|\z)",
        regex::escape(TOC_HEADING)
    ))
    .expect("section pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocOutcome {
    /// Master document rewritten
    Updated { entries: usize },
    /// Section already current; nothing written
    Unchanged { entries: usize },
    /// Master document absent; sync skipped
    SkippedMissingMaster,
}

/// Heading, blank line, and one link per date, ending with a newline
pub fn render_toc_body(dates: &[CalendarDate], docs_dir: &str) -> String {
    let mut lines = vec![TOC_HEADING.to_string(), String::new()];
    for date in dates {
        let [year, month, day] = date.segments();
        lines.push(format!(
            "- [{}]({}/{}/{}/{}/)",
            date, docs_dir, year, month, day
        ));
    }
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Full section as appended to a document that lacks one
pub fn render_toc_section(dates: &[CalendarDate], docs_dir: &str) -> String {
    format!("{}\n---\n\n{}", render_toc_body(dates, docs_dir), TOC_FOOTER)
}

/// Replace the existing recent-entries section in `content`, or append the
/// whole section when no heading is present.
///
/// Only the span from the heading up to its terminator (the next `---` line,
/// a trailing italic footer line, or the end of the document) is rewritten;
/// everything else is kept byte for byte.
pub fn replace_toc_section(content: &str, dates: &[CalendarDate], docs_dir: &str) -> String {
    let body = render_toc_body(dates, docs_dir);

    if let Some(caps) = SECTION_RE.captures(content) {
        if let (Some(whole), Some(terminator)) = (caps.get(0), caps.get(1)) {
            let mut updated = String::with_capacity(content.len() + body.len());
            updated.push_str(&content[..whole.start()]);
            updated.push_str(&body);
            updated.push_str(&content[terminator.start()..]);
            return updated;
        }
    }

    format!(
        "{}\n\n{}",
        content.trim_end(),
        render_toc_section(dates, docs_dir)
    )
}

/// The `limit` most recent dates, newest first
pub fn recent_dates(mut dates: Vec<CalendarDate>, limit: usize) -> Vec<CalendarDate> {
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.truncate(limit);
    dates
}

impl Repository {
    /// Rescan the entry tree and rewrite the recent-entries section.
    ///
    /// The section is derived from the entry tree, so it can be regenerated
    /// at any time; an unchanged section is not rewritten.
    ///
    /// A missing master document is not an error: the sync is skipped with
    /// a warning.
    pub fn sync_toc(&self) -> Result<TocOutcome, JournalError> {
        let master = self.master_path();
        if !master.try_exists().map_err(|e| JournalError::io(&master, e))? {
            tracing::warn!(path = %master.display(), "master document not found, skipping TOC update");
            return Ok(TocOutcome::SkippedMissingMaster);
        }

        let dates = recent_dates(self.list_entry_dates()?, self.options().toc_limit);
        let entries = dates.len();

        let content = repository::read_file(&master)?;
        let updated = replace_toc_section(&content, &dates, &self.options().docs_dir);
        if updated == content {
            tracing::debug!(path = %master.display(), entries, "TOC already current");
            return Ok(TocOutcome::Unchanged { entries });
        }

        repository::write_atomic(&master, &updated)?;
        tracing::info!(path = %master.display(), entries, "updated TOC");
        Ok(TocOutcome::Updated { entries })
    }
}
