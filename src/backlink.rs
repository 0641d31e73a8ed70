use crate::models::CalendarDate;
use crate::repository::{ENTRY_FILE, JournalError, Repository};

/// Link from a new entry to the nearest earlier one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backlink {
    pub date: CalendarDate,
    /// `index.md` of `date`, relative to the new entry's directory
    pub relative_path: String,
}

impl Repository {
    /// Nearest earlier entry within the configured window
    pub fn find_backlink(&self, date: &CalendarDate) -> Result<Option<Backlink>, JournalError> {
        self.find_backlink_within(date, self.options().backlink_window_days)
    }

    /// Walk backwards one day at a time, checking `date - 1` through
    /// `date - window`. Gaps longer than the window yield `None`.
    pub fn find_backlink_within(
        &self,
        date: &CalendarDate,
        window: u32,
    ) -> Result<Option<Backlink>, JournalError> {
        for offset in 1..=i64::from(window) {
            let Some(candidate) = date.offset_by_days(-offset) else {
                break;
            };
            if self.entry_file_exists(&candidate)? {
                tracing::debug!(%date, found = %candidate, "resolved backlink");
                return Ok(Some(Backlink {
                    date: candidate,
                    relative_path: relative_entry_link(date, &candidate),
                }));
            }
        }
        tracing::debug!(%date, window, "no backlink within window");
        Ok(None)
    }
}

/// Path from `from`'s day directory to `to`'s entry file, using `/`
/// separators so the markdown link survives moving the repository.
pub fn relative_entry_link(from: &CalendarDate, to: &CalendarDate) -> String {
    let from_segments = from.segments();
    let to_segments = to.segments();
    let common = from_segments
        .iter()
        .zip(to_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat_n("..", from_segments.len() - common));
    parts.extend(to_segments[common..].iter().map(String::as_str));
    parts.push(ENTRY_FILE);
    parts.join("/")
}
