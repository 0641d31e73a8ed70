use std::path::PathBuf;

use crate::backlink::Backlink;
use crate::models::{CalendarDate, JournalEntry};
use crate::repository::{self, JournalError, Repository};
use crate::toc::TocOutcome;

pub const BACKLINK_LABEL: &str = "**← 前回:**";
pub const TAGS_LABEL: &str = "**タグ:**";
pub const COMPLETED_HEADING: &str = "## ✅ 完了";
pub const IN_PROGRESS_HEADING: &str = "## 🔄 進行中";
pub const NOTES_HEADING: &str = "## 📝 メモ";

/// Input for [`Repository::add_entry`]
#[derive(Debug, Clone, Default)]
pub struct AddEntryRequest {
    /// Defaults to today
    pub date: Option<CalendarDate>,
    pub title: Option<String>,
    pub completed: Vec<String>,
    pub in_progress: Vec<String>,
    pub notes: String,
    pub tags: Vec<String>,
    /// Link to the nearest earlier entry
    pub continue_link: bool,
}

/// Result of writing an entry
#[derive(Debug, Clone)]
pub struct EntryWritten {
    pub path: PathBuf,
    pub entry: JournalEntry,
    pub backlink: Option<Backlink>,
    pub toc: TocOutcome,
}

/// Render an entry as markdown. Empty sections are left out entirely.
pub fn render_entry(entry: &JournalEntry) -> String {
    let mut lines: Vec<String> = vec![format!("# {}", entry.title), String::new()];

    if let Some(link) = &entry.backlink {
        lines.push(format!("{} [{}]({})", BACKLINK_LABEL, link, link));
        lines.push(String::new());
    }

    if !entry.tags().is_empty() {
        lines.push(format!("{} {}", TAGS_LABEL, entry.tags().join(" ")));
        lines.push(String::new());
    }

    push_task_section(&mut lines, COMPLETED_HEADING, &entry.completed);
    push_task_section(&mut lines, IN_PROGRESS_HEADING, &entry.in_progress);

    if !entry.notes.is_empty() {
        lines.push(NOTES_HEADING.to_string());
        lines.push(entry.notes.clone());
        lines.push(String::new());
    }

    lines.join("\n")
}

fn push_task_section(lines: &mut Vec<String>, heading: &str, tasks: &[String]) {
    if tasks.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.extend(tasks.iter().map(|task| format!("- {}", task)));
    lines.push(String::new());
}

/// Split a comma-separated task list, trimming items and dropping empties
pub fn parse_task_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|task| !task.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a whitespace-separated tag list, keeping the first of any duplicates
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split_whitespace() {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

impl Repository {
    /// Write (or overwrite) the entry file, then resync the TOC.
    ///
    /// Re-writing a date replaces the whole file; nothing is merged.
    pub fn write_entry(&self, entry: &JournalEntry) -> Result<(PathBuf, TocOutcome), JournalError> {
        let path = self.entry_path(&entry.date);
        repository::write_atomic(&path, &render_entry(entry))?;
        tracing::info!(path = %path.display(), date = %entry.date, "wrote entry");

        let toc = self.sync_toc()?;
        Ok((path, toc))
    }

    /// Build an entry from `request` and write it
    pub fn add_entry(&self, request: AddEntryRequest) -> Result<EntryWritten, JournalError> {
        let date = request.date.unwrap_or_else(CalendarDate::today);

        let backlink = if request.continue_link {
            self.find_backlink(&date)?
        } else {
            None
        };

        let title = request
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.default_title(&date));

        let mut entry = JournalEntry::new(date, title);
        entry.completed = request.completed;
        entry.in_progress = request.in_progress;
        entry.notes = request.notes;
        entry.extend_tags(request.tags);
        entry.backlink = backlink.as_ref().map(|b| b.relative_path.clone());

        let (path, toc) = self.write_entry(&entry)?;
        Ok(EntryWritten {
            path,
            entry,
            backlink,
            toc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{date, temp_repo, touch_entry};
    use std::fs;

    fn entry() -> JournalEntry {
        JournalEntry::new(date("2026-01-15"), "2026-01-15 日報".to_string())
    }

    #[test]
    fn full_entry_renders_sections_in_order() {
        let mut e = entry();
        e.backlink = Some("../14/index.md".to_string());
        e.extend_tags(["#AGI", "#開発"]);
        e.completed = vec!["タスクA".to_string(), "タスクB".to_string()];
        e.in_progress = vec!["タスクC".to_string()];
        e.notes = "line one\nline two".to_string();

        let expected = "\
# 2026-01-15 日報

**← 前回:** [../14/index.md](../14/index.md)

**タグ:** #AGI #開発

## ✅ 完了
- タスクA
- タスクB

## 🔄 進行中
- タスクC

## 📝 メモ
line one
line two
";
        assert_eq!(render_entry(&e), expected);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut e = entry();
        e.in_progress = vec!["task A".to_string()];

        let rendered = render_entry(&e);
        assert!(rendered.contains(IN_PROGRESS_HEADING));
        assert!(rendered.contains("- task A"));
        assert!(!rendered.contains(COMPLETED_HEADING));
        assert!(!rendered.contains(NOTES_HEADING));
        assert!(!rendered.contains(TAGS_LABEL));
        assert!(!rendered.contains(BACKLINK_LABEL));
    }

    #[test]
    fn title_only_entry() {
        assert_eq!(render_entry(&entry()), "# 2026-01-15 日報\n");
    }

    #[test]
    fn task_and_tag_lists_are_normalized() {
        assert_eq!(parse_task_list(" a, ,b ,, c"), vec!["a", "b", "c"]);
        assert!(parse_task_list("").is_empty());
        assert_eq!(parse_tag_list("#AGI  #dev #AGI"), vec!["#AGI", "#dev"]);
    }

    #[test]
    fn add_entry_writes_file_with_default_title_and_backlink() {
        let (_dir, repo) = temp_repo();
        touch_entry(&repo, &date("2026-01-12"));

        let written = repo
            .add_entry(AddEntryRequest {
                date: Some(date("2026-01-15")),
                completed: vec!["done".to_string()],
                continue_link: true,
                ..Default::default()
            })
            .expect("add entry");

        assert_eq!(written.path, repo.entry_path(&date("2026-01-15")));
        assert_eq!(written.backlink.map(|b| b.date), Some(date("2026-01-12")));
        let text = fs::read_to_string(&written.path).expect("read entry");
        assert!(text.starts_with("# 2026-01-15 日報\n"));
        assert!(text.contains("[../12/index.md](../12/index.md)"));
        assert!(text.contains("- done"));
    }

    #[test]
    fn add_entry_without_continue_has_no_backlink() {
        let (_dir, repo) = temp_repo();
        touch_entry(&repo, &date("2026-01-14"));

        let written = repo
            .add_entry(AddEntryRequest {
                date: Some(date("2026-01-15")),
                title: Some("My day".to_string()),
                ..Default::default()
            })
            .expect("add entry");

        let text = fs::read_to_string(&written.path).expect("read entry");
        assert_eq!(text, "# My day\n");
        assert!(written.backlink.is_none());
    }

    #[test]
    fn rewriting_a_date_overwrites_previous_content() {
        let (_dir, repo) = temp_repo();
        let d = date("2026-01-15");
        let request = |notes: &str| AddEntryRequest {
            date: Some(d),
            notes: notes.to_string(),
            ..Default::default()
        };

        repo.add_entry(request("first")).expect("first write");
        let written = repo.add_entry(request("second")).expect("second write");

        let text = fs::read_to_string(&written.path).expect("read entry");
        assert!(text.contains("second"));
        assert!(!text.contains("first"));
    }

    #[test]
    fn writing_an_entry_refreshes_the_toc() {
        let (_dir, repo) = temp_repo();
        fs::write(repo.master_path(), "# Memory\n").expect("write master");

        let written = repo
            .add_entry(AddEntryRequest {
                date: Some(date("2026-01-15")),
                ..Default::default()
            })
            .expect("add entry");

        assert!(matches!(written.toc, TocOutcome::Updated { entries: 1 }));
        let master = fs::read_to_string(repo.master_path()).expect("read master");
        assert!(master.contains("- [2026-01-15](docs/2026/01/15/)"));
    }
}
