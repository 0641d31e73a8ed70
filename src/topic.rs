use std::path::PathBuf;

use crate::models::{CalendarDate, Topic, TopicLinkMode};
use crate::repository::{self, ENTRY_FILE, JournalError, Repository};

/// Heading under which topic links are collected in the owning entry
pub const DETAILS_HEADING: &str = "## 詳細";

/// Slug used when a name has no usable characters
pub const DEFAULT_SLUG: &str = "topic";

/// Result of attaching a topic
#[derive(Debug, Clone)]
pub struct TopicAttached {
    pub topic: Topic,
    pub path: PathBuf,
    /// Whether a link line was appended to the entry's `index.md`
    pub linked: bool,
}

/// Lowercase `name` and reduce it to `[a-z0-9-]`, collapsing runs of other
/// characters into one hyphen and trimming hyphens at both ends.
pub fn sanitize_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() { ch } else { '-' };
        if ch == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(ch);
    }

    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn render_topic(topic: &Topic) -> String {
    format!("# {}\n\n{}\n", topic.name, topic.body)
}

fn link_line(topic: &Topic) -> String {
    format!("- [{}]({})\n", topic.name, topic.file_name())
}

/// Append the details heading (if missing) and the topic link to `content`.
/// Returns `None` when the link is skipped.
fn append_topic_link(content: &str, topic: &Topic, mode: TopicLinkMode) -> Option<String> {
    let line = link_line(topic);
    if mode == TopicLinkMode::AppendIfAbsent && content.contains(&line) {
        return None;
    }

    let mut updated = content.to_string();
    if !updated.contains(DETAILS_HEADING) {
        updated.push_str(&format!("\n{}\n\n", DETAILS_HEADING));
    }
    updated.push_str(&line);
    Some(updated)
}

impl Repository {
    /// Write a topic page under an existing day and link it from the entry.
    ///
    /// The day directory must already exist, and a name whose slug is the
    /// entry file's own stem is refused. With the default link mode a
    /// repeated name appends another link line rather than updating one.
    pub fn attach_topic(
        &self,
        date: &CalendarDate,
        name: &str,
        body: &str,
    ) -> Result<TopicAttached, JournalError> {
        let dir = self.path_for(date);
        if !dir.try_exists().map_err(|e| JournalError::io(&dir, e))? {
            tracing::warn!(path = %dir.display(), "no entry directory for topic");
            return Err(JournalError::MissingEntry(*date));
        }

        let topic = Topic::new(*date, name, body);
        if topic.file_name() == ENTRY_FILE {
            return Err(JournalError::ReservedTopicName(topic.name));
        }
        let path = dir.join(topic.file_name());
        repository::write_atomic(&path, &render_topic(&topic))?;
        tracing::info!(path = %path.display(), slug = %topic.slug, "wrote topic");

        let entry_path = self.entry_path(date);
        let mut linked = false;
        if self.entry_file_exists(date)? {
            let content = repository::read_file(&entry_path)?;
            match append_topic_link(&content, &topic, self.options().topic_link_mode) {
                Some(updated) => {
                    repository::write_atomic(&entry_path, &updated)?;
                    tracing::info!(path = %entry_path.display(), "linked topic from entry");
                    linked = true;
                }
                None => {
                    tracing::debug!(path = %entry_path.display(), "topic link already present");
                }
            }
        } else {
            tracing::warn!(path = %entry_path.display(), "entry file missing; topic left unlinked");
        }

        Ok(TopicAttached {
            topic,
            path,
            linked,
        })
    }
}
