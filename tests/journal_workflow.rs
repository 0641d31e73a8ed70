use std::fs;

use daily_memory::{
    AddEntryRequest, CalendarDate, JournalError, Repository, RepositoryOptions, TocOutcome,
};

fn date(s: &str) -> CalendarDate {
    CalendarDate::parse(s).expect("valid date")
}

fn repo_with_master() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().expect("temp journal root");
    fs::write(
        dir.path().join("MEMORY.md"),
        "# MEMORY\n\n## 方針\n- 毎日書く\n",
    )
    .expect("write master");
    let repo = Repository::new(RepositoryOptions::with_root(dir.path()));
    (dir, repo)
}

fn add(repo: &Repository, day: &str, continue_link: bool) {
    repo.add_entry(AddEntryRequest {
        date: Some(date(day)),
        completed: vec![format!("work on {}", day)],
        tags: vec!["#daily".to_string()],
        continue_link,
        ..Default::default()
    })
    .expect("add entry");
}

#[test]
fn a_week_of_entries_with_topics_and_search() {
    let (_dir, repo) = repo_with_master();

    add(&repo, "2026-01-12", false);
    add(&repo, "2026-01-13", true);
    add(&repo, "2026-01-15", true);

    let latest = fs::read_to_string(repo.entry_path(&date("2026-01-15"))).expect("read entry");
    assert!(latest.contains("**← 前回:** [../13/index.md](../13/index.md)"));

    let attached = repo
        .attach_topic(&date("2026-01-15"), "X API 開発", "OAuth認証を実装 #AGI")
        .expect("attach topic");
    assert!(attached.path.ends_with("2026/01/15/x-api.md"));

    let hits = repo.search_tags("#AGI").expect("search");
    assert_eq!(hits, vec![attached.path.clone()]);

    let mut daily = repo.search_tags("#daily").expect("search");
    daily.sort();
    assert_eq!(daily.len(), 3);

    let master = fs::read_to_string(repo.master_path()).expect("read master");
    assert!(master.starts_with("# MEMORY\n\n## 方針\n- 毎日書く\n\n## 最近の日報\n\n"));
    let listed: Vec<&str> = master
        .lines()
        .filter(|line| line.starts_with("- [2026"))
        .collect();
    assert_eq!(
        listed,
        vec![
            "- [2026-01-15](docs/2026/01/15/)",
            "- [2026-01-13](docs/2026/01/13/)",
            "- [2026-01-12](docs/2026/01/12/)",
        ]
    );
    assert!(master.trim_end().ends_with("_このファイルはリンク集です。詳細は各日報を参照してください。_"));
}

#[test]
fn toc_sync_after_entry_writes_is_stable() {
    let (_dir, repo) = repo_with_master();
    for day in 1..=15 {
        add(&repo, &format!("2026-01-{:02}", day), true);
    }

    let before = fs::read_to_string(repo.master_path()).expect("read master");
    assert_eq!(repo.sync_toc().expect("sync"), TocOutcome::Unchanged { entries: 10 });
    let after = fs::read_to_string(repo.master_path()).expect("read master");
    assert_eq!(before, after);
    assert_eq!(after.matches("## 最近の日報").count(), 1);
    assert_eq!(after.matches("\n---\n").count(), 1);
}

#[test]
fn backlink_gap_longer_than_window_is_dropped() {
    let (_dir, repo) = repo_with_master();
    add(&repo, "2025-11-01", false);

    let written = repo
        .add_entry(AddEntryRequest {
            date: Some(date("2026-01-15")),
            continue_link: true,
            ..Default::default()
        })
        .expect("add entry");

    assert!(written.backlink.is_none());
    let text = fs::read_to_string(&written.path).expect("read entry");
    assert!(!text.contains("前回"));
}

#[test]
fn topics_need_an_existing_day() {
    let (_dir, repo) = repo_with_master();
    let err = repo
        .attach_topic(&date("2026-01-15"), "orphan", "body")
        .expect_err("missing entry");
    assert!(matches!(err, JournalError::MissingEntry(_)));
}

#[test]
fn custom_layout_is_respected() {
    let dir = tempfile::tempdir().expect("temp journal root");
    let mut options = RepositoryOptions::with_root(dir.path());
    options.docs_dir = "journal".to_string();
    options.master_file = "INDEX.md".to_string();
    options.toc_limit = 2;
    options.title_template = "Log for {date}".to_string();
    fs::write(dir.path().join("INDEX.md"), "# Index\n").expect("write master");
    let repo = Repository::new(options);

    for day in ["2026-01-01", "2026-01-02", "2026-01-03"] {
        add(&repo, day, false);
    }

    let entry = fs::read_to_string(dir.path().join("journal/2026/01/03/index.md")).expect("read");
    assert!(entry.starts_with("# Log for 2026-01-03\n"));

    let index = fs::read_to_string(dir.path().join("INDEX.md")).expect("read master");
    assert!(index.contains("- [2026-01-03](journal/2026/01/03/)"));
    assert!(index.contains("- [2026-01-02](journal/2026/01/02/)"));
    assert!(!index.contains("2026-01-01"));
}
