use std::path::PathBuf;

use walkdir::WalkDir;

use crate::repository::{self, JournalError, Repository};

impl Repository {
    /// Markdown files under the docs tree whose text contains `tag` verbatim.
    ///
    /// Plain substring match, results in traversal order. No index is kept.
    pub fn search_tags(&self, tag: &str) -> Result<Vec<PathBuf>, JournalError> {
        let docs = self.docs_dir();
        if !docs.try_exists().map_err(|e| JournalError::io(&docs, e))? {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(&docs) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            if repository::read_file(path)?.contains(tag) {
                matches.push(path.to_path_buf());
            }
        }

        tracing::debug!(tag, hits = matches.len(), "tag search finished");
        Ok(matches)
    }
}
