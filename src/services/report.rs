use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryFailure {
    pub msgid: String,
    pub line_number: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Language directory name, e.g. `pt_BR`.
    pub lang: String,
    pub target_lang: String,
    pub translated: usize,
    pub failed: usize,
    /// Messages that need translation; only counted on dry runs.
    pub pending: usize,
    pub saved: bool,
    pub error: Option<String>,
    pub failures: Vec<EntryFailure>,
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub translated: usize,
    pub failed: usize,
    pub pending: usize,
    pub saved: usize,
    pub file_errors: usize,
}

impl RunReport {
    pub fn push(&mut self, file: FileReport) {
        self.translated += file.translated;
        self.failed += file.failed;
        self.pending += file.pending;
        if file.saved {
            self.saved += 1;
        }
        if file.error.is_some() {
            self.file_errors += 1;
        }
        self.files.push(file);
    }

    pub fn has_file_errors(&self) -> bool {
        self.file_errors > 0
    }
}
