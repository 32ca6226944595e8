use std::path::PathBuf;

/// A file found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
}

impl FileEntry {
    pub fn display_name(&self) -> String {
        self.relative_path.to_string_lossy().to_string()
    }
}
