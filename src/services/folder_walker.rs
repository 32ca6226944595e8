use std::fs;
use std::path::{Path, PathBuf};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::{DirEntry, WalkBuilder};
use crate::errors::{FlatGemError, FlatGemResult};
use crate::structs::file_entry::FileEntry;

pub struct FolderWalker {
    root: PathBuf,
    recursive: bool,
    exclude_patterns: Vec<String>,
}

impl FolderWalker {
    pub fn new(root: &Path, recursive: bool, exclude_patterns: Vec<String>) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
            exclude_patterns,
        }
    }

    /// Regular files under the root, sorted by relative path. Symlinked folders are not entered.
    pub fn collect_files(&self) -> FlatGemResult<Vec<FileEntry>> {
        fs::read_dir(&self.root).map_err(|e| {
            FlatGemError::file_error(&self.root.to_string_lossy(), "read folder", &e.to_string())
        })?;

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .overrides(self.exclusions()?);
        if !self.recursive {
            builder.max_depth(Some(1));
        }

        let mut files = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable path: {e}");
                    continue;
                }
            };

            if entry.depth() == 0 || !Self::is_file(&entry) {
                continue;
            }

            let path = entry.into_path();
            let relative_path = path
                .strip_prefix(&self.root)
                .map_or_else(|_| path.clone(), Path::to_path_buf);
            files.push(FileEntry { path, relative_path });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    // Symlinks to files count; symlinks to folders do not.
    fn is_file(entry: &DirEntry) -> bool {
        entry
            .file_type()
            .is_some_and(|ft| ft.is_file() || (ft.is_symlink() && entry.path().is_file()))
    }

    /// Exclude patterns use gitignore syntax, matched case-insensitively.
    fn exclusions(&self) -> FlatGemResult<Override> {
        let invalid = |pattern: &str, e: ignore::Error| {
            FlatGemError::validation_error("exclude_patterns", pattern, "must be a valid glob", Some(&e.to_string()))
        };

        let mut builder = OverrideBuilder::new(&self.root);
        builder.case_insensitive(true).map_err(|e| invalid("", e))?;

        for pattern in &self.exclude_patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            // Override globs whitelist by default; a leading ! turns them into exclusions.
            builder.add(&format!("!{pattern}")).map_err(|e| invalid(pattern, e))?;
        }

        builder.build().map_err(|e| invalid("", e))
    }
}
