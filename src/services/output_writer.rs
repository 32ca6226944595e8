use std::fs;
use std::path::{Path, PathBuf};
use crate::errors::{FlatGemError, FlatGemResult};

pub struct OutputWriter {
    output_root: PathBuf,
    extension: Option<String>,
}

impl OutputWriter {
    pub fn new(output_root: &Path, output_extension: &str) -> Self {
        Self {
            output_root: output_root.to_path_buf(),
            extension: Self::normalize_extension(output_extension),
        }
    }

    /// `".json"`, `"json"` and `" json "` all mean the `json` extension; empty means keep the original.
    fn normalize_extension(raw: &str) -> Option<String> {
        let trimmed = raw.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn target_path(&self, relative_path: &Path) -> PathBuf {
        let mirrored = self.output_root.join(relative_path);
        match &self.extension {
            Some(ext) => mirrored.with_extension(ext),
            None => mirrored,
        }
    }

    pub fn write(&self, relative_path: &Path, content: &str) -> FlatGemResult<PathBuf> {
        let target = self.target_path(relative_path);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FlatGemError::file_error(&parent.to_string_lossy(), "create folder", &e.to_string())
            })?;
        }

        fs::write(&target, content).map_err(|e| {
            FlatGemError::file_error(&target.to_string_lossy(), "write", &e.to_string())
        })?;

        Ok(target)
    }
}
