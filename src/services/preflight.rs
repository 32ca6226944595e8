use std::fs;
use std::path::Path;
use crate::config::constants::NO_EXTENSION_LABEL;
use crate::errors::FlatGemResult;
use crate::services::folder_walker::FolderWalker;
use crate::structs::processing_job::absolute_path;
use crate::structs::scan_report::ScanReport;

pub struct Preflight;

impl Preflight {
    pub fn scan(input: &Path, output: &Path, recursive: bool, exclude_patterns: &[String]) -> FlatGemResult<ScanReport> {
        let mut report = ScanReport::default();

        if !input.is_dir() {
            report.warnings.push("Input path is not a valid folder.".to_string());
            return Ok(report);
        }

        report.subfolders_found = fs::read_dir(input)?
            .flatten()
            .any(|entry| entry.path().is_dir());

        let files = FolderWalker::new(input, recursive, exclude_patterns.to_vec()).collect_files()?;
        report.files_found = files.len();
        report.formats = files
            .iter()
            .map(|file| {
                file.relative_path
                    .extension()
                    .map_or_else(
                        || NO_EXTENSION_LABEL.to_string(),
                        |ext| format!(".{}", ext.to_string_lossy().to_lowercase()),
                    )
            })
            .collect();

        report.output_has_files = output.is_dir()
            && fs::read_dir(output).map(|mut entries| entries.next().is_some()).unwrap_or(false);

        if report.subfolders_found && !recursive {
            report.warnings.push("• Input folder contains subfolders. They will be ignored. (Pass --recursive to include them).".to_string());
        }

        if report.formats.len() > 1 {
            let formats: Vec<&str> = report.formats.iter().map(String::as_str).collect();
            report.warnings.push(format!("• Multiple file formats found: {}.", formats.join(", ")));
        }

        if report.output_has_files {
            report.warnings.push("• Output folder is not empty. Existing files may be overwritten.".to_string());
        }

        if report.files_found == 0 {
            report.warnings.push("• No files found in the input folder.".to_string());
        }

        if recursive && absolute_path(output).starts_with(absolute_path(input)) {
            report.warnings.push("• Output folder is inside the input folder. Generated files will be picked up by later runs.".to_string());
        }

        Ok(report)
    }
}
