use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub files_found: usize,
    pub subfolders_found: bool,
    pub formats: BTreeSet<String>,
    pub output_has_files: bool,
    pub warnings: Vec<String>,
}

impl ScanReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn print_summary(&self) {
        log::info!("🔎 Pre-flight check");
        log::info!("   📄 Files found: {}", self.files_found);
        if !self.formats.is_empty() {
            let formats: Vec<&str> = self.formats.iter().map(String::as_str).collect();
            log::info!("   🏷️ Formats: {}", formats.join(", "));
        }
        log::info!("   📁 Subfolders present: {}", if self.subfolders_found { "yes" } else { "no" });

        if self.warnings.is_empty() {
            log::info!("✅ No warnings");
        } else {
            log::warn!("⚠️ Warnings:");
            for warning in &self.warnings {
                log::warn!("   {warning}");
            }
        }
    }
}
