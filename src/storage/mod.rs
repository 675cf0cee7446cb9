// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::renderer::DocumentRenderer;
use crate::extractors::section::ExtractedSection;
use crate::utils::error::StorageError;

pub struct StorageManager {
    renderer: DocumentRenderer,
}

impl StorageManager {
    /// Creates a new StorageManager that renders with `renderer`
    pub fn new(renderer: DocumentRenderer) -> Self {
        Self { renderer }
    }

    /// Renders the extracted section to a PDF at `output_path`
    pub fn save_section(&self, section: &ExtractedSection, output_path: &Path) -> Result<PathBuf, StorageError> {
        ensure_parent_dir(output_path)?;

        self.renderer.render(&section.content, output_path)?;

        tracing::info!("Saved section to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    /// Saves metadata about the section in JSON format next to the output
    pub fn save_section_metadata(
        &self,
        section: &ExtractedSection,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, StorageError> {
        ensure_parent_dir(output_path)?;
        let file_path = sidecar_path(output_path, "meta.json");

        // Create metadata structure
        let metadata = serde_json::json!({
            "input": input_path.display().to_string(),
            "output": output_path.display().to_string(),
            "strategy": section.strategy,
            "page_count": section.page_count,
            "line_count": section.line_count,
            "content_length": section.content.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

/// `out/report.pdf` + `meta.json` -> `out/report.meta.json`
pub fn sidecar_path(output_path: &Path, suffix: &str) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_path.with_file_name(format!("{}.{}", stem, suffix))
}

fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(StorageError::IoError)?;
        }
    }
    Ok(())
}
