// src/utils/trace_debug.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::models::Line;
use crate::extractors::keywords::KeywordConfig;
use crate::utils::error::AppError;

/// Classification tags for one line, in display order.
pub fn classify_line(line: &Line, config: &KeywordConfig) -> Vec<&'static str> {
    let lowered = line.lowered();
    let mut tags = Vec::new();

    if line.is_heading() {
        tags.push("HEADING");
        if config.heading.matches_exactly(&lowered) {
            tags.push("HEADING-MATCH");
        }
    }
    if config.start.any_contained_in(&lowered) {
        tags.push("START");
    }
    if config.stop.any_contained_in(&lowered) {
        tags.push("STOP");
    }
    if config.irrelevant.any_contained_in(&lowered) {
        tags.push("IRRELEVANT");
    }
    tags
}

/// Saves a per-line trace to a file: index, tags, cleaned text.
pub fn save_debug_trace(lines: &[Line], filename: &Path, tags: &[Vec<&str>]) -> Result<(), AppError> {
    let file = File::create(filename)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# line\ttags\ttext")?;
    for (index, (line, line_tags)) in lines.iter().zip(tags).enumerate() {
        let tag_text = if line_tags.is_empty() { "-".to_string() } else { line_tags.join(",") };
        writeln!(out, "{:>6}\t{}\t{}", index + 1, tag_text, line.cleaned())?;
    }
    out.flush()?;

    tracing::info!("Saved debug trace to {}", filename.display());
    Ok(())
}

/// Classifies every line against `config` and writes the trace.
pub fn create_debug_trace(lines: &[Line], filename: &Path, config: &KeywordConfig) -> Result<(), AppError> {
    let tags: Vec<Vec<&str>> = lines.iter().map(|line| classify_line(line, config)).collect();
    save_debug_trace(lines, filename, &tags)
}
