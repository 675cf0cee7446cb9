// src/extractors/section.rs

// --- Imports ---
use std::fmt;

use serde::Serialize;

use crate::document::models::Line;
use crate::extractors::keywords::{KeywordConfig, KeywordSet};

// --- Constants ---
const SEPARATOR_WIDTH: usize = 160;
const HEADING_MARKER: &str = "[HEADING]";

// --- Output Accumulator ---

/// Extracted text as it is built: segments opened by a separator rule.
#[derive(Debug, Default)]
pub struct ExtractedText {
    buf: String,
}

impl ExtractedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_separator(&mut self) {
        self.buf.push('\n');
        self.buf.extend(std::iter::repeat('-').take(SEPARATOR_WIDTH));
        self.buf.push('\n');
    }

    pub fn push_heading(&mut self, heading: &str) {
        self.buf.push_str(HEADING_MARKER);
        self.buf.push(' ');
        self.push_line(heading);
    }

    pub fn push_line(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }

    /// The accumulated text with surrounding whitespace trimmed.
    pub fn finish(self) -> String {
        self.buf.trim().to_string()
    }
}

// --- Heading Strategy ---

/// Extracts everything under headings that exactly match a heading keyword.
#[derive(Debug, Clone)]
pub struct HeadingExtractor {
    keywords: KeywordSet,
}

impl HeadingExtractor {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// A heading whose cleaned, lower-cased text equals a keyword.
    /// Substring containment does not count.
    pub fn is_qualifying_heading(&self, line: &Line) -> bool {
        line.is_heading() && self.keywords.matches_exactly(&line.lowered())
    }

    /// First pass: does any line qualify?
    pub fn detect(&self, lines: &[Line]) -> bool {
        lines.iter().any(|line| self.is_qualifying_heading(line))
    }

    /// Second pass. Collects body lines after each qualifying heading until
    /// any other heading.
    pub fn extract_section(&self, lines: &[Line]) -> String {
        let mut out = ExtractedText::new();
        let mut collecting = false;

        for line in lines {
            if line.is_heading() {
                if self.keywords.matches_exactly(&line.lowered()) {
                    tracing::debug!("Qualifying heading: '{}'", line.cleaned());
                    collecting = true;
                    out.push_separator();
                    out.push_heading(line.cleaned());
                } else {
                    if collecting {
                        tracing::trace!("Section closed by heading: '{}'", line.cleaned());
                    }
                    collecting = false;
                }
                continue;
            }
            if collecting {
                out.push_line(line.cleaned());
            }
        }

        out.finish()
    }

    /// Runs both passes. The text is empty when no qualifying heading exists.
    pub fn extract(&self, lines: &[Line]) -> (bool, String) {
        if !self.detect(lines) {
            return (false, String::new());
        }
        (true, self.extract_section(lines))
    }
}

// --- Keyword Window Strategy ---

/// Capture state of [`KeywordWindowExtractor`].
///
/// | State     | Line contains                | Action                    | Next      |
/// |-----------|------------------------------|---------------------------|-----------|
/// | Idle      | start + irrelevant           | discard                   | Idle      |
/// | Idle      | start                        | separator, keep line      | Capturing |
/// | Idle      | anything else                | discard                   | Idle      |
/// | Capturing | stop                         | separator, discard line   | Idle      |
/// | Capturing | irrelevant                   | discard                   | Capturing |
/// | Capturing | anything else                | keep line                 | Capturing |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Idle,
    Capturing,
}

/// Fallback strategy: opens a window on a start keyword, closes it on a stop keyword.
#[derive(Debug, Clone)]
pub struct KeywordWindowExtractor {
    start: KeywordSet,
    stop: KeywordSet,
    irrelevant: KeywordSet,
}

impl KeywordWindowExtractor {
    pub fn new(start: KeywordSet, stop: KeywordSet, irrelevant: KeywordSet) -> Self {
        Self { start, stop, irrelevant }
    }

    /// Applies one line to the state machine, writing any output to `out`.
    pub fn step(&self, state: WindowState, line: &Line, out: &mut ExtractedText) -> WindowState {
        let lowered = line.lowered();
        match state {
            WindowState::Idle => {
                if !self.start.any_contained_in(&lowered) {
                    return WindowState::Idle;
                }
                if self.irrelevant.any_contained_in(&lowered) {
                    tracing::trace!("Ignoring start line with irrelevant phrase: '{}'", line.cleaned());
                    return WindowState::Idle;
                }
                tracing::debug!("Capture window opened by: '{}'", line.cleaned());
                out.push_separator();
                out.push_line(line.cleaned());
                WindowState::Capturing
            }
            WindowState::Capturing => {
                if self.stop.any_contained_in(&lowered) {
                    tracing::debug!("Capture window closed by: '{}'", line.cleaned());
                    out.push_separator();
                    return WindowState::Idle;
                }
                if !self.irrelevant.any_contained_in(&lowered) {
                    out.push_line(line.cleaned());
                }
                WindowState::Capturing
            }
        }
    }

    pub fn extract(&self, lines: &[Line]) -> String {
        let mut out = ExtractedText::new();
        let state = lines
            .iter()
            .fold(WindowState::Idle, |state, line| self.step(state, line, &mut out));

        if state == WindowState::Capturing {
            tracing::debug!("Document ended inside an open capture window");
        }
        out.finish()
    }
}

// --- Strategy Selection ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    Heading,
    KeywordWindow,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Heading => write!(f, "heading"),
            ExtractionStrategy::KeywordWindow => write!(f, "keyword window"),
        }
    }
}

// --- Data Structures ---
#[derive(Debug, Clone)]
pub struct ExtractedSection {
    pub strategy: ExtractionStrategy,
    pub content: String,   // Trimmed extracted text, possibly empty
    pub page_count: usize, // Pages read from the source
    pub line_count: usize, // Lines scanned
}

impl ExtractedSection {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// --- Main Extractor Structure ---
pub struct SectionExtractor {
    headings: HeadingExtractor,
    window: KeywordWindowExtractor,
}

impl SectionExtractor {
    pub fn new(config: KeywordConfig) -> Self {
        Self {
            headings: HeadingExtractor::new(config.heading),
            window: KeywordWindowExtractor::new(config.start, config.stop, config.irrelevant),
        }
    }

    /// Extracts the eligibility section from an ordered line sequence.
    ///
    /// Heading detection runs first; the keyword window only runs when no
    /// qualifying heading exists anywhere in `lines`.
    pub fn extract(&self, lines: &[Line]) -> ExtractedSection {
        let (found_heading, heading_text) = self.headings.extract(lines);
        let (strategy, content) = if found_heading {
            (ExtractionStrategy::Heading, heading_text)
        } else {
            (ExtractionStrategy::KeywordWindow, self.window.extract(lines))
        };

        if content.is_empty() {
            tracing::warn!("No eligibility content found using {} extraction over {} lines", strategy, lines.len());
        } else {
            tracing::info!("Extracted {} bytes using {} extraction over {} lines", content.len(), strategy, lines.len());
        }

        ExtractedSection { strategy, content, page_count: 0, line_count: lines.len() }
    }
}
