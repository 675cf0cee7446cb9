// src/document/renderer.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::RenderError;

// --- Page Geometry (points) ---
const A4_WIDTH: f32 = 595.2756;
const A4_HEIGHT: f32 = 841.8898;
const MARGIN: f32 = 50.0;
const LINE_HEIGHT: f32 = 15.0;
const FONT_SIZE: f32 = 12.0;
const WRAP_WIDTH: usize = 100;

const FONT_RESOURCE: &str = "F1";
const FONT_NAME: &str = "Helvetica";

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("Failed to compile WORD_RE"));

/// A wrapped line positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Draws plain text into a paginated A4 PDF with Helvetica.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub line_height: f32,
    pub font_size: f32,
    pub wrap_width: usize,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: MARGIN,
            line_height: LINE_HEIGHT,
            font_size: FONT_SIZE,
            wrap_width: WRAP_WIDTH,
        }
    }
}

impl DocumentRenderer {
    /// Wraps every paragraph and assigns lines to pages.
    ///
    /// The cursor starts one margin below the top edge; a new page begins
    /// as soon as it has dropped below the bottom margin. Always returns at
    /// least one (possibly empty) page.
    pub fn layout(&self, text: &str) -> Vec<Vec<PlacedLine>> {
        let top = self.page_height - self.margin;
        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut y = top;

        for paragraph in text.split('\n') {
            for line in wrap(paragraph, self.wrap_width) {
                if y < self.margin {
                    pages.push(Vec::new());
                    y = top;
                }
                if let Some(page) = pages.last_mut() {
                    page.push(PlacedLine { x: self.margin, y, text: line });
                }
                y -= self.line_height;
            }
        }

        pages
    }

    /// Renders `text` to a new PDF file at `output_path`.
    pub fn render<P: AsRef<Path>>(&self, text: &str, output_path: P) -> Result<(), RenderError> {
        let output_path = output_path.as_ref();
        let pages = self.layout(text);
        let mut doc = self.build_document(&pages)?;

        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer)?;
        writer.flush()?;

        tracing::info!("Rendered {} page(s) to {}", pages.len(), output_path.display());
        Ok(())
    }

    fn build_document(&self, pages: &[Vec<PlacedLine>]) -> Result<Document, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => FONT_NAME,
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_RESOURCE => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for lines in pages {
            let content = self.page_content(lines);
            let encoded = content
                .encode()
                .map_err(|e| RenderError::Pdf(format!("Failed to encode page content: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let media_box: Vec<Object> = vec![0.into(), 0.into(), self.page_width.into(), self.page_height.into()];
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }

    // Font is re-selected in every text object, so each page starts from a clean state.
    fn page_content(&self, lines: &[PlacedLine]) -> Content {
        let mut operations = Vec::with_capacity(lines.len() * 5);
        for line in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![FONT_RESOURCE.into(), self.font_size.into()]));
            operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        Content { operations }
    }
}

/// Greedy word wrap to `width` characters.
///
/// Whitespace runs collapse to single spaces, empty paragraphs give no
/// lines, and words longer than `width` are split across lines. Hyphens are
/// not break points: `well-known` only breaks if it is longer than `width`.
/// Both differ from Python's `textwrap` defaults, which keep inner
/// whitespace runs and break after hyphens.
pub fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in WORD_RE.find_iter(paragraph).map(|m| m.as_str()) {
        let word_len = word.chars().count();
        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };

        if needed <= width {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
            continue;
        }

        if word_len <= width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
            continue;
        }

        // Long word: fill what is left of the current line, then chunk the rest.
        let chars: Vec<char> = word.chars().collect();
        let mut rest: &[char] = &chars;
        if current_len > 0 {
            let space_left = width.saturating_sub(current_len + 1);
            if space_left > 0 {
                current.push(' ');
                current.extend(&rest[..space_left]);
                rest = &rest[space_left..];
            }
            lines.push(std::mem::take(&mut current));
        }
        while rest.len() > width {
            lines.push(rest[..width].iter().collect());
            rest = &rest[width..];
        }
        current = rest.iter().collect();
        current_len = rest.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Encodes text for a WinAnsiEncoding font. Unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let paragraph = "word ".repeat(60);
        let lines = wrap(&paragraph, 100);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 100));
        assert_eq!(lines[0].chars().count(), 99); // 20 words of 4 + 19 spaces
    }

    #[test]
    fn test_wrap_empty_paragraph_gives_no_lines() {
        assert!(wrap("", 100).is_empty());
        assert!(wrap("   \t ", 100).is_empty());
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let long = "x".repeat(25);
        assert_eq!(wrap(&long, 10), vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);

        let lines = wrap(&format!("ab {}", long), 10);
        assert_eq!(lines, vec![format!("ab {}", "x".repeat(7)), "x".repeat(10), "x".repeat(8)]);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap("  a \t b   c ", 100), vec!["a b c"]);
    }

    #[test]
    fn test_wrap_keeps_hyphenated_words_whole() {
        assert_eq!(wrap("tender pre-bid", 10), vec!["tender", "pre-bid"]);
        assert_eq!(wrap("a well-known firm", 12), vec!["a well-known", "firm"]);
    }

    #[test]
    fn test_layout_paginates_after_bottom_margin() {
        let renderer = DocumentRenderer::default();
        let text = vec!["line"; 120].join("\n");
        let pages = renderer.layout(&text);

        assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![50, 50, 20]);
        let first = &pages[1][0];
        assert_eq!(first.x, MARGIN);
        assert!((first.y - (A4_HEIGHT - MARGIN)).abs() < f32::EPSILON);
        assert!(pages[0].iter().all(|l| l.y >= MARGIN));
    }

    #[test]
    fn test_layout_of_empty_text_has_one_empty_page() {
        let pages = DocumentRenderer::default().layout("");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_layout_skips_blank_paragraphs() {
        let pages = DocumentRenderer::default().layout("a\n\n\nb");
        assert_eq!(pages[0].len(), 2);
        assert!((pages[0][0].y - pages[0][1].y - LINE_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("A\u{2013}é₹"), vec![b'A', 0x96, 0xE9, b'?']);
    }

    #[test]
    fn test_render_writes_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let text = vec!["Bidder shall have completed similar works."; 75].join("\n");

        DocumentRenderer::default().render(&text, &path).unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_render_empty_text_has_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        DocumentRenderer::default().render("", &path).unwrap();
        assert_eq!(Document::load(&path).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn test_render_to_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.pdf");
        let err = DocumentRenderer::default().render("text", &path).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
