// src/document/reader.rs
use std::path::{Path, PathBuf};

use lopdf::Document;

use crate::document::models::PageText;
use crate::utils::error::ReadError;

/// Anything that can hand out its pages as plain text blocks, in order.
pub trait PageSource {
    fn pages(&self) -> Result<Vec<PageText>, ReadError>;
}

/// A PDF opened from disk. Released when dropped.
pub struct PdfDocument {
    path: PathBuf,
    inner: Document,
}

impl PdfDocument {
    /// Opens and parses the PDF at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::error!("Source document does not exist: {}", path.display());
            return Err(ReadError::NotFound(path.to_path_buf()));
        }

        tracing::info!("Opening source document: {}", path.display());
        let inner = Document::load(path)
            .map_err(|e| ReadError::Format(format!("{}: {}", path.display(), e)))?;

        if inner.is_encrypted() {
            return Err(ReadError::Format(format!(
                "{}: encrypted documents are not supported",
                path.display()
            )));
        }

        Ok(Self { path: path.to_path_buf(), inner })
    }

    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }
}

impl PageSource for PdfDocument {
    fn pages(&self) -> Result<Vec<PageText>, ReadError> {
        let page_ids = self.inner.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());

        // get_pages is a BTreeMap keyed by page number, so iteration is in page order
        for (number, _object_id) in page_ids {
            let text = self
                .inner
                .extract_text(&[number])
                .map_err(|e| ReadError::Extraction { page: number, message: e.to_string() })?;
            tracing::trace!("Page {} yielded {} bytes of text", number, text.len());
            pages.push(PageText { number, text });
        }

        tracing::debug!("Read {} pages from {}", pages.len(), self.path.display());
        Ok(pages)
    }
}

/// Pages already held in memory.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryPages {
    pages: Vec<String>,
}

#[cfg(test)]
impl MemoryPages {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { pages: pages.into_iter().map(Into::into).collect() }
    }
}

#[cfg(test)]
impl PageSource for MemoryPages {
    fn pages(&self) -> Result<Vec<PageText>, ReadError> {
        Ok(self
            .pages
            .iter()
            .enumerate()
            .map(|(i, text)| PageText { number: i as u32 + 1, text: text.clone() })
            .collect())
    }
}
