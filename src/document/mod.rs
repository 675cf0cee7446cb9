// src/document/mod.rs
pub mod models;
pub mod reader;
pub mod renderer;

// Re-export the document I/O entry points
#[allow(unused_imports)]
pub use reader::{PageSource, PdfDocument};
#[allow(unused_imports)]
pub use renderer::DocumentRenderer;
