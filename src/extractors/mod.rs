// src/extractors/mod.rs
pub mod keywords;
pub mod section;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use keywords::{KeywordConfig, KeywordSet};
#[allow(unused_imports)]
pub use section::{
    ExtractedSection,
    ExtractedText,
    ExtractionStrategy,
    HeadingExtractor,
    KeywordWindowExtractor,
    SectionExtractor,
    WindowState,
};
