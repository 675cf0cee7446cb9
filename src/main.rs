// src/main.rs
mod utils;
mod document;
mod extractors;
mod storage;

use std::path::PathBuf;

use clap::Parser;
use document::models::collect_lines;
use document::{DocumentRenderer, PageSource, PdfDocument};
use extractors::{KeywordConfig, SectionExtractor};
use storage::StorageManager;
use utils::error::ExtractError;
use utils::AppError;

/// Command Line Interface for the tender eligibility criteria extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source tender document (PDF)
    input: PathBuf,

    /// Destination PDF for the extracted criteria
    output: PathBuf,

    /// JSON keyword configuration (fields: start, stop, irrelevant, heading)
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Also write a JSON metadata file next to the output
    #[arg(short, long)]
    metadata: bool,

    /// Debug mode - save a per-line classification trace next to the output
    #[arg(short, long)]
    debug: bool,

    /// Print the extracted text to stdout
    #[arg(short, long)]
    print: bool,

    /// Exit with an error when nothing was extracted
    #[arg(long)]
    fail_on_empty: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    run(args)
}

/// Runs the extraction pipeline for one document.
fn run(args: Args) -> Result<(), AppError> {
    // 3. Resolve keyword configuration
    let config = match &args.keywords {
        Some(path) => KeywordConfig::from_file(path)?,
        None => {
            tracing::debug!("Using built-in keyword configuration");
            KeywordConfig::default()
        }
    };

    // 4. Read every page once; the document is closed when `source` goes out of scope
    let pages = {
        let source = PdfDocument::open(&args.input)?;
        tracing::info!("Source has {} page(s)", source.page_count());
        source.pages()?
    };
    let lines = collect_lines(&pages);

    if args.debug {
        let trace_path = storage::sidecar_path(&args.output, "trace.txt");
        if let Err(e) = utils::trace_debug::create_debug_trace(&lines, &trace_path, &config) {
            tracing::warn!("Failed to create debug trace: {}", e);
        }
    }

    // 5. Extract the eligibility section
    let section_extractor = SectionExtractor::new(config);
    let mut section = section_extractor.extract(&lines);
    section.page_count = pages.len();

    if section.is_empty() && args.fail_on_empty {
        return Err(ExtractError::NoContent(format!(
            "no eligibility criteria found in {}",
            args.input.display()
        ))
        .into());
    }

    if args.print {
        println!("{}", section.content);
    }

    // 6. Render and save
    let storage = StorageManager::new(DocumentRenderer::default());
    let path = storage.save_section(&section, &args.output)?;

    if args.metadata {
        storage.save_section_metadata(&section, &args.input, &path)?;
    }

    tracing::info!(
        "Processing finished. Strategy: {}, {} bytes written to {}",
        section.strategy,
        section.content.len(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::utils::error::ReadError;

    fn args(input: &Path, output: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            "tender_extractor".to_string(),
            input.display().to_string(),
            output.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    fn write_source(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("tender.pdf");
        DocumentRenderer::default().render(text, &path).unwrap();
        path
    }

    #[test]
    fn test_empty_extraction_with_fail_on_empty_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path(), "Site visit is recommended.");
        let output = dir.path().join("criteria.pdf");

        let err = run(args(&input, &output, &["--fail-on-empty"])).unwrap_err();

        assert!(matches!(err, AppError::Extraction(ExtractError::NoContent(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_extraction_still_writes_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path(), "Site visit is recommended.");
        let output = dir.path().join("criteria.pdf");

        run(args(&input, &output, &[])).unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("criteria.pdf");

        let err = run(args(&dir.path().join("absent.pdf"), &output, &[])).unwrap_err();

        assert!(matches!(err, AppError::Read(ReadError::NotFound(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_bad_keyword_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path(), "Site visit is recommended.");
        let keywords = dir.path().join("keywords.json");
        std::fs::write(&keywords, "[1, 2").unwrap();
        let keywords_arg = keywords.display().to_string();

        let err = run(args(&input, &dir.path().join("out.pdf"), &["--keywords", &keywords_arg])).unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_metadata_and_debug_sidecars_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_source(dir.path(), "Site visit is recommended.");
        let output = dir.path().join("criteria.pdf");

        run(args(&input, &output, &["--metadata", "--debug"])).unwrap();

        let meta: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("criteria.meta.json")).unwrap()).unwrap();
        assert_eq!(meta["page_count"], 1);
        assert_eq!(meta["content_length"], 0);
        assert!(dir.path().join("criteria.trace.txt").exists());
    }
}
