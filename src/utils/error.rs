// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Source document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Source document could not be parsed: {0}")]
    Format(String),

    #[error("Failed to extract text from page {page}: {message}")]
    Extraction { page: u32, message: String },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No qualifying content found: {0}")]
    NoContent(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    Pdf(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Reading source document failed: {0}")]
    Read(#[from] ReadError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
