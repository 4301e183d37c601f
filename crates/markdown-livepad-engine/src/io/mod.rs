use std::fs;
use std::path::{Path, PathBuf};

use crate::render::escape::escape;

/// Extensions accepted by [`read_document`], compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Largest file [`read_document`] will load.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported file type: {0} (expected .md, .markdown or .txt)")]
    UnsupportedFormat(PathBuf),
    #[error("File too large: {path} is {size} bytes (limit {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Read a markdown document, checking its type and size first
pub fn read_document(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    if !is_supported(path) {
        return Err(IoError::UnsupportedFormat(path.to_path_buf()));
    }

    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(IoError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: MAX_FILE_SIZE,
        });
    }

    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write a document, creating parent directories as needed
pub fn write_document(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(IoError::Io)
}

/// Wraps rendered body HTML in a complete page.
pub fn standalone_html(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        escape(title)
    )
}

/// Write `body` as a standalone HTML page
pub fn export_html(path: &Path, title: &str, body: &str) -> Result<(), IoError> {
    write_document(path, &standalone_html(title, body))
}
