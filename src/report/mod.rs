//! Report artifacts built from a user's process records.
//!
//! Two outputs share the same content:
//! 1. Paginated PDF — sanitized for the builtin fonts, at most
//!    [`MAX_PDF_RECORDS`] records, per-field length caps.
//! 2. Plain text — verbatim, uncapped; the fallback when exact content matters.
//!
//! PDF generation is split into a pure layout stage ([`layout`]) and a
//! rendering stage ([`pdf`]) via `printpdf`.

pub mod layout;
pub mod pdf;
pub mod sanitize;
pub mod text;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use layout::{layout_document, DocumentLayout, PageGeometry};
pub use pdf::build_paginated_document;
pub use sanitize::{sanitize, sanitize_opt, truncate, wrap_text};
pub use text::{build_plain_text_export, render_plain_text};

/// Records rendered into the PDF before the omission note kicks in.
pub const MAX_PDF_RECORDS: usize = 10;
pub const HEADER_MAX_CHARS: usize = 100;
pub const FOOTER_MAX_CHARS: usize = 100;
pub const TITLE_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MAX_CHARS: usize = 1500;
pub const ANALYSIS_MAX_CHARS: usize = 2000;

pub const DEFAULT_HEADER: &str = "Zestawienie przeanalizowanych procesów SmartFlowAI";
pub const DEFAULT_FOOTER: &str = "Wygenerowano przez SmartFlowAI";

pub const PDF_FILENAME: &str = "Lista_przeanalizowanych_procesow.pdf";
pub const TEXT_FILENAME: &str = "Lista_przeanalizowanych_procesow.txt";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Rendering(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write a report artifact into `exports_dir`, creating it if needed.
pub fn export_to_file(
    bytes: &[u8],
    filename: &str,
    exports_dir: &Path,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(exports_dir)?;
    let path = exports_dir.join(filename);
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_into_created_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let exports = tmp.path().join("exports");

        let bytes = b"%PDF-1.3 test content";
        let path = export_to_file(bytes, PDF_FILENAME, &exports).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
        assert!(path.ends_with(PDF_FILENAME));
    }

    #[test]
    fn export_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        export_to_file(b"first", TEXT_FILENAME, tmp.path()).unwrap();
        let path = export_to_file(b"second", TEXT_FILENAME, tmp.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }
}
