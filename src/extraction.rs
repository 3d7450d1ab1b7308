//! Text and field extraction collaborators.
//!
//! Extraction never fails towards the matcher: an unreadable document is
//! logged and handed over as empty text.

use crate::models::InvoiceFields;
use regex::Regex;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::warn;

static INVOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Invoice Number: (\d+)").expect("valid invoice number pattern"));
static INVOICE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Date: (\d{4}-\d{2}-\d{2})").expect("valid date pattern"));
static INVOICE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Amount: (\d+\.\d{2})").expect("valid amount pattern"));

/// Turns a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of `path`, or an empty string if nothing can be read.
    fn extract(&self, path: &Path) -> String;
}

/// Reads files as text, replacing invalid UTF-8 sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> String {
        match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Error reading {:?}: {}", path, e);
                String::new()
            }
        }
    }
}

/// Extracts the text layer of PDF documents.
///
/// Unreadable or malformed PDFs come back as empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> String {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Error reading {:?}: {}", path, e);
                return String::new();
            }
        };

        // pdf-extract may panic on damaged documents
        let parsed = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }));
        match parsed {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Error parsing PDF {:?}: {}", path, e);
                String::new()
            }
            Err(_) => {
                warn!("PDF parser aborted on {:?}", path);
                String::new()
            }
        }
    }
}

/// Extractor for documents with the given file extension (leading dot
/// ignored, case-insensitive): PDF for `pdf`, plain text otherwise.
pub fn extractor_for_extension(extension: &str) -> Arc<dyn TextExtractor> {
    if extension.trim_start_matches('.').eq_ignore_ascii_case("pdf") {
        Arc::new(PdfTextExtractor)
    } else {
        Arc::new(PlainTextExtractor)
    }
}

/// Pull invoice number, date and amount out of document text.
pub fn extract_fields(text: &str) -> InvoiceFields {
    let capture = |pattern: &Regex| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    InvoiceFields {
        invoice_number: capture(&INVOICE_NUMBER),
        date: capture(&INVOICE_DATE),
        amount: capture(&INVOICE_AMOUNT),
    }
}
