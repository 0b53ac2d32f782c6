//! Document loading.
//!
//! Extracts raw text from plain text and PDF files.

use crate::error::{EkkoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Extensions treated as UTF-8 text.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

/// Extensions treated as PDF.
const PDF_EXTENSIONS: &[&str] = &["pdf"];

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Pdf,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    ///
    /// Returns `Ok(None)` when the path has no extension, so the caller can
    /// sniff the content instead.
    pub fn from_path(path: &Path) -> Result<Option<Self>> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(None);
        };
        let ext = ext.to_lowercase();

        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Some(DocumentFormat::Text))
        } else if PDF_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Some(DocumentFormat::Pdf))
        } else {
            Err(EkkoError::UnsupportedFormat(format!(
                ".{} (expected .pdf, .txt, .text or .md)",
                ext
            )))
        }
    }

    /// Guess the format from file content.
    pub fn sniff(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(PDF_MAGIC) {
            Ok(DocumentFormat::Pdf)
        } else if std::str::from_utf8(bytes).is_ok() {
            Ok(DocumentFormat::Text)
        } else {
            Err(EkkoError::UnsupportedFormat(
                "content is neither PDF nor UTF-8 text".to_string(),
            ))
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Text => write!(f, "text"),
            DocumentFormat::Pdf => write!(f, "pdf"),
        }
    }
}

/// A loaded document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Display name (usually the file name).
    pub name: String,
    /// Format the text was extracted from.
    pub format: DocumentFormat,
    /// Extracted text.
    pub text: String,
}

impl Document {
    /// Wrap already-extracted text.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: DocumentFormat::Text,
            text: text.into(),
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Load a document from disk.
#[instrument(fields(path = %path.display()))]
pub fn load_document(path: &Path) -> Result<Document> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    // Reject unknown extensions before reading the file.
    let declared = DocumentFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let format = match declared {
        Some(format) => format,
        None => DocumentFormat::sniff(&bytes)?,
    };

    let document = load_bytes(&name, &bytes, format)?;
    info!(
        "Loaded {} ({}, {} words)",
        document.name,
        document.format,
        document.word_count()
    );
    Ok(document)
}

/// Extract a document from raw bytes in a known format.
pub fn load_bytes(name: &str, bytes: &[u8], format: DocumentFormat) -> Result<Document> {
    let text = match format {
        DocumentFormat::Text => decode_text(bytes)?,
        DocumentFormat::Pdf => extract_pdf_text(bytes)?,
    };

    Ok(Document {
        name: name.to_string(),
        format,
        text,
    })
}

fn decode_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| EkkoError::UnsupportedFormat(format!("text is not valid UTF-8: {}", e)))
}

/// Extract text page by page, each page followed by a newline.
fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| EkkoError::UnsupportedFormat(format!("could not read PDF: {}", e)))?;

    debug!("Extracted {} PDF pages", pages.len());
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.PDF")).unwrap(),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.md")).unwrap(),
            Some(DocumentFormat::Text)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("README")).unwrap(), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentFormat::from_path(Path::new("resume.docx")).unwrap_err();
        assert!(matches!(err, EkkoError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_sniff() {
        assert_eq!(
            DocumentFormat::sniff(b"%PDF-1.7\n...").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(DocumentFormat::sniff(b"plain words").unwrap(), DocumentFormat::Text);
        assert!(matches!(
            DocumentFormat::sniff(&[0xff, 0xfe, 0x00]),
            Err(EkkoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Alice is a software engineer.").unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc.format, DocumentFormat::Text);
        assert_eq!(doc.text, "Alice is a software engineer.");
        assert_eq!(doc.word_count(), 5);
    }

    #[test]
    fn test_invalid_utf8_text() {
        let err = load_bytes("bad.txt", &[0x66, 0x6f, 0xff], DocumentFormat::Text).unwrap_err();
        assert!(matches!(err, EkkoError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_garbage_pdf() {
        let err = load_bytes("bad.pdf", b"not a pdf at all", DocumentFormat::Pdf).unwrap_err();
        assert!(matches!(err, EkkoError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_join_pages_newline_after_each() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        assert_eq!(join_pages(&pages), "page one\npage two\n");
    }

    /// Minimal two-page PDF with one line of Helvetica text per page.
    fn two_page_pdf(first: &str, second: &str) -> Vec<u8> {
        let content = |text: &str| {
            let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            )
        };
        let page = |contents: usize| {
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 7 0 R >> >> /Contents {} 0 R >>",
                contents
            )
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R 5 0 R] /Count 2 >>".to_string(),
            page(4),
            content(first),
            page(6),
            content(second),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
        }

        let xref = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref
            )
            .as_bytes(),
        );
        pdf
    }

    fn assert_pages_in_order(text: &str) {
        let first = text.find("Alice").expect("first page text");
        let second = text.find("Kubernetes").expect("second page text");
        assert!(first < second);
        assert!(text[first..second].contains('\n'));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_load_pdf_pages_in_order() {
        let pdf = two_page_pdf("Alice builds backends", "Kubernetes and Rust");
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&pdf).unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc.format, DocumentFormat::Pdf);
        assert_pages_in_order(&doc.text);
        assert!(doc.text.contains("backends"));
    }

    #[test]
    fn test_load_pdf_without_extension() {
        let pdf = two_page_pdf("Alice builds backends", "Kubernetes and Rust");
        let mut file = tempfile::Builder::new()
            .prefix("resume")
            .suffix("")
            .tempfile()
            .unwrap();
        file.write_all(&pdf).unwrap();
        assert!(file.path().extension().is_none());

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc.format, DocumentFormat::Pdf);
        assert_pages_in_order(&doc.text);
    }
}
