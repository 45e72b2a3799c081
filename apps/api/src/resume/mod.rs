//! Résumé text extraction.
//!
//! Dispatches on the uploaded file's extension. PDF and DOCX extraction are
//! CPU-bound; async callers must run [`parse_resume`] inside
//! `tokio::task::spawn_blocking`.

use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;
use tracing::debug;

/// Main body part of a WordprocessingML package.
const DOCX_DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Invalid file name")]
    InvalidFileName,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),

    #[error("Text file is neither UTF-8 nor Big5")]
    Encoding,

    #[error("No text could be extracted from the résumé")]
    EmptyDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Text,
}

impl ResumeFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ResumeError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(ResumeError::InvalidFileName);
        }
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(ResumeFormat::Pdf),
            "docx" => Ok(ResumeFormat::Docx),
            "txt" => Ok(ResumeFormat::Text),
            "" => Err(ResumeError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(ResumeError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Extracts plain text from an uploaded résumé file.
pub fn parse_resume(file_name: &str, bytes: &[u8]) -> Result<String, ResumeError> {
    let format = ResumeFormat::from_file_name(file_name)?;

    let text = match format {
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ResumeError::Pdf(e.to_string()))?,
        ResumeFormat::Docx => extract_docx_text(bytes)?,
        ResumeFormat::Text => decode_text(bytes)?,
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(ResumeError::EmptyDocument);
    }

    debug!(
        "Parsed résumé '{}' ({:?}): {} chars",
        file_name,
        format,
        text.chars().count()
    );
    Ok(text)
}

/// One line per `<w:p>` paragraph of the main document part. Tabs and manual
/// breaks inside a paragraph are kept.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ResumeError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ResumeError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_DOCUMENT_PART)
        .map_err(|e| ResumeError::Docx(format!("{DOCX_DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ResumeError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text_run = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" | b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let unescaped = t.unescape().map_err(|e| ResumeError::Docx(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ResumeError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }
    Ok(text)
}

/// UTF-8 first, then Big5 for text saved by Traditional Chinese editors.
fn decode_text(bytes: &[u8]) -> Result<String, ResumeError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }
    encoding_rs::BIG5
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or(ResumeError::Encoding)
}

/// Trims each line and collapses runs of blank lines left behind by PDF extraction.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
