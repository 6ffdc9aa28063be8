// Document Reader Service
// Extracts the textual payload of plain-text, Word and PDF files

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DOCX parse error: {0}")]
    Docx(String),
    #[error("PDF extraction error: {0}")]
    Pdf(String),
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

/// Reads the text content of a discovered file.
pub trait ContentReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<String, ReadError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileContentReader;

impl ContentReader for FileContentReader {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        let ext = extension_of(path);
        match ext.as_str() {
            "txt" => {
                let bytes = fs::read(path)?;
                Ok(decode_text_lossy(&bytes))
            }
            "docx" => {
                let bytes = fs::read(path)?;
                extract_docx_text(&bytes)
            }
            "pdf" => {
                let bytes = fs::read(path)?;
                pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ReadError::Pdf(e.to_string()))
            }
            _ => Err(ReadError::UnsupportedExtension(ext)),
        }
    }
}

/// Lowercase extension without the dot, empty when absent.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// UTF-8 decode that drops invalid sequences instead of failing.
///
/// Line endings are normalized: "\r\n" and a lone "\r" both become "\n".
pub fn decode_text_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Top-level paragraphs joined by newlines; tables and headers are not read.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ReadError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ReadError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => out.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    out
}
