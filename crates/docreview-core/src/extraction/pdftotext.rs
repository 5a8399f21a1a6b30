use crate::error::DocReviewError;
use crate::extraction::TextSource;
use crate::model::{PageItems, TextItem};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::Write;
use std::process::Command;

/// Text source backed by pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox`, which reports every word with its box in
/// top-left-origin page coordinates, the same orientation as a rendered
/// viewport at scale 1.
pub struct PdftotextSource;

impl PdftotextSource {
    pub fn new() -> Self {
        PdftotextSource
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdftotextSource {
    fn page_items(&self, pdf_bytes: &[u8]) -> Result<Vec<PageItems>, DocReviewError> {
        let mut tmpfile = tempfile::NamedTempFile::new()
            .map_err(|e| DocReviewError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| DocReviewError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DocReviewError::PdftotextNotFound
                } else {
                    DocReviewError::Extraction(format!("pdftotext -bbox failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(DocReviewError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_xml(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Default)]
struct PendingWord {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
    text: String,
}

/// Parse `pdftotext -bbox` XHTML into per-page word items.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<PageItems>, DocReviewError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageItems> = Vec::new();
    let mut current_page: Option<PageItems> = None;
    let mut current_word: Option<PendingWord> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => current_page = Some(open_page(&e, pages.len())),
                b"word" => current_word = Some(open_word(&e)),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"page" => {
                pages.push(open_page(&e, pages.len()));
            }
            Ok(Event::Text(t)) => {
                if let Some(word) = current_word.as_mut() {
                    let text = t
                        .unescape()
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    word.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"word" => {
                    if let (Some(word), Some(page)) = (current_word.take(), current_page.as_mut()) {
                        let text = word.text.trim().to_string();
                        if !text.is_empty() {
                            page.items.push(TextItem {
                                x: word.x_min,
                                y: word.y_min,
                                width: word.x_max - word.x_min,
                                height: word.y_max - word.y_min,
                                text,
                            });
                        }
                    }
                }
                b"page" => {
                    if let Some(page) = current_page.take() {
                        pages.push(page);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocReviewError::Extraction(format!(
                    "malformed bbox output at byte {}: {e}",
                    reader.error_position()
                )))
            }
            _ => {}
        }
    }

    if let Some(page) = current_page.take() {
        pages.push(page);
    }

    Ok(pages)
}

fn open_page(tag: &BytesStart<'_>, seen: usize) -> PageItems {
    PageItems {
        page: seen as u32 + 1,
        width: attr_f64(tag, b"width").unwrap_or(0.0),
        height: attr_f64(tag, b"height").unwrap_or(0.0),
        items: Vec::new(),
    }
}

fn open_word(tag: &BytesStart<'_>) -> PendingWord {
    PendingWord {
        x_min: attr_f64(tag, b"xMin").unwrap_or(0.0),
        y_min: attr_f64(tag, b"yMin").unwrap_or(0.0),
        x_max: attr_f64(tag, b"xMax").unwrap_or(0.0),
        y_max: attr_f64(tag, b"yMax").unwrap_or(0.0),
        text: String::new(),
    }
}

fn attr_f64(tag: &BytesStart<'_>, name: &[u8]) -> Option<f64> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok()?.trim().parse().ok())
}
