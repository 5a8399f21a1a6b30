pub mod pdftotext;

use crate::error::DocReviewError;
use crate::model::PageItems;
pub use pdftotext::PdftotextSource;
use std::path::Path;

/// Source of positioned text runs, one `PageItems` per page.
pub trait TextSource: Send + Sync {
    /// Extract the text items of every page from PDF bytes.
    fn page_items(&self, pdf_bytes: &[u8]) -> Result<Vec<PageItems>, DocReviewError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Parse a JSON array of page items; pages come back sorted.
pub fn parse_items_json(json: &str) -> Result<Vec<PageItems>, DocReviewError> {
    let mut pages: Vec<PageItems> = serde_json::from_str(json)?;
    if let Some(bad) = pages.iter().find(|p| p.page == 0) {
        return Err(DocReviewError::InvalidInput(format!(
            "page numbers are 1-based (found page {} with {} items)",
            bad.page,
            bad.items.len()
        )));
    }
    pages.sort_by_key(|p| p.page);
    Ok(pages)
}

/// Page items serialized as JSON: an array of `{page, width, height, items}`
/// objects, as captured from a rendering session.
pub struct JsonDumpSource;

impl TextSource for JsonDumpSource {
    fn page_items(&self, bytes: &[u8]) -> Result<Vec<PageItems>, DocReviewError> {
        let json = std::str::from_utf8(bytes).map_err(|e| {
            DocReviewError::Extraction(format!("page item dump is not UTF-8: {e}"))
        })?;
        parse_items_json(json)
    }

    fn backend_name(&self) -> &str {
        "json-dump"
    }
}

/// `.json` files are page item dumps, everything else goes through pdftotext.
pub fn source_for_path(path: &Path) -> Box<dyn TextSource> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        Box::new(JsonDumpSource)
    } else {
        Box::new(PdftotextSource::new())
    }
}

/// Read `path` and extract its page items with the matching source.
pub fn load_page_items(path: &Path) -> Result<Vec<PageItems>, DocReviewError> {
    let source = source_for_path(path);
    let bytes = std::fs::read(path)?;
    log::debug!(
        "extracting text items from {} with {}",
        path.display(),
        source.backend_name()
    );
    source.page_items(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts_pages() {
        let json = r#"[
            {"page": 2, "items": [{"x": 1, "y": 2, "width": 3, "height": 4, "text": "b"}]},
            {"page": 1, "width": 612, "height": 792, "items": [{"x": 1, "y": 2}]}
        ]"#;
        let pages = parse_items_json(json).unwrap();
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[0].height, 792.0);
        assert_eq!(pages[0].items[0].text, "");
        assert_eq!(pages[1].items[0].text, "b");
    }

    #[test]
    fn rejects_page_zero() {
        let err = parse_items_json(r#"[{"page": 0, "items": []}]"#).unwrap_err();
        assert!(err.to_string().contains("1-based"));
    }

    #[test]
    fn picks_source_by_extension() {
        assert_eq!(source_for_path(Path::new("dump.JSON")).backend_name(), "json-dump");
        assert_eq!(source_for_path(Path::new("report.pdf")).backend_name(), "pdftotext");
    }

    #[test]
    fn loads_json_dump_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"page": 1, "items": [{"x": 5, "y": 9, "text": "a"}]}]"#)
            .unwrap();
        let pages = load_page_items(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].items[0].y, 9.0);
    }
}
