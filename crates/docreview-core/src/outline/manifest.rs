use super::{DocumentSource, OutlineNode, OutlineResolver};
use crate::error::DocReviewError;
use crate::model::{ExplicitDest, FileMeta, PageRef};
use crate::workspace::DocumentLoader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// JSON description of a document's navigation structure: outline, named
/// destinations, page references and page labels.
///
/// When `page_refs` is empty, a page reference's `num` is read as the 1-based
/// page number, which keeps hand-written manifests short.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentManifest {
    pub page_count: u32,
    #[serde(default)]
    pub page_labels: Option<Vec<String>>,
    #[serde(default)]
    pub page_refs: Vec<PageRef>,
    #[serde(default)]
    pub named_destinations: HashMap<String, ExplicitDest>,
    #[serde(default)]
    pub outline: Vec<OutlineNode>,
}

impl DocumentManifest {
    pub fn load(path: &Path) -> Result<Self, DocReviewError> {
        let json = std::fs::read_to_string(path)?;
        Self::parse(&json)
    }

    pub fn parse(json: &str) -> Result<Self, DocReviewError> {
        let manifest: DocumentManifest = serde_json::from_str(json)?;
        if manifest.page_count == 0 {
            return Err(DocReviewError::InvalidInput(
                "manifest page_count must be at least 1".into(),
            ));
        }
        Ok(manifest)
    }
}

impl OutlineResolver for DocumentManifest {
    fn named_destination(&self, name: &str) -> Result<Option<ExplicitDest>, DocReviewError> {
        Ok(self.named_destinations.get(name).cloned())
    }

    fn page_index(&self, page_ref: &PageRef) -> Result<u32, DocReviewError> {
        let index = if self.page_refs.is_empty() {
            page_ref.num.checked_sub(1)
        } else {
            self.page_refs
                .iter()
                .position(|r| r == page_ref)
                .map(|i| i as u32)
        };
        index.filter(|i| *i < self.page_count).ok_or_else(|| {
            DocReviewError::Destination(format!(
                "page reference {} {} R does not point into the document",
                page_ref.num, page_ref.gen
            ))
        })
    }
}

impl DocumentSource for DocumentManifest {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Labels as listed; pages past the end of a short list display their number.
    fn page_labels(&self) -> Result<Option<Vec<String>>, DocReviewError> {
        Ok(self.page_labels.clone())
    }

    fn outline(&self) -> Result<Vec<OutlineNode>, DocReviewError> {
        Ok(self.outline.clone())
    }
}

/// Opens documents by reading a manifest file; the file's own path is not read.
pub struct ManifestLoader {
    path: PathBuf,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentLoader for ManifestLoader {
    fn open(&self, file: &FileMeta) -> Result<Box<dyn DocumentSource>, DocReviewError> {
        let manifest = DocumentManifest::load(&self.path).map_err(|e| {
            DocReviewError::DocumentLoad(format!(
                "{} (manifest {}): {e}",
                file.name,
                self.path.display()
            ))
        })?;
        Ok(Box::new(manifest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::PageLabels;

    const MANIFEST: &str = r#"{
        "page_count": 3,
        "page_labels": ["i", "1", "2"],
        "page_refs": [{"num": 10}, {"num": 14}, {"num": 18}],
        "named_destinations": {
            "ch1": {"page_ref": {"num": 14}, "x": 72, "y": 700}
        },
        "outline": [{"title": "Chapter 1", "dest": "ch1"}]
    }"#;

    #[test]
    fn resolves_page_refs_by_position() {
        let m = DocumentManifest::parse(MANIFEST).unwrap();
        assert_eq!(m.page_index(&PageRef { num: 18, gen: 0 }).unwrap(), 2);
        assert!(m.page_index(&PageRef { num: 99, gen: 0 }).is_err());
    }

    #[test]
    fn bare_numbers_without_page_refs() {
        let m = DocumentManifest {
            page_count: 5,
            ..Default::default()
        };
        assert_eq!(m.page_index(&PageRef { num: 5, gen: 0 }).unwrap(), 4);
        assert!(m.page_index(&PageRef { num: 6, gen: 0 }).is_err());
        assert!(m.page_index(&PageRef { num: 0, gen: 0 }).is_err());
    }

    #[test]
    fn short_label_list_falls_back_per_page() {
        let m = DocumentManifest {
            page_count: 3,
            page_labels: Some(vec!["i".into()]),
            ..Default::default()
        };
        let labels = PageLabels::new(m.page_labels().unwrap());
        assert_eq!(labels.display_label(1), "i");
        assert_eq!(labels.display_label(2), "2");
        assert_eq!(labels.display_label(3), "3");
    }

    #[test]
    fn outline_resolves_through_manifest() {
        let m = DocumentManifest::parse(MANIFEST).unwrap();
        let sections = crate::outline::flatten_outline(&m, &m.outline().unwrap());
        assert_eq!(sections[0].page, 2);
        assert_eq!(sections[0].pdf_y, Some(700.0));
    }

    #[test]
    fn zero_pages_rejected() {
        assert!(DocumentManifest::parse(r#"{"page_count": 0}"#).is_err());
    }
}
