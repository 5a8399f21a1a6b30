//! Outline flattening: nested bookmarks become a flat, ordered section list.

pub mod labels;
pub mod manifest;

use crate::error::DocReviewError;
use crate::model::{ExplicitDest, PageRef, Section};
use serde::{Deserialize, Serialize};

pub use labels::PageLabels;
pub use manifest::{DocumentManifest, ManifestLoader};

/// Title given to outline entries that have none.
pub const UNTITLED_SECTION: &str = "Untitled";

/// An outline destination: a named reference needing lookup, or explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DestRef {
    Named(String),
    Explicit(ExplicitDest),
}

/// One entry of the document outline, as the outline collaborator reports it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlineNode {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dest: Option<DestRef>,
    #[serde(default, alias = "items")]
    pub children: Vec<OutlineNode>,
}

/// Resolves outline destinations to pages.
pub trait OutlineResolver {
    /// Look up a named destination. `Ok(None)` when the name is unknown.
    fn named_destination(&self, name: &str) -> Result<Option<ExplicitDest>, DocReviewError>;

    /// 0-based index of the page a reference points to.
    fn page_index(&self, page_ref: &PageRef) -> Result<u32, DocReviewError>;
}

/// A loaded document as seen by the review workspace.
pub trait DocumentSource: OutlineResolver {
    fn page_count(&self) -> u32;

    /// Per-page display labels, `Ok(None)` when the document defines none.
    fn page_labels(&self) -> Result<Option<Vec<String>>, DocReviewError>;

    fn outline(&self) -> Result<Vec<OutlineNode>, DocReviewError>;
}

/// Where a destination points: page plus the raw destination point.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// 1-based page.
    pub page: u32,
    pub pdf_x: Option<f64>,
    pub pdf_y: Option<f64>,
    pub zoom: Option<f64>,
    pub dest: ExplicitDest,
}

/// Resolve a destination to a location. `Ok(None)` for an unknown name.
pub fn resolve_destination<R: OutlineResolver + ?Sized>(
    resolver: &R,
    dest: &DestRef,
) -> Result<Option<ResolvedLocation>, DocReviewError> {
    let explicit = match dest {
        DestRef::Explicit(explicit) => explicit.clone(),
        DestRef::Named(name) => match resolver.named_destination(name)? {
            Some(explicit) => explicit,
            None => return Ok(None),
        },
    };

    let page_index = resolver.page_index(&explicit.page_ref)?;
    Ok(Some(ResolvedLocation {
        page: page_index + 1,
        pdf_x: explicit.x,
        pdf_y: explicit.y,
        zoom: explicit.zoom,
        dest: explicit,
    }))
}

/// Flatten the outline depth-first into sections.
///
/// Destination failures are local: the entry keeps its place in the list with
/// no location (page 1, no destination point) and the walk continues.
pub fn flatten_outline<R: OutlineResolver + ?Sized>(
    resolver: &R,
    nodes: &[OutlineNode],
) -> Vec<Section> {
    let mut sections = Vec::new();
    flatten_into(resolver, nodes, 1, &mut sections);
    sections
}

fn flatten_into<R: OutlineResolver + ?Sized>(
    resolver: &R,
    nodes: &[OutlineNode],
    level: u32,
    out: &mut Vec<Section>,
) {
    for node in nodes {
        let title = node
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_SECTION)
            .to_string();

        let location = match &node.dest {
            Some(dest) => match resolve_destination(resolver, dest) {
                Ok(location) => location,
                Err(e) => {
                    log::warn!("outline entry '{title}' has no usable destination: {e}");
                    None
                }
            },
            None => None,
        };

        out.push(Section {
            id: format!("sec_{}", out.len() + 1),
            title,
            level,
            page: location.as_ref().map_or(1, |l| l.page),
            pdf_x: location.as_ref().and_then(|l| l.pdf_x),
            pdf_y: location.as_ref().and_then(|l| l.pdf_y),
            zoom: location.as_ref().and_then(|l| l.zoom),
            dest: location.map(|l| l.dest),
        });

        flatten_into(resolver, &node.children, level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockResolver {
        named: HashMap<String, ExplicitDest>,
        broken_name: Option<String>,
    }

    impl OutlineResolver for MockResolver {
        fn named_destination(&self, name: &str) -> Result<Option<ExplicitDest>, DocReviewError> {
            if self.broken_name.as_deref() == Some(name) {
                return Err(DocReviewError::Destination(format!("corrupt entry {name}")));
            }
            Ok(self.named.get(name).cloned())
        }

        fn page_index(&self, page_ref: &PageRef) -> Result<u32, DocReviewError> {
            if page_ref.num == 0 {
                return Err(DocReviewError::Destination("dangling reference".into()));
            }
            Ok(page_ref.num - 1)
        }
    }

    fn explicit(num: u32, y: Option<f64>) -> ExplicitDest {
        ExplicitDest {
            page_ref: PageRef { num, gen: 0 },
            mode: "XYZ".into(),
            x: Some(72.0),
            y,
            zoom: None,
        }
    }

    fn node(title: &str, dest: Option<DestRef>, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            title: Some(title.into()),
            dest,
            children,
        }
    }

    fn resolver() -> MockResolver {
        let mut named = HashMap::new();
        named.insert("intro".to_string(), explicit(2, Some(700.0)));
        MockResolver {
            named,
            broken_name: Some("broken".into()),
        }
    }

    #[test]
    fn flattens_depth_first_with_levels() {
        let outline = vec![
            node(
                "Part I",
                Some(DestRef::Named("intro".into())),
                vec![node("1.1", Some(DestRef::Explicit(explicit(3, Some(500.0)))), vec![])],
            ),
            node("Part II", Some(DestRef::Explicit(explicit(9, None))), vec![]),
        ];
        let sections = flatten_outline(&resolver(), &outline);

        let summary: Vec<(&str, u32, u32)> = sections
            .iter()
            .map(|s| (s.title.as_str(), s.level, s.page))
            .collect();
        assert_eq!(summary, vec![("Part I", 1, 2), ("1.1", 2, 3), ("Part II", 1, 9)]);
        assert_eq!(sections[0].id, "sec_1");
        assert_eq!(sections[2].id, "sec_3");
        assert_eq!(sections[0].pdf_y, Some(700.0));
        assert_eq!(sections[2].pdf_y, None);
        assert!(sections[2].dest.is_some());
    }

    #[test]
    fn failed_resolution_keeps_entry_without_location() {
        let outline = vec![
            node("Broken", Some(DestRef::Named("broken".into())), vec![]),
            node("Dangling", Some(DestRef::Explicit(explicit(0, Some(1.0)))), vec![]),
            node("Unknown", Some(DestRef::Named("nope".into())), vec![]),
            node("After", Some(DestRef::Named("intro".into())), vec![]),
        ];
        let sections = flatten_outline(&resolver(), &outline);
        assert_eq!(sections.len(), 4);
        for s in &sections[..3] {
            assert_eq!(s.page, 1);
            assert!(s.dest.is_none());
            assert!(s.doc_point().is_none());
        }
        assert_eq!(sections[3].page, 2);
    }

    #[test]
    fn missing_title_becomes_untitled() {
        let outline = vec![OutlineNode {
            title: Some("   ".into()),
            ..Default::default()
        }];
        let sections = flatten_outline(&resolver(), &outline);
        assert_eq!(sections[0].title, UNTITLED_SECTION);
    }

    #[test]
    fn empty_outline_is_not_an_error() {
        assert!(flatten_outline(&resolver(), &[]).is_empty());
    }

    #[test]
    fn outline_json_accepts_both_destination_shapes() {
        let json = r#"[
            {"title": "A", "dest": "intro", "items": [
                {"title": "B", "dest": {"page_ref": {"num": 4}, "x": 0, "y": 300}}
            ]}
        ]"#;
        let nodes: Vec<OutlineNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes[0].dest, Some(DestRef::Named("intro".into())));
        match &nodes[0].children[0].dest {
            Some(DestRef::Explicit(d)) => {
                assert_eq!(d.page_ref.num, 4);
                assert_eq!(d.mode, "XYZ");
            }
            other => panic!("expected explicit dest, got {other:?}"),
        }
    }
}
