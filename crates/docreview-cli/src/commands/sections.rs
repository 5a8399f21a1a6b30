use crate::output;
use docreview_core::error::DocReviewError;
use docreview_core::model::Section;
use docreview_core::outline::{flatten_outline, DocumentManifest, DocumentSource, PageLabels};
use std::path::Path;

/// Load a manifest and flatten its outline, degrading the way a document
/// load does: unusable labels fall back to raw page numbers.
pub fn load(manifest_path: &Path) -> Result<(DocumentManifest, Vec<Section>, PageLabels), DocReviewError> {
    let manifest = DocumentManifest::load(manifest_path)?;
    let labels = match manifest.page_labels() {
        Ok(labels) => PageLabels::new(labels),
        Err(e) => {
            log::warn!("{}: {e}", manifest_path.display());
            PageLabels::none()
        }
    };
    let sections = flatten_outline(&manifest, &manifest.outline);
    Ok((manifest, sections, labels))
}

pub fn run(manifest_path: &Path, output_format: &str) -> Result<(), DocReviewError> {
    let (_, sections, labels) = load(manifest_path)?;
    match output_format {
        "json" => output::json::print(&sections),
        _ => {
            output::table::print_sections(&sections, &labels);
            Ok(())
        }
    }
}
