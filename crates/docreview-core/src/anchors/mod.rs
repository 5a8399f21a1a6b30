//! Section anchors: outline headings projected into the continuous scroll area.

pub mod layout;

use crate::model::{DocPoint, ExplicitDest, Section, ViewportPoint};
use serde::{Deserialize, Serialize};

pub use layout::{PageGeometry, StaticLayout};

/// What the anchor mapper needs from the rendering layer, and nothing more.
pub trait GeometryProvider {
    /// Top of the page's view within the scroll area, `None` while the page
    /// view does not exist yet.
    fn page_top_offset(&self, page: u32) -> Option<f64>;

    /// Project a document-space point through the page's current viewport
    /// transform. The result is page-local.
    fn project_to_viewport(&self, page: u32, point: DocPoint) -> Option<ViewportPoint>;

    fn viewport_height(&self) -> f64;

    fn scroll_top(&self) -> f64;

    /// Smooth-scroll the container so `top` is at the top of the viewport.
    fn scroll_to(&mut self, top: f64);

    /// Native "scroll this destination into view".
    fn scroll_into_view(&mut self, page: u32, dest: &ExplicitDest);

    fn go_to_page(&mut self, page: u32);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnchor {
    pub section_id: String,
    pub page: u32,
    /// Offset of the heading within the scroll area.
    pub absolute_y: f64,
}

/// Anchors of one document, sorted ascending by `absolute_y`.
///
/// The list is replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionAnchorMap {
    anchors: Vec<SectionAnchor>,
}

impl SectionAnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, sections: &[Section], geometry: &dyn GeometryProvider) {
        self.anchors = compute_anchors(sections, geometry);
    }

    pub fn anchors(&self) -> &[SectionAnchor] {
        &self.anchors
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn find(&self, section_id: &str) -> Option<&SectionAnchor> {
        self.anchors.iter().find(|a| a.section_id == section_id)
    }

    pub fn active_at(&self, center: f64) -> Option<&SectionAnchor> {
        active_anchor(&self.anchors, center)
    }

    /// Active anchor for the geometry's current scroll position.
    pub fn active_in(&self, geometry: &dyn GeometryProvider) -> Option<&SectionAnchor> {
        self.active_at(viewport_center(geometry))
    }
}

pub fn viewport_center(geometry: &dyn GeometryProvider) -> f64 {
    geometry.scroll_top() + geometry.viewport_height() / 2.0
}

/// Project every section whose page view exists; headings without a
/// destination point anchor at the top of their page.
pub fn compute_anchors(sections: &[Section], geometry: &dyn GeometryProvider) -> Vec<SectionAnchor> {
    let mut anchors: Vec<SectionAnchor> = sections
        .iter()
        .filter_map(|section| {
            let page_top = geometry.page_top_offset(section.page)?;
            let local_y = section
                .doc_point()
                .and_then(|point| geometry.project_to_viewport(section.page, point))
                .map_or(0.0, |p| p.y);
            Some(SectionAnchor {
                section_id: section.id.clone(),
                page: section.page,
                absolute_y: page_top + local_y,
            })
        })
        .collect();

    anchors.sort_by(|a, b| a.absolute_y.total_cmp(&b.absolute_y));
    anchors
}

/// The last anchor at or above `center`; the first anchor when every anchor
/// is below it.
pub fn active_anchor(anchors: &[SectionAnchor], center: f64) -> Option<&SectionAnchor> {
    let mut active = anchors.first()?;
    for anchor in anchors {
        if anchor.absolute_y <= center {
            active = anchor;
        } else {
            break;
        }
    }
    Some(active)
}

#[derive(Debug, Clone, PartialEq)]
pub enum JumpAction {
    /// Scroll so the anchor sits at the configured fraction of the viewport.
    ScrollTo { top: f64 },
    /// Anchor unknown; let the renderer place the raw destination.
    ScrollIntoView { page: u32, dest: ExplicitDest },
    GoToPage { page: u32 },
}

pub fn plan_jump(
    section: &Section,
    anchors: &SectionAnchorMap,
    viewport_height: f64,
    offset_fraction: f64,
) -> JumpAction {
    if let Some(anchor) = anchors.find(&section.id) {
        let top = (anchor.absolute_y - viewport_height * offset_fraction).max(0.0);
        return JumpAction::ScrollTo { top };
    }
    match &section.dest {
        Some(dest) => JumpAction::ScrollIntoView {
            page: section.page,
            dest: dest.clone(),
        },
        None => JumpAction::GoToPage { page: section.page },
    }
}

pub fn apply_jump(action: &JumpAction, geometry: &mut dyn GeometryProvider) {
    match action {
        JumpAction::ScrollTo { top } => geometry.scroll_to(*top),
        JumpAction::ScrollIntoView { page, dest } => geometry.scroll_into_view(*page, dest),
        JumpAction::GoToPage { page } => geometry.go_to_page(*page),
    }
}
