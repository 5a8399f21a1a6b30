use super::GeometryProvider;
use crate::model::{DocPoint, ExplicitDest, ViewportPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unscaled page size in PDF units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

/// Pages stacked vertically at one scale, each preceded by `page_gap`.
///
/// Stands in for a live viewer: the viewport transform is the unrotated PDF
/// transform (flip y, then scale).
#[derive(Debug, Clone, PartialEq)]
pub struct StaticLayout {
    pages: Vec<PageGeometry>,
    scale: f64,
    page_gap: f64,
    viewport_height: f64,
    scroll_top: f64,
    unrendered: HashSet<u32>,
}

impl StaticLayout {
    pub fn new(pages: Vec<PageGeometry>, scale: f64, page_gap: f64, viewport_height: f64) -> Self {
        Self {
            pages,
            scale,
            page_gap,
            viewport_height,
            scroll_top: 0.0,
            unrendered: HashSet::new(),
        }
    }

    pub fn uniform(
        page_count: u32,
        width: f64,
        height: f64,
        scale: f64,
        page_gap: f64,
        viewport_height: f64,
    ) -> Self {
        let pages = (0..page_count)
            .map(|_| PageGeometry { width, height })
            .collect();
        Self::new(pages, scale, page_gap, viewport_height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Pretend the page's view has not been created yet.
    pub fn mark_unrendered(&mut self, page: u32) {
        self.unrendered.insert(page);
    }

    pub fn mark_rendered(&mut self, page: u32) {
        self.unrendered.remove(&page);
    }

    pub fn total_height(&self) -> f64 {
        self.pages
            .iter()
            .map(|p| p.height * self.scale + self.page_gap)
            .sum::<f64>()
            + self.page_gap
    }

    /// Page containing the viewport's top edge.
    pub fn page_at(&self, y: f64) -> u32 {
        let mut top = self.page_gap;
        for (i, page) in self.pages.iter().enumerate() {
            let bottom = top + page.height * self.scale;
            if y < bottom + self.page_gap {
                return i as u32 + 1;
            }
            top = bottom + self.page_gap;
        }
        self.page_count().max(1)
    }

    fn layout_top(&self, page: u32) -> Option<f64> {
        if page == 0 || page as usize > self.pages.len() {
            return None;
        }
        let above: f64 = self.pages[..page as usize - 1]
            .iter()
            .map(|p| p.height * self.scale + self.page_gap)
            .sum();
        Some(self.page_gap + above)
    }

    fn max_scroll(&self) -> f64 {
        (self.total_height() - self.viewport_height).max(0.0)
    }
}

impl GeometryProvider for StaticLayout {
    fn page_top_offset(&self, page: u32) -> Option<f64> {
        if self.unrendered.contains(&page) {
            return None;
        }
        self.layout_top(page)
    }

    fn project_to_viewport(&self, page: u32, point: DocPoint) -> Option<ViewportPoint> {
        let geometry = self.pages.get(page.checked_sub(1)? as usize)?;
        Some(ViewportPoint {
            x: point.x * self.scale,
            y: (geometry.height - point.y) * self.scale,
        })
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_to(&mut self, top: f64) {
        self.scroll_top = top.clamp(0.0, self.max_scroll());
    }

    fn scroll_into_view(&mut self, page: u32, dest: &ExplicitDest) {
        let Some(top) = self.layout_top(page) else {
            return;
        };
        let local_y = dest
            .y
            .and_then(|y| {
                self.project_to_viewport(
                    page,
                    DocPoint {
                        x: dest.x.unwrap_or(0.0),
                        y,
                    },
                )
            })
            .map_or(0.0, |p| p.y);
        self.scroll_to(top + local_y);
    }

    fn go_to_page(&mut self, page: u32) {
        if let Some(top) = self.layout_top(page) {
            self.scroll_to(top);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageRef;

    #[test]
    fn pages_stack_with_gaps() {
        let layout = StaticLayout::uniform(3, 600.0, 800.0, 1.5, 10.0, 700.0);
        assert_eq!(layout.page_top_offset(1), Some(10.0));
        assert_eq!(layout.page_top_offset(2), Some(10.0 + 1200.0 + 10.0));
        assert_eq!(layout.page_top_offset(4), None);
        assert_eq!(layout.total_height(), 3.0 * 1210.0 + 10.0);
    }

    #[test]
    fn projection_flips_and_scales() {
        let layout = StaticLayout::uniform(1, 600.0, 800.0, 2.0, 0.0, 700.0);
        let p = layout
            .project_to_viewport(1, DocPoint { x: 72.0, y: 700.0 })
            .unwrap();
        assert_eq!(p, ViewportPoint { x: 144.0, y: 200.0 });
        assert!(layout.project_to_viewport(2, DocPoint::default()).is_none());
    }

    #[test]
    fn scroll_is_clamped() {
        let mut layout = StaticLayout::uniform(2, 600.0, 800.0, 1.0, 0.0, 500.0);
        layout.scroll_to(-20.0);
        assert_eq!(layout.scroll_top(), 0.0);
        layout.scroll_to(10_000.0);
        assert_eq!(layout.scroll_top(), 1100.0);
    }

    #[test]
    fn unrendered_page_still_navigable() {
        let mut layout = StaticLayout::uniform(3, 600.0, 800.0, 1.0, 0.0, 500.0);
        layout.mark_unrendered(3);
        assert_eq!(layout.page_top_offset(3), None);
        layout.go_to_page(2);
        assert_eq!(layout.scroll_top(), 800.0);

        let dest = ExplicitDest {
            page_ref: PageRef { num: 3, gen: 0 },
            mode: "XYZ".into(),
            x: None,
            y: Some(600.0),
            zoom: None,
        };
        layout.scroll_into_view(3, &dest);
        assert_eq!(layout.scroll_top(), 1600.0 + 200.0);
        assert_eq!(layout.page_at(layout.scroll_top()), 3);
    }
}
