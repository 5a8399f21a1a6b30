//! Line/column reconstruction for one rendered page.
//!
//! PDF text arrives as absolutely positioned runs with no notion of lines or
//! paragraphs. The builder clusters runs into columns, groups each column into
//! lines, linearizes the columns top-to-bottom and pads large vertical gaps
//! with virtual lines, so that line numbers stay proportional to physical
//! spacing on the page.

pub mod cache;
pub mod columns;
pub mod lines;
pub mod locate;
pub mod virtual_lines;

use crate::config::IndexConfig;
use crate::model::TextItem;
use serde::{Deserialize, Serialize};

pub use cache::LineIndexCache;
pub use columns::cluster_columns;
pub use lines::group_lines;
pub use locate::nearest_line;
pub use virtual_lines::insert_virtual_lines;

/// Left bound of a virtual line; virtual lines span the whole page width.
pub const VIRTUAL_X_MIN: f64 = 0.0;
/// Right bound of a virtual line.
pub const VIRTUAL_X_MAX: f64 = 99999.0;

/// A vertical band of text items sharing roughly the same x.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// 0-based position, left to right.
    pub index: usize,
    /// Running mean of member x positions.
    pub center_x: f64,
    pub items: Vec<TextItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Position in the page's line sequence before virtual insertion.
    /// `None` for virtual lines.
    pub index: Option<usize>,
    pub y_min: f64,
    pub y_max: f64,
    pub x_min: f64,
    pub x_max: f64,
    /// Median item height.
    pub height: f64,
    pub column_index: usize,
    pub is_virtual: bool,
    /// 1-based global line number, assigned after virtual insertion.
    pub line_no: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<TextItem>,
}

impl Line {
    pub(crate) fn virtual_at(center_y: f64, height: f64, column_index: usize) -> Self {
        Line {
            index: None,
            y_min: center_y - height / 2.0,
            y_max: center_y + height / 2.0,
            x_min: VIRTUAL_X_MIN,
            x_max: VIRTUAL_X_MAX,
            height,
            column_index,
            is_virtual: true,
            line_no: 0,
            items: Vec::new(),
        }
    }

    pub fn center_y(&self) -> f64 {
        (self.y_min + self.y_max) / 2.0
    }

    /// Member text in left-to-right order.
    pub fn text(&self) -> String {
        let mut items: Vec<&TextItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.x.total_cmp(&b.x));
        items
            .iter()
            .map(|i| i.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The reconstructed lines of one page, in reading-adjacent order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLineIndex {
    pub page: u32,
    pub lines: Vec<Line>,
}

impl PageLineIndex {
    pub fn build(page: u32, items: &[TextItem], config: &IndexConfig) -> Self {
        let lines = build_page_line_index(items, config);
        log::debug!(
            "built line index for page {page}: {} items -> {} lines ({} virtual)",
            items.len(),
            lines.len(),
            lines.iter().filter(|l| l.is_virtual).count()
        );
        PageLineIndex { page, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, line_no: u32) -> Option<&Line> {
        self.lines.iter().find(|l| l.line_no == line_no)
    }

    pub fn nearest(&self, y: f64, radius: f64) -> Option<&Line> {
        nearest_line(&self.lines, y, radius)
    }
}

/// Cluster, group, linearize, pad and number the lines of one page.
pub fn build_page_line_index(items: &[TextItem], config: &IndexConfig) -> Vec<Line> {
    let columns = cluster_columns(items, config.column_tolerance);

    let mut lines: Vec<Line> = columns
        .iter()
        .flat_map(|column| group_lines(&column.items, column.index, config))
        .collect();

    // Top of page first, then left column first.
    lines.sort_by(|a, b| {
        a.y_min
            .total_cmp(&b.y_min)
            .then_with(|| a.x_min.total_cmp(&b.x_min))
    });
    for (i, line) in lines.iter_mut().enumerate() {
        line.index = Some(i);
    }

    insert_virtual_lines(lines, config)
}

/// Upper median: the element at `len / 2` after sorting.
pub(crate) fn upper_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}
