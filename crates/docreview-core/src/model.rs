use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One positioned text run as reported by the rendering layer.
///
/// Coordinates are in viewport space: `y` grows downward from the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub text: String,
}

impl TextItem {
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.into(),
        }
    }
}

/// All text items of one rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageItems {
    /// 1-based page number.
    pub page: u32,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub items: Vec<TextItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// A point in untransformed document space (PDF user units, y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f64,
    pub y: f64,
}

/// A point in viewport space (y down, scaled).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

/// Indirect reference to a page object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    pub num: u32,
    #[serde(default)]
    pub gen: u32,
}

/// Explicit destination: `[page_ref, mode, x, y, zoom]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitDest {
    pub page_ref: PageRef,
    #[serde(default = "default_dest_mode")]
    pub mode: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub zoom: Option<f64>,
}

fn default_dest_mode() -> String {
    "XYZ".to_string()
}

/// An outline entry flattened into a navigable section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Outline depth, 1 for top-level entries.
    pub level: u32,
    /// 1-based page; 1 when the destination could not be resolved.
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<ExplicitDest>,
}

impl Section {
    /// The heading's destination point, if the outline carried one.
    pub fn doc_point(&self) -> Option<DocPoint> {
        self.pdf_y.map(|y| DocPoint {
            x: self.pdf_x.unwrap_or(0.0),
            y,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// An uploaded document in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub id: String,
    pub name: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Text,
    Region,
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentKind::Text => write!(f, "text"),
            CommentKind::Region => write!(f, "region"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub file_id: String,
    #[serde(default)]
    pub section_id: Option<String>,
    /// Section title at creation time; not updated if the outline changes.
    #[serde(default)]
    pub section_title: Option<String>,
    pub page: u32,
    #[serde(default)]
    pub line_no: Option<u32>,
    pub body: String,
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: Option<CommentKind>,
    #[serde(default)]
    pub region: Option<BBox>,
}
