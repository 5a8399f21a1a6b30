//! Comment log export, one spreadsheet row per comment.

use crate::error::DocReviewError;
use crate::model::Comment;
use crate::outline::PageLabels;
use serde::Serialize;
use std::io::Write;

pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Page (PDF)")]
    pub page: u32,
    #[serde(rename = "Page (Label)")]
    pub page_label: String,
    #[serde(rename = "Line")]
    pub line: String,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Time")]
    pub time: String,
}

impl ExportRow {
    pub fn from_comment(comment: &Comment, labels: &PageLabels) -> Self {
        Self {
            section: comment.section_title.clone().unwrap_or_default(),
            page: comment.page,
            page_label: labels.display_label(comment.page),
            line: comment
                .line_no
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            comment: comment.body.clone(),
            user: comment.user_name.clone(),
            time: comment.created_at.format(EXPORT_TIME_FORMAT).to_string(),
        }
    }
}

pub fn export_rows(comments: &[Comment], labels: &PageLabels) -> Vec<ExportRow> {
    comments
        .iter()
        .map(|c| ExportRow::from_comment(c, labels))
        .collect()
}

/// Write the rows as CSV with a header line. Returns the number of rows.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<usize, DocReviewError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record([
            "Section",
            "Page (PDF)",
            "Page (Label)",
            "Line",
            "Comment",
            "User",
            "Time",
        ])?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// `Report.PDF` → `Report_comments.csv`.
pub fn export_filename(document_name: &str) -> String {
    let stem = match document_name.len().checked_sub(4) {
        Some(cut)
            if document_name.is_char_boundary(cut)
                && document_name[cut..].eq_ignore_ascii_case(".pdf") =>
        {
            &document_name[..cut]
        }
        _ => document_name,
    };
    format!("{stem}_comments.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comment(page: u32, line_no: Option<u32>, section: Option<&str>) -> Comment {
        Comment {
            id: format!("c_{page}"),
            file_id: "f_1".into(),
            section_id: section.map(|_| "sec_1".to_string()),
            section_title: section.map(str::to_string),
            page,
            line_no,
            body: "Typo, \"teh\"".into(),
            user_id: "u_1".into(),
            user_name: "ana".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 1).unwrap(),
            kind: None,
            region: None,
        }
    }

    #[test]
    fn one_row_per_comment_with_display_labels() {
        let labels = PageLabels::new(Some(vec!["i".into(), "ii".into(), "1".into()]));
        let comments = vec![
            comment(1, Some(3), Some("Intro")),
            comment(3, None, None),
            comment(7, Some(1), None),
        ];
        let rows = export_rows(&comments, &labels);
        assert_eq!(rows.len(), comments.len());
        for (row, c) in rows.iter().zip(&comments) {
            assert_eq!(row.page_label, labels.display_label(c.page));
        }
        assert_eq!(rows[0].page_label, "i");
        assert_eq!(rows[1].line, "-");
        assert_eq!(rows[1].section, "");
        assert_eq!(rows[2].page_label, "7");
        assert_eq!(rows[0].time, "2024-03-05 09:07:01");
    }

    #[test]
    fn csv_has_header_and_quotes_fields() {
        let rows = export_rows(&[comment(2, Some(4), Some("Scope"))], &PageLabels::none());
        let mut out = Vec::new();
        assert_eq!(write_csv(&rows, &mut out).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Section,Page (PDF),Page (Label),Line,Comment,User,Time")
        );
        assert_eq!(
            lines.next(),
            Some("Scope,2,2,4,\"Typo, \"\"teh\"\"\",ana,2024-03-05 09:07:01")
        );
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut out = Vec::new();
        assert_eq!(write_csv(&[], &mut out).unwrap(), 0);
        assert!(String::from_utf8(out).unwrap().starts_with("Section,"));
    }

    #[test]
    fn filename_strips_pdf_extension_case_insensitively() {
        assert_eq!(export_filename("Report.PDF"), "Report_comments.csv");
        assert_eq!(export_filename("site.v2.pdf"), "site.v2_comments.csv");
        assert_eq!(export_filename("notes"), "notes_comments.csv");
    }
}
