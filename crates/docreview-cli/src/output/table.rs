use docreview_core::anchors::SectionAnchorMap;
use docreview_core::layout::{Line, PageLineIndex};
use docreview_core::model::{Comment, FileMeta, Section};
use docreview_core::outline::PageLabels;

const TEXT_PREVIEW: usize = 60;

fn preview(text: &str) -> String {
    if text.chars().count() <= TEXT_PREVIEW {
        return text.to_string();
    }
    let cut: String = text.chars().take(TEXT_PREVIEW - 3).collect();
    format!("{cut}...")
}

pub fn print_line_indices(indices: &[PageLineIndex]) {
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let virtual_count = index.lines.iter().filter(|l| l.is_virtual).count();
        println!(
            "=== Page {} ({} lines, {} virtual) ===\n",
            index.page,
            index.len(),
            virtual_count
        );
        for line in &index.lines {
            print_line(line);
        }
    }
}

pub fn print_line(line: &Line) {
    if line.is_virtual {
        println!(
            "  {:>4}  col {:<2} y {:>8.1}  (gap)",
            line.line_no,
            line.column_index,
            line.center_y()
        );
    } else {
        println!(
            "  {:>4}  col {:<2} y {:>8.1}  {}",
            line.line_no,
            line.column_index,
            line.center_y(),
            preview(&line.text())
        );
    }
}

pub fn print_sections(sections: &[Section], labels: &PageLabels) {
    if sections.is_empty() {
        println!("No outline");
        return;
    }

    let max_id = sections.iter().map(|s| s.id.len()).max().unwrap_or(6);
    for section in sections {
        let indent = "  ".repeat(section.level.saturating_sub(1) as usize);
        let location = if section.pdf_y.is_some() { "" } else { " (page top)" };
        println!(
            "  {:<width$}  p. {:<5} {}{}{}",
            section.id,
            labels.display_label(section.page),
            indent,
            section.title,
            location,
            width = max_id
        );
    }
}

pub fn print_anchors(anchors: &SectionAnchorMap, sections: &[Section], active: Option<&str>) {
    if anchors.is_empty() {
        println!("No anchors");
        return;
    }

    for anchor in anchors.anchors() {
        let title = sections
            .iter()
            .find(|s| s.id == anchor.section_id)
            .map(|s| s.title.as_str())
            .unwrap_or("");
        let marker = if active == Some(anchor.section_id.as_str()) {
            ">"
        } else {
            " "
        };
        println!(
            "{} {:>10.1}  p. {:<4} {:<8} {}",
            marker, anchor.absolute_y, anchor.page, anchor.section_id, title
        );
    }
}

pub fn print_files(files: &[FileMeta]) {
    if files.is_empty() {
        println!("No documents. Add one with `docreview files add <pdf>`");
        return;
    }

    let max_name = files.iter().map(|f| f.name.len()).max().unwrap_or(10);
    for file in files {
        println!(
            "  {}  {:<width$}  {}",
            file.id,
            file.name,
            file.created_at.format("%Y-%m-%d %H:%M"),
            width = max_name
        );
    }
}

pub fn print_comments(comments: &[Comment], labels: &PageLabels) {
    if comments.is_empty() {
        println!("No comments");
        return;
    }

    for comment in comments {
        let line = comment
            .line_no
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let section = comment.section_title.as_deref().unwrap_or("");
        println!(
            "  p. {:<5} line {:<4} {}  {} ({})",
            labels.display_label(comment.page),
            line,
            section,
            comment.user_name,
            comment.created_at.format("%Y-%m-%d %H:%M"),
        );
        if let Some(region) = &comment.region {
            println!(
                "    region [{:.1}, {:.1}, {:.1}, {:.1}]",
                region.x_min, region.y_min, region.x_max, region.y_max
            );
        }
        println!("    {}", comment.body);
    }
}
