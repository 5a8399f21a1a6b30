use super::Context;
use crate::output;
use docreview_core::error::DocReviewError;
use docreview_core::extraction::{load_page_items, source_for_path};
use docreview_core::layout::PageLineIndex;
use std::path::Path;

pub fn run(
    ctx: &Context,
    input_file: &Path,
    page: Option<u32>,
    output_format: &str,
) -> Result<(), DocReviewError> {
    let bytes = std::fs::read(input_file)?;
    let source = source_for_path(input_file);
    let mut indices = docreview_core::index_pdf(&bytes, source.as_ref(), &ctx.config.index)?;

    if let Some(page) = page {
        indices.retain(|index| index.page == page);
        if indices.is_empty() {
            return Err(DocReviewError::InvalidInput(format!(
                "{} has no page {page}",
                input_file.display()
            )));
        }
    }

    match output_format {
        "json" => output::json::print(&indices),
        _ => {
            output::table::print_line_indices(&indices);
            Ok(())
        }
    }
}

pub fn locate(
    ctx: &Context,
    input_file: &Path,
    page: u32,
    y: f64,
    radius: Option<f64>,
) -> Result<(), DocReviewError> {
    let pages = load_page_items(input_file)?;
    let items = pages.iter().find(|p| p.page == page).ok_or_else(|| {
        DocReviewError::InvalidInput(format!("{} has no page {page}", input_file.display()))
    })?;

    let radius = radius.unwrap_or(ctx.config.locate_radius);
    let index = PageLineIndex::build(page, &items.items, &ctx.config.index);
    match index.nearest(y, radius) {
        Some(line) => output::table::print_line(line),
        None => println!("No line within {radius} of y={y} on page {page}"),
    }
    Ok(())
}
