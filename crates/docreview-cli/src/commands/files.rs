use super::Context;
use crate::output;
use docreview_core::error::DocReviewError;
use docreview_core::store::Repository;
use std::path::Path;

pub fn list(ctx: &Context, output_format: &str) -> Result<(), DocReviewError> {
    let files = ctx.repo().list_files()?;
    match output_format {
        "json" => output::json::print(&files),
        _ => {
            output::table::print_files(&files);
            Ok(())
        }
    }
}

pub fn add(ctx: &Context, path: &Path) -> Result<(), DocReviewError> {
    let mut repo = ctx.repo();
    let file = docreview_core::upload_document(&mut repo, path)?;
    println!("Added {} as {}", file.name, file.id);
    Ok(())
}

pub fn remove(ctx: &Context, file_id: &str) -> Result<(), DocReviewError> {
    let mut repo = ctx.repo();
    docreview_core::remove_document(&mut repo, file_id)?;
    println!("Removed {file_id} and its comments");
    Ok(())
}
