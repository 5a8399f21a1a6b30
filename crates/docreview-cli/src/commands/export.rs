use super::{find_file, open_workspace, Context};
use docreview_core::error::DocReviewError;
use docreview_core::export::{export_filename, export_rows, write_csv};
use docreview_core::store::Repository;
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn run(
    ctx: &Context,
    file_id: &str,
    manifest: Option<&Path>,
    out: Option<PathBuf>,
) -> Result<(), DocReviewError> {
    let repo = ctx.repo();
    let file = find_file(&repo, file_id)?;
    let workspace = open_workspace(ctx, &file, manifest);
    let out = out.unwrap_or_else(|| PathBuf::from(export_filename(&file.name)));

    let written = if workspace.document().is_some() {
        workspace.export_comments(&repo, File::create(&out)?)?
    } else {
        let comments = repo.list_comments(&file.id)?;
        write_csv(&export_rows(&comments, workspace.labels()), File::create(&out)?)?
    };

    eprintln!("Exported {written} comment(s) to {}", out.display());
    Ok(())
}
