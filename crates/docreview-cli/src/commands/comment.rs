use super::{find_file, open_workspace, Context};
use crate::output;
use docreview_core::comments::{add_comment, NewComment};
use docreview_core::error::DocReviewError;
use docreview_core::extraction::load_page_items;
use docreview_core::model::BBox;
use docreview_core::store::Repository;
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub struct AddArgs {
    pub file_id: String,

    /// Comment text
    pub body: String,

    /// 1-based page
    #[arg(short, long)]
    pub page: u32,

    /// Line number, if already known
    #[arg(short, long, conflicts_with = "y")]
    pub line: Option<u32>,

    /// Click position; the nearest indexed line of --items is used
    #[arg(short, long, requires = "items", allow_hyphen_values = true)]
    pub y: Option<f64>,

    /// PDF or JSON page item dump to index for --y
    #[arg(long, value_name = "FILE")]
    pub items: Option<PathBuf>,

    /// Section id from the document's outline (needs --manifest)
    #[arg(short, long, requires = "manifest")]
    pub section: Option<String>,

    /// Document manifest with the outline
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Marked region: X_MIN Y_MIN X_MAX Y_MAX
    #[arg(long, num_args = 4, value_names = ["X_MIN", "Y_MIN", "X_MAX", "Y_MAX"], allow_hyphen_values = true)]
    pub region: Option<Vec<f64>>,
}

pub fn add(ctx: &Context, args: AddArgs) -> Result<(), DocReviewError> {
    let mut repo = ctx.repo();
    let file = find_file(&repo, &args.file_id)?;
    let mut workspace = open_workspace(ctx, &file, args.manifest.as_deref());

    let mut draft = NewComment::new(&file.id, args.page, args.body);
    draft.section_id = args.section;
    draft.line_no = args.line;

    if let (Some(y), Some(items_path)) = (args.y, args.items.as_deref()) {
        let pages = load_page_items(items_path)?;
        let page = pages.iter().find(|p| p.page == args.page).ok_or_else(|| {
            DocReviewError::InvalidInput(format!(
                "{} has no page {}",
                items_path.display(),
                args.page
            ))
        })?;
        draft.line_no = workspace.line_at(page, y).map(|line| line.line_no);
        if draft.line_no.is_none() {
            eprintln!("  note: no line near y={y}, comment is not bound to a line");
        }
    }

    if let Some(region) = args.region {
        if let &[x_min, y_min, x_max, y_max] = region.as_slice() {
            draft = draft.with_region(BBox {
                x_min,
                y_min,
                x_max,
                y_max,
            });
        }
    }

    let comment = add_comment(&mut repo, draft, workspace.sections())?;
    println!("Added comment {} on page {}", comment.id, comment.page);
    Ok(())
}

pub fn list(
    ctx: &Context,
    file_id: &str,
    manifest: Option<&Path>,
    output_format: &str,
) -> Result<(), DocReviewError> {
    let repo = ctx.repo();
    let file = find_file(&repo, file_id)?;
    let comments = repo.list_comments(&file.id)?;

    match output_format {
        "json" => output::json::print(&comments),
        _ => {
            let workspace = open_workspace(ctx, &file, manifest);
            output::table::print_comments(&comments, workspace.labels());
            Ok(())
        }
    }
}
