use super::Context;
use crate::output;
use docreview_core::anchors::{apply_jump, plan_jump, GeometryProvider, SectionAnchorMap, StaticLayout};
use docreview_core::error::DocReviewError;
use serde_json::json;
use std::path::Path;

/// A continuous vertical page stack, every page the same size.
#[derive(clap::Args)]
pub struct LayoutArgs {
    /// Render scale
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Page width in PDF units
    #[arg(long, default_value_t = 612.0)]
    pub page_width: f64,

    /// Page height in PDF units
    #[arg(long, default_value_t = 792.0)]
    pub page_height: f64,

    /// Gap above every page
    #[arg(long, default_value_t = 10.0)]
    pub gap: f64,

    /// Visible viewport height
    #[arg(long, default_value_t = 800.0)]
    pub viewport: f64,

    /// Scroll offset of the viewport's top edge
    #[arg(long, default_value_t = 0.0)]
    pub scroll: f64,
}

pub fn run(
    ctx: &Context,
    manifest_path: &Path,
    layout_args: &LayoutArgs,
    jump: Option<&str>,
    output_format: &str,
) -> Result<(), DocReviewError> {
    if layout_args.scale <= 0.0 || layout_args.viewport <= 0.0 {
        return Err(DocReviewError::InvalidInput(
            "scale and viewport must be positive".into(),
        ));
    }

    let (manifest, sections, _) = super::sections::load(manifest_path)?;
    let mut layout = StaticLayout::uniform(
        manifest.page_count,
        layout_args.page_width,
        layout_args.page_height,
        layout_args.scale,
        layout_args.gap,
        layout_args.viewport,
    );
    layout.scroll_to(layout_args.scroll);

    let mut anchors = SectionAnchorMap::new();
    anchors.refresh(&sections, &layout);

    let jump_action = match jump {
        Some(section_id) => {
            let section = sections
                .iter()
                .find(|s| s.id == section_id)
                .ok_or_else(|| DocReviewError::UnknownSection(section_id.to_string()))?;
            let action = plan_jump(
                section,
                &anchors,
                layout.viewport_height(),
                ctx.config.anchors.jump_offset_fraction,
            );
            apply_jump(&action, &mut layout);
            Some(action)
        }
        None => None,
    };
    let active = anchors.active_in(&layout).map(|a| a.section_id.clone());

    match output_format {
        "json" => output::json::print(&json!({
            "anchors": anchors.anchors(),
            "active_section": active,
            "scroll_top": layout.scroll_top(),
            "page": layout.page_at(layout.scroll_top()),
        })),
        _ => {
            output::table::print_anchors(&anchors, &sections, active.as_deref());
            if let Some(action) = jump_action {
                println!("\n  Jump: {action:?}");
            }
            println!(
                "  Viewport top {:.1} (page {})",
                layout.scroll_top(),
                layout.page_at(layout.scroll_top())
            );
            Ok(())
        }
    }
}
