pub mod anchors;
pub mod comment;
pub mod export;
pub mod files;
pub mod index;
pub mod sections;
pub mod session;

use docreview_core::config::{load_config, ReviewConfig};
use docreview_core::error::DocReviewError;
use docreview_core::model::FileMeta;
use docreview_core::outline::ManifestLoader;
use docreview_core::store::{JsonFileRepository, Repository};
use docreview_core::workspace::{LoadOutcome, Workspace};
use std::path::{Path, PathBuf};

/// Settings shared by every subcommand.
pub struct Context {
    pub config: ReviewConfig,
    pub store_path: PathBuf,
}

impl Context {
    pub fn load(config_path: Option<&Path>, store: Option<&Path>) -> Result<Self, DocReviewError> {
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => ReviewConfig::default(),
        };
        let store_path = config.resolve_store_path(store);
        log::debug!("using state file {}", store_path.display());
        Ok(Self { config, store_path })
    }

    pub fn repo(&self) -> JsonFileRepository {
        JsonFileRepository::new(&self.store_path)
    }
}

pub fn find_file(repo: &dyn Repository, file_id: &str) -> Result<FileMeta, DocReviewError> {
    repo.find_file(file_id)?
        .ok_or_else(|| DocReviewError::UnknownFile(file_id.to_string()))
}

/// A workspace for `file`, with its outline and labels when a manifest is
/// given. A manifest that fails to load leaves raw page numbers and no
/// sections.
pub fn open_workspace(
    ctx: &Context,
    file: &FileMeta,
    manifest: Option<&Path>,
) -> Workspace {
    let mut workspace = Workspace::new(ctx.config.clone());
    if let Some(path) = manifest {
        if workspace.open_document(file, &ManifestLoader::new(path)) != LoadOutcome::Loaded {
            eprintln!("  warning: manifest not used, showing raw page numbers");
        }
    }
    workspace
}
