pub mod anchors;
pub mod comments;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod outline;
pub mod schedule;
pub mod store;
pub mod workspace;

use chrono::Utc;
use config::IndexConfig;
use error::DocReviewError;
use extraction::TextSource;
use layout::PageLineIndex;
use model::{FileMeta, User};
use std::path::Path;
use store::{new_id, Repository};

/// Main API entry point: build the line index of every page of a PDF.
pub fn index_pdf(
    pdf_bytes: &[u8],
    source: &dyn TextSource,
    config: &IndexConfig,
) -> Result<Vec<PageLineIndex>, DocReviewError> {
    let pages = source.page_items(pdf_bytes)?;
    log::debug!("{} returned {} page(s)", source.backend_name(), pages.len());

    Ok(pages
        .iter()
        .map(|page| PageLineIndex::build(page.page, &page.items, config))
        .collect())
}

/// Local login: the display name is the email's local part.
pub fn login(repo: &mut dyn Repository, email: &str) -> Result<User, DocReviewError> {
    let email = email.trim();
    let name = email.split('@').next().unwrap_or_default();
    if email.is_empty() || name.is_empty() {
        return Err(DocReviewError::InvalidInput("email must not be empty".into()));
    }

    let user = User {
        id: new_id("u"),
        name: name.to_string(),
        email: email.to_string(),
    };
    repo.set_user(user.clone())?;
    Ok(user)
}

pub fn logout(repo: &mut dyn Repository) -> Result<(), DocReviewError> {
    repo.clear_user()
}

/// Register a PDF in the library. Requires a logged-in user.
pub fn upload_document(repo: &mut dyn Repository, path: &Path) -> Result<FileMeta, DocReviewError> {
    if repo.current_user()?.is_none() {
        return Err(DocReviewError::NotLoggedIn);
    }
    if !path.is_file() {
        return Err(DocReviewError::InvalidInput(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let absolute = std::fs::canonicalize(path)?;
    let file = FileMeta {
        id: new_id("f"),
        name,
        path: absolute.display().to_string(),
        created_at: Utc::now(),
    };
    repo.add_file(file.clone())?;
    Ok(file)
}

/// Remove a file and its comments.
pub fn remove_document(repo: &mut dyn Repository, file_id: &str) -> Result<(), DocReviewError> {
    if repo.delete_file(file_id)? {
        Ok(())
    } else {
        Err(DocReviewError::UnknownFile(file_id.to_string()))
    }
}
