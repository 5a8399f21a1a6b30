//! Comment creation: validation and denormalization of the section title.

use crate::error::DocReviewError;
use crate::model::{BBox, Comment, CommentKind, Section, User};
use crate::store::{new_id, Repository};
use chrono::{DateTime, Utc};

/// A comment as the user entered it, before it is attributed and stamped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewComment {
    pub file_id: String,
    pub section_id: Option<String>,
    /// 1-based page.
    pub page: u32,
    pub line_no: Option<u32>,
    pub body: String,
    pub kind: Option<CommentKind>,
    pub region: Option<BBox>,
}

impl NewComment {
    pub fn new(file_id: impl Into<String>, page: u32, body: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            page,
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn in_section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }

    pub fn at_line(mut self, line_no: u32) -> Self {
        self.line_no = Some(line_no);
        self
    }

    pub fn with_region(mut self, region: BBox) -> Self {
        self.kind = Some(CommentKind::Region);
        self.region = Some(region);
        self
    }
}

/// Validate a draft and turn it into a stored comment authored by `user`.
pub fn build_comment(
    draft: NewComment,
    sections: &[Section],
    user: &User,
    now: DateTime<Utc>,
) -> Result<Comment, DocReviewError> {
    let body = draft.body.trim();
    if body.is_empty() {
        return Err(DocReviewError::InvalidInput(
            "comment body must not be empty".into(),
        ));
    }
    if draft.page == 0 {
        return Err(DocReviewError::InvalidInput("pages are numbered from 1".into()));
    }
    if draft.kind == Some(CommentKind::Region) && draft.region.is_none() {
        return Err(DocReviewError::InvalidInput(
            "region comments need a bounding box".into(),
        ));
    }

    let section_title = match &draft.section_id {
        Some(id) => {
            let section = sections
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| DocReviewError::UnknownSection(id.clone()))?;
            Some(section.title.clone())
        }
        None => None,
    };

    Ok(Comment {
        id: new_id("c"),
        file_id: draft.file_id,
        section_id: draft.section_id,
        section_title,
        page: draft.page,
        line_no: draft.line_no,
        body: body.to_string(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        created_at: now,
        kind: draft.kind,
        region: draft.region,
    })
}

/// Attribute a draft to the logged-in user and append it to the file's log.
pub fn add_comment(
    repo: &mut dyn Repository,
    draft: NewComment,
    sections: &[Section],
) -> Result<Comment, DocReviewError> {
    let user = repo.current_user()?.ok_or(DocReviewError::NotLoggedIn)?;
    if repo.find_file(&draft.file_id)?.is_none() {
        return Err(DocReviewError::UnknownFile(draft.file_id));
    }
    let comment = build_comment(draft, sections, &user, Utc::now())?;
    repo.append_comment(comment.clone())?;
    Ok(comment)
}
