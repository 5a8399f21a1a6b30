//! Persistence of the user, the document library and the comment log.
//!
//! Storage engines only know how to load and save one [`StateBlob`]; the typed
//! [`Repository`] operations are implemented once on top of that, reading the
//! whole blob on every access and rewriting it on every mutation.

pub mod json_file;
pub mod memory;

use crate::error::DocReviewError;
use crate::model::{Comment, FileMeta, User};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

/// Everything that is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub files: Vec<FileMeta>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A storage engine for the state blob. Last writer wins.
pub trait BlobStore {
    fn load(&self) -> Result<StateBlob, DocReviewError>;
    fn save(&mut self, blob: &StateBlob) -> Result<(), DocReviewError>;
}

pub trait Repository {
    fn current_user(&self) -> Result<Option<User>, DocReviewError>;
    fn set_user(&mut self, user: User) -> Result<(), DocReviewError>;
    fn clear_user(&mut self) -> Result<(), DocReviewError>;

    fn list_files(&self) -> Result<Vec<FileMeta>, DocReviewError>;
    fn find_file(&self, file_id: &str) -> Result<Option<FileMeta>, DocReviewError>;
    fn add_file(&mut self, file: FileMeta) -> Result<(), DocReviewError>;
    /// Remove a file and every comment attached to it. Returns false when
    /// the file was unknown.
    fn delete_file(&mut self, file_id: &str) -> Result<bool, DocReviewError>;

    /// Comments of one file, oldest first.
    fn list_comments(&self, file_id: &str) -> Result<Vec<Comment>, DocReviewError>;
    fn append_comment(&mut self, comment: Comment) -> Result<(), DocReviewError>;
}

impl<S: BlobStore> Repository for S {
    fn current_user(&self) -> Result<Option<User>, DocReviewError> {
        Ok(self.load()?.user)
    }

    fn set_user(&mut self, user: User) -> Result<(), DocReviewError> {
        let mut blob = self.load()?;
        log::info!("logged in as {} <{}>", user.name, user.email);
        blob.user = Some(user);
        self.save(&blob)
    }

    fn clear_user(&mut self) -> Result<(), DocReviewError> {
        let mut blob = self.load()?;
        blob.user = None;
        self.save(&blob)
    }

    fn list_files(&self) -> Result<Vec<FileMeta>, DocReviewError> {
        Ok(self.load()?.files)
    }

    fn find_file(&self, file_id: &str) -> Result<Option<FileMeta>, DocReviewError> {
        Ok(self.load()?.files.into_iter().find(|f| f.id == file_id))
    }

    fn add_file(&mut self, file: FileMeta) -> Result<(), DocReviewError> {
        let mut blob = self.load()?;
        log::info!("added file {} ({})", file.name, file.id);
        blob.files.push(file);
        self.save(&blob)
    }

    fn delete_file(&mut self, file_id: &str) -> Result<bool, DocReviewError> {
        let mut blob = self.load()?;
        let before = blob.files.len();
        blob.files.retain(|f| f.id != file_id);
        if blob.files.len() == before {
            return Ok(false);
        }
        let comments_before = blob.comments.len();
        blob.comments.retain(|c| c.file_id != file_id);
        log::info!(
            "deleted file {file_id} and {} comment(s)",
            comments_before - blob.comments.len()
        );
        self.save(&blob)?;
        Ok(true)
    }

    fn list_comments(&self, file_id: &str) -> Result<Vec<Comment>, DocReviewError> {
        Ok(self
            .load()?
            .comments
            .into_iter()
            .filter(|c| c.file_id == file_id)
            .collect())
    }

    fn append_comment(&mut self, comment: Comment) -> Result<(), DocReviewError> {
        let mut blob = self.load()?;
        log::debug!("appending comment {} to file {}", comment.id, comment.file_id);
        blob.comments.push(comment);
        self.save(&blob)
    }
}

/// A fresh identifier such as `c_k3x9a0q`.
pub fn new_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{prefix}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn file(id: &str) -> FileMeta {
        FileMeta {
            id: id.into(),
            name: format!("{id}.pdf"),
            path: format!("/docs/{id}.pdf"),
            created_at: Utc::now(),
        }
    }

    fn comment(id: &str, file_id: &str) -> Comment {
        Comment {
            id: id.into(),
            file_id: file_id.into(),
            section_id: None,
            section_title: None,
            page: 1,
            line_no: None,
            body: "note".into(),
            user_id: "u_1".into(),
            user_name: "ana".into(),
            created_at: Utc::now(),
            kind: None,
            region: None,
        }
    }

    #[test]
    fn user_round_trip() {
        let mut repo = MemoryRepository::new();
        assert!(repo.current_user().unwrap().is_none());
        let user = User {
            id: "u_1".into(),
            name: "ana".into(),
            email: "ana@example.com".into(),
        };
        repo.set_user(user.clone()).unwrap();
        assert_eq!(repo.current_user().unwrap(), Some(user));
        repo.clear_user().unwrap();
        assert!(repo.current_user().unwrap().is_none());
    }

    #[test]
    fn delete_file_cascades_to_comments() {
        let mut repo = MemoryRepository::new();
        repo.add_file(file("f_a")).unwrap();
        repo.add_file(file("f_b")).unwrap();
        repo.append_comment(comment("c_1", "f_a")).unwrap();
        repo.append_comment(comment("c_2", "f_b")).unwrap();
        repo.append_comment(comment("c_3", "f_a")).unwrap();

        assert!(repo.delete_file("f_a").unwrap());
        assert_eq!(repo.list_files().unwrap().len(), 1);
        assert!(repo.list_comments("f_a").unwrap().is_empty());
        assert_eq!(repo.list_comments("f_b").unwrap().len(), 1);
    }

    #[test]
    fn deleting_unknown_file_is_a_no_op() {
        let mut repo = MemoryRepository::new();
        repo.append_comment(comment("c_1", "f_ghost")).unwrap();
        assert!(!repo.delete_file("f_ghost").unwrap());
        assert_eq!(repo.list_comments("f_ghost").unwrap().len(), 1);
    }

    #[test]
    fn comments_keep_insertion_order() {
        let mut repo = MemoryRepository::new();
        for id in ["c_1", "c_2", "c_3"] {
            repo.append_comment(comment(id, "f_a")).unwrap();
        }
        let ids: Vec<String> = repo
            .list_comments("f_a")
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["c_1", "c_2", "c_3"]);
    }

    #[test]
    fn ids_have_prefix_and_suffix() {
        let id = new_id("c");
        assert!(id.starts_with("c_"));
        assert_eq!(id.len(), 9);
        assert!(id[2..].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
