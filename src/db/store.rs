use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use super::models::{Branch, Lecturer, Semester, Subject, User, Video};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("{0} already exists")]
    Conflict(&'static str),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    pub name: String,
    pub description: String,
    pub semester_id: Uuid,
    pub branch_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub youtube_id: String,
    pub duration: i32,
    pub subject_id: Uuid,
    pub lecturer_id: Uuid,
    pub published_at: Option<NaiveDateTime>,
}

/// Partial video update. Absent fields are left untouched; `description`
/// distinguishes "absent" from an explicit null.
#[derive(Debug, Clone, Default, Deserialize, diesel::AsChangeset)]
#[diesel(table_name = crate::db::schema::videos)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    pub youtube_id: Option<String>,
    pub duration: Option<i32>,
    pub subject_id: Option<Uuid>,
    pub lecturer_id: Option<Uuid>,
    pub published_at: Option<NaiveDateTime>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.youtube_id.is_none()
            && self.duration.is_none()
            && self.subject_id.is_none()
            && self.lecturer_id.is_none()
            && self.published_at.is_none()
    }
}

/// Typed access to the catalog tables. Lookups return `None`/empty for
/// missing rows; `StoreError` is reserved for genuine storage failures.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    // Users
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    // Branches
    async fn all_branches(&self) -> Result<Vec<Branch>, StoreError>;
    async fn get_branch(&self, id: Uuid) -> Result<Option<Branch>, StoreError>;
    async fn get_branch_by_code(&self, code: &str) -> Result<Option<Branch>, StoreError>;

    // Semesters
    async fn semesters_by_branch(&self, branch_id: Uuid) -> Result<Vec<Semester>, StoreError>;
    async fn get_semester(&self, id: Uuid) -> Result<Option<Semester>, StoreError>;
    async fn find_semester(
        &self,
        branch_id: Uuid,
        number: i32,
    ) -> Result<Option<Semester>, StoreError>;
    /// Insert-if-absent on `(branch_id, number)`. Concurrent callers
    /// converge on a single row.
    async fn ensure_semester(&self, branch_id: Uuid, number: i32) -> Result<Semester, StoreError>;

    // Subjects
    async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>, StoreError>;
    /// Subjects whose `semester_id` and `branch_id` both match.
    async fn subjects_by_semester(
        &self,
        semester_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<Subject>, StoreError>;
    async fn create_subject(&self, subject: NewSubject) -> Result<Subject, StoreError>;
    /// Insert-if-absent on `(name, semester_id)`; `None` when the subject
    /// already existed.
    async fn create_subject_if_absent(
        &self,
        subject: NewSubject,
    ) -> Result<Option<Subject>, StoreError>;

    // Lecturers
    async fn all_lecturers(&self) -> Result<Vec<Lecturer>, StoreError>;
    async fn get_lecturer(&self, id: Uuid) -> Result<Option<Lecturer>, StoreError>;
    async fn lecturers_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Lecturer>, StoreError>;

    // Videos
    /// Ordered by `published_at` descending (nulls last), then `id`.
    async fn videos_by_subject(&self, subject_id: Uuid) -> Result<Vec<Video>, StoreError>;
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, StoreError>;
    /// `published_at` defaults to the current time when unset.
    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError>;
    /// `None` when no such video exists. An empty patch returns the row
    /// unchanged.
    async fn update_video(&self, id: Uuid, patch: VideoPatch)
        -> Result<Option<Video>, StoreError>;
    /// `false` when no such video exists.
    async fn delete_video(&self, id: Uuid) -> Result<bool, StoreError>;
}
