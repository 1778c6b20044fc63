//! In-memory `CatalogStore` used by tests. Mirrors the Postgres
//! implementation's semantics: unique constraints, insert-if-absent
//! provisioning, and deterministic orderings.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use super::models::{Branch, Lecturer, Semester, Subject, User, Video};
use super::store::{CatalogStore, NewSubject, NewUser, NewVideo, StoreError, VideoPatch};

#[derive(Default)]
pub struct MemCatalog {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    branches: Vec<Branch>,
    semesters: Vec<Semester>,
    subjects: Vec<Subject>,
    lecturers: Vec<Lecturer>,
    videos: Vec<Video>,
}

// Fixture helpers for test setup, outside the trait on purpose.
impl MemCatalog {
    pub fn add_branch(&self, name: &str, code: &str, is_active: bool) -> Branch {
        let branch = Branch {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            is_active,
            coming_soon: !is_active,
        };
        self.inner.lock().unwrap().branches.push(branch.clone());
        branch
    }

    pub fn add_semester(&self, branch_id: Uuid, number: i32) -> Semester {
        let semester = Semester {
            id: Uuid::new_v4(),
            number,
            branch_id,
        };
        self.inner.lock().unwrap().semesters.push(semester.clone());
        semester
    }

    pub fn add_subject(&self, name: &str, semester_id: Uuid, branch_id: Uuid) -> Subject {
        let subject = Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} description"),
            semester_id,
            branch_id,
        };
        self.inner.lock().unwrap().subjects.push(subject.clone());
        subject
    }

    pub fn add_lecturer(&self, name: &str) -> Lecturer {
        let lecturer = Lecturer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            title: "Professor".to_string(),
            institution: "Test University".to_string(),
            image_url: None,
        };
        self.inner.lock().unwrap().lecturers.push(lecturer.clone());
        lecturer
    }

    pub fn semester_count(&self, branch_id: Uuid, number: i32) -> usize {
        self.inner
            .lock()
            .unwrap()
            .semesters
            .iter()
            .filter(|s| s.branch_id == branch_id && s.number == number)
            .count()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemCatalog {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.inner.lock().unwrap();
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username"));
        }
        let row = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn all_branches(&self) -> Result<Vec<Branch>, StoreError> {
        let t = self.inner.lock().unwrap();
        let mut rows = t.branches.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_branch(&self, id: Uuid) -> Result<Option<Branch>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.branches.iter().find(|b| b.id == id).cloned())
    }

    async fn get_branch_by_code(&self, code: &str) -> Result<Option<Branch>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.branches.iter().find(|b| b.code == code).cloned())
    }

    async fn semesters_by_branch(&self, branch_id: Uuid) -> Result<Vec<Semester>, StoreError> {
        let t = self.inner.lock().unwrap();
        let mut rows: Vec<Semester> = t
            .semesters
            .iter()
            .filter(|s| s.branch_id == branch_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.number);
        Ok(rows)
    }

    async fn get_semester(&self, id: Uuid) -> Result<Option<Semester>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.semesters.iter().find(|s| s.id == id).cloned())
    }

    async fn find_semester(
        &self,
        branch_id: Uuid,
        number: i32,
    ) -> Result<Option<Semester>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.semesters
            .iter()
            .find(|s| s.branch_id == branch_id && s.number == number)
            .cloned())
    }

    async fn ensure_semester(&self, branch_id: Uuid, number: i32) -> Result<Semester, StoreError> {
        // Check-then-insert under one lock, like the unique index upsert.
        let mut t = self.inner.lock().unwrap();
        if let Some(existing) = t
            .semesters
            .iter()
            .find(|s| s.branch_id == branch_id && s.number == number)
        {
            return Ok(existing.clone());
        }
        let row = Semester {
            id: Uuid::new_v4(),
            number,
            branch_id,
        };
        t.semesters.push(row.clone());
        Ok(row)
    }

    async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.subjects.iter().find(|s| s.id == id).cloned())
    }

    async fn subjects_by_semester(
        &self,
        semester_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<Subject>, StoreError> {
        let t = self.inner.lock().unwrap();
        let mut rows: Vec<Subject> = t
            .subjects
            .iter()
            .filter(|s| s.semester_id == semester_id && s.branch_id == branch_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_subject(&self, subject: NewSubject) -> Result<Subject, StoreError> {
        let mut t = self.inner.lock().unwrap();
        if t.subjects
            .iter()
            .any(|s| s.name == subject.name && s.semester_id == subject.semester_id)
        {
            return Err(StoreError::Conflict("subject"));
        }
        let row = Subject {
            id: Uuid::new_v4(),
            name: subject.name,
            description: subject.description,
            semester_id: subject.semester_id,
            branch_id: subject.branch_id,
        };
        t.subjects.push(row.clone());
        Ok(row)
    }

    async fn create_subject_if_absent(
        &self,
        subject: NewSubject,
    ) -> Result<Option<Subject>, StoreError> {
        let mut t = self.inner.lock().unwrap();
        if t.subjects
            .iter()
            .any(|s| s.name == subject.name && s.semester_id == subject.semester_id)
        {
            return Ok(None);
        }
        let row = Subject {
            id: Uuid::new_v4(),
            name: subject.name,
            description: subject.description,
            semester_id: subject.semester_id,
            branch_id: subject.branch_id,
        };
        t.subjects.push(row.clone());
        Ok(Some(row))
    }

    async fn all_lecturers(&self) -> Result<Vec<Lecturer>, StoreError> {
        let t = self.inner.lock().unwrap();
        let mut rows = t.lecturers.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_lecturer(&self, id: Uuid) -> Result<Option<Lecturer>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.lecturers.iter().find(|l| l.id == id).cloned())
    }

    async fn lecturers_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Lecturer>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.lecturers
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect())
    }

    async fn videos_by_subject(&self, subject_id: Uuid) -> Result<Vec<Video>, StoreError> {
        let t = self.inner.lock().unwrap();
        let mut rows: Vec<Video> = t
            .videos
            .iter()
            .filter(|v| v.subject_id == subject_id)
            .cloned()
            .collect();
        // published_at desc with nulls last (None < Some), then id asc.
        rows.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, StoreError> {
        let t = self.inner.lock().unwrap();
        Ok(t.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError> {
        let mut t = self.inner.lock().unwrap();
        let row = Video {
            id: Uuid::new_v4(),
            title: video.title,
            description: video.description,
            youtube_id: video.youtube_id,
            duration: video.duration,
            subject_id: video.subject_id,
            lecturer_id: video.lecturer_id,
            published_at: Some(video.published_at.unwrap_or_else(|| Utc::now().naive_utc())),
        };
        t.videos.push(row.clone());
        Ok(row)
    }

    async fn update_video(
        &self,
        id: Uuid,
        patch: VideoPatch,
    ) -> Result<Option<Video>, StoreError> {
        let mut t = self.inner.lock().unwrap();
        let Some(video) = t.videos.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            video.title = title;
        }
        if let Some(description) = patch.description {
            video.description = description;
        }
        if let Some(youtube_id) = patch.youtube_id {
            video.youtube_id = youtube_id;
        }
        if let Some(duration) = patch.duration {
            video.duration = duration;
        }
        if let Some(subject_id) = patch.subject_id {
            video.subject_id = subject_id;
        }
        if let Some(lecturer_id) = patch.lecturer_id {
            video.lecturer_id = lecturer_id;
        }
        if let Some(published_at) = patch.published_at {
            video.published_at = Some(published_at);
        }
        Ok(Some(video.clone()))
    }

    async fn delete_video(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.inner.lock().unwrap();
        let before = t.videos.len();
        t.videos.retain(|v| v.id != id);
        Ok(t.videos.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ROLE_STUDENT;

    fn sample_video(subject_id: Uuid, lecturer_id: Uuid) -> NewVideo {
        NewVideo {
            title: "Introduction to Calculus".to_string(),
            description: Some("Limits, derivatives, and integrals".to_string()),
            youtube_id: "dQw4w9WgXcQ".to_string(),
            duration: 3600,
            subject_id,
            lecturer_id,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn created_video_round_trips_through_get() {
        let store = MemCatalog::default();
        let branch = store.add_branch("Computer Science Engineering", "CSE", true);
        let semester = store.add_semester(branch.id, 1);
        let subject = store.add_subject("Physics", semester.id, branch.id);
        let lecturer = store.add_lecturer("Dr. John Smith");

        let input = sample_video(subject.id, lecturer.id);
        let created = store.create_video(input.clone()).await.unwrap();
        let fetched = store.get_video(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, input.title);
        assert_eq!(fetched.description, input.description);
        assert_eq!(fetched.youtube_id, input.youtube_id);
        assert_eq!(fetched.duration, input.duration);
        assert_eq!(fetched.subject_id, input.subject_id);
        assert_eq!(fetched.lecturer_id, input.lecturer_id);
        // Generated fields: id assigned, publishedAt defaulted.
        assert_eq!(fetched.id, created.id);
        assert!(fetched.published_at.is_some());
    }

    #[tokio::test]
    async fn empty_patch_returns_unchanged_row() {
        let store = MemCatalog::default();
        let created = store
            .create_video(sample_video(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        let updated = store
            .update_video(created.id, VideoPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.duration, created.duration);
    }

    #[tokio::test]
    async fn patch_updates_only_supplied_fields() {
        let store = MemCatalog::default();
        let created = store
            .create_video(sample_video(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        let patch = VideoPatch {
            title: Some("Limits and Continuity".to_string()),
            description: Some(None),
            ..Default::default()
        };
        let updated = store.update_video(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.title, "Limits and Continuity");
        assert_eq!(updated.description, None);
        assert_eq!(updated.youtube_id, created.youtube_id);
        assert_eq!(updated.duration, created.duration);
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_video_report_not_found() {
        let store = MemCatalog::default();
        let missing = Uuid::new_v4();

        let updated = store
            .update_video(missing, VideoPatch::default())
            .await
            .unwrap();
        assert!(updated.is_none());

        let deleted = store.delete_video(missing).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = MemCatalog::default();
        let user = NewUser {
            username: "amara".to_string(),
            password_hash: "x".to_string(),
            role: ROLE_STUDENT.to_string(),
        };
        store.create_user(user.clone()).await.unwrap();
        let err = store.create_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("username")));
    }
}
