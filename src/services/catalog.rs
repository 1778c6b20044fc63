//! Hierarchy resolution and lecturer enrichment over a `CatalogStore`.

use uuid::Uuid;

use crate::db::models::{Lecturer, Subject, Video, VideoWithLecturer};
use crate::db::store::{CatalogStore, NewSubject, StoreError};
use crate::error::ApiError;

use super::seed;

/// Resolve `(branch, semester number)` to the semester's subject list,
/// provisioning the semester row on first access. Both `semester_id` and
/// `branch_id` must match for a subject to be included.
pub async fn resolve_subjects(
    store: &dyn CatalogStore,
    branch_id: Uuid,
    semester_number: i32,
) -> Result<Vec<Subject>, StoreError> {
    if let Some(semester) = store.find_semester(branch_id, semester_number).await? {
        return store.subjects_by_semester(semester.id, branch_id).await;
    }

    log::info!("semester {semester_number} missing for branch {branch_id}, provisioning");
    let semester = store.ensure_semester(branch_id, semester_number).await?;
    seed::seed_semester_subjects(store, &semester).await?;
    // Re-read rather than returning what we inserted: a racing resolver may
    // have seeded first.
    store.subjects_by_semester(semester.id, branch_id).await
}

/// Create a professor-authored subject, holding the invariant that the
/// subject's branch matches its parent semester's branch.
pub async fn create_subject(
    store: &dyn CatalogStore,
    subject: NewSubject,
) -> Result<Subject, ApiError> {
    let semester = store
        .get_semester(subject.semester_id)
        .await?
        .ok_or(ApiError::NotFound("semester"))?;
    if semester.branch_id != subject.branch_id {
        return Err(ApiError::Validation(
            "branchId does not match the semester's branch".to_string(),
        ));
    }
    Ok(store.create_subject(subject).await?)
}

/// A subject's videos, each joined with its lecturer. A dangling
/// `lecturerId` yields `lecturer: null` for that video only.
pub async fn videos_with_lecturers(
    store: &dyn CatalogStore,
    subject_id: Uuid,
) -> Result<Vec<VideoWithLecturer>, StoreError> {
    let videos = store.videos_by_subject(subject_id).await?;
    let mut lecturer_ids: Vec<Uuid> = videos.iter().map(|v| v.lecturer_id).collect();
    lecturer_ids.sort_unstable();
    lecturer_ids.dedup();
    let lecturers = store.lecturers_by_ids(lecturer_ids).await?;

    Ok(videos
        .into_iter()
        .map(|video| attach_lecturer(video, &lecturers))
        .collect())
}

pub async fn video_with_lecturer(
    store: &dyn CatalogStore,
    video_id: Uuid,
) -> Result<Option<VideoWithLecturer>, StoreError> {
    let Some(video) = store.get_video(video_id).await? else {
        return Ok(None);
    };
    let lecturer = store.get_lecturer(video.lecturer_id).await?;
    Ok(Some(VideoWithLecturer { video, lecturer }))
}

fn attach_lecturer(video: Video, lecturers: &[Lecturer]) -> VideoWithLecturer {
    let lecturer = lecturers
        .iter()
        .find(|l| l.id == video.lecturer_id)
        .cloned();
    VideoWithLecturer { video, lecturer }
}
