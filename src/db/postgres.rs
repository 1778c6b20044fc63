use chrono::Utc;
// The sync RunQueryDsl in diesel's prelude clashes with the async one, so
// the needed traits are imported individually.
use diesel::expression_methods::PgSortExpressionMethods;
use diesel::result::OptionalExtension;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use super::models::{Branch, Lecturer, Semester, Subject, User, Video};
use super::schema::{branches, lecturers, semesters, subjects, users, videos};
use super::store::{CatalogStore, NewSubject, NewUser, NewVideo, StoreError, VideoPatch};
use super::DbPool;

type DbConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Diesel-backed catalog store over a shared connection pool.
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

fn unique_conflict(err: diesel::result::Error, what: &'static str) -> StoreError {
    match err {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ) => StoreError::Conflict(what),
        other => StoreError::Database(other),
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalog {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(users::table.find(id).first(conn).await.optional()?)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(users::table
            .filter(users::username.eq(username))
            .first(conn)
            .await
            .optional()?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let conn = &mut self.conn().await?;
        let row = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(conn)
            .await
            .map_err(|e| unique_conflict(e, "username"))?;
        Ok(row)
    }

    async fn all_branches(&self) -> Result<Vec<Branch>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(branches::table
            .order(branches::name.asc())
            .load(conn)
            .await?)
    }

    async fn get_branch(&self, id: Uuid) -> Result<Option<Branch>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(branches::table.find(id).first(conn).await.optional()?)
    }

    async fn get_branch_by_code(&self, code: &str) -> Result<Option<Branch>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(branches::table
            .filter(branches::code.eq(code))
            .first(conn)
            .await
            .optional()?)
    }

    async fn semesters_by_branch(&self, branch_id: Uuid) -> Result<Vec<Semester>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(semesters::table
            .filter(semesters::branch_id.eq(branch_id))
            .order(semesters::number.asc())
            .load(conn)
            .await?)
    }

    async fn get_semester(&self, id: Uuid) -> Result<Option<Semester>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(semesters::table.find(id).first(conn).await.optional()?)
    }

    async fn find_semester(
        &self,
        branch_id: Uuid,
        number: i32,
    ) -> Result<Option<Semester>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(semesters::table
            .filter(semesters::branch_id.eq(branch_id))
            .filter(semesters::number.eq(number))
            .first(conn)
            .await
            .optional()?)
    }

    async fn ensure_semester(&self, branch_id: Uuid, number: i32) -> Result<Semester, StoreError> {
        let conn = &mut self.conn().await?;
        let row = Semester {
            id: Uuid::new_v4(),
            number,
            branch_id,
        };
        // Racing resolvers both reach this insert; the unique index on
        // (branch_id, number) lets exactly one row win.
        diesel::insert_into(semesters::table)
            .values(&row)
            .on_conflict((semesters::branch_id, semesters::number))
            .do_nothing()
            .execute(conn)
            .await?;
        Ok(semesters::table
            .filter(semesters::branch_id.eq(branch_id))
            .filter(semesters::number.eq(number))
            .first(conn)
            .await?)
    }

    async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(subjects::table.find(id).first(conn).await.optional()?)
    }

    async fn subjects_by_semester(
        &self,
        semester_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<Subject>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(subjects::table
            .filter(subjects::semester_id.eq(semester_id))
            .filter(subjects::branch_id.eq(branch_id))
            .order(subjects::name.asc())
            .load(conn)
            .await?)
    }

    async fn create_subject(&self, subject: NewSubject) -> Result<Subject, StoreError> {
        let conn = &mut self.conn().await?;
        let row = Subject {
            id: Uuid::new_v4(),
            name: subject.name,
            description: subject.description,
            semester_id: subject.semester_id,
            branch_id: subject.branch_id,
        };
        diesel::insert_into(subjects::table)
            .values(&row)
            .execute(conn)
            .await
            .map_err(|e| unique_conflict(e, "subject"))?;
        Ok(row)
    }

    async fn create_subject_if_absent(
        &self,
        subject: NewSubject,
    ) -> Result<Option<Subject>, StoreError> {
        let conn = &mut self.conn().await?;
        let row = Subject {
            id: Uuid::new_v4(),
            name: subject.name,
            description: subject.description,
            semester_id: subject.semester_id,
            branch_id: subject.branch_id,
        };
        let inserted = diesel::insert_into(subjects::table)
            .values(&row)
            .on_conflict((subjects::name, subjects::semester_id))
            .do_nothing()
            .execute(conn)
            .await?;
        Ok((inserted > 0).then_some(row))
    }

    async fn all_lecturers(&self) -> Result<Vec<Lecturer>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(lecturers::table
            .order(lecturers::name.asc())
            .load(conn)
            .await?)
    }

    async fn get_lecturer(&self, id: Uuid) -> Result<Option<Lecturer>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(lecturers::table.find(id).first(conn).await.optional()?)
    }

    async fn lecturers_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Lecturer>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(lecturers::table
            .filter(lecturers::id.eq_any(ids))
            .load(conn)
            .await?)
    }

    async fn videos_by_subject(&self, subject_id: Uuid) -> Result<Vec<Video>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(videos::table
            .filter(videos::subject_id.eq(subject_id))
            .order((videos::published_at.desc().nulls_last(), videos::id.asc()))
            .load(conn)
            .await?)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, StoreError> {
        let conn = &mut self.conn().await?;
        Ok(videos::table.find(id).first(conn).await.optional()?)
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError> {
        let conn = &mut self.conn().await?;
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
        diesel::insert_into(videos::table)
            .values(&row)
            .execute(conn)
            .await?;
        Ok(row)
    }

    async fn update_video(
        &self,
        id: Uuid,
        patch: VideoPatch,
    ) -> Result<Option<Video>, StoreError> {
        let conn = &mut self.conn().await?;
        if patch.is_empty() {
            // Diesel rejects an update with no changed columns.
            return Ok(videos::table.find(id).first(conn).await.optional()?);
        }
        Ok(diesel::update(videos::table.find(id))
            .set(&patch)
            .get_result(conn)
            .await
            .optional()?)
    }

    async fn delete_video(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = &mut self.conn().await?;
        let deleted = diesel::delete(videos::table.find(id)).execute(conn).await?;
        Ok(deleted > 0)
    }
}
