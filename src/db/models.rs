use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ROLE_PROFESSOR: &str = "professor";
pub const ROLE_STUDENT: &str = "student";

#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::branches)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub is_active: bool,
    pub coming_soon: bool,
}

#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::semesters)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: Uuid,
    pub number: i32,
    pub branch_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::subjects)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub semester_id: Uuid,
    pub branch_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::lecturers)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub institution: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::videos)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub youtube_id: String,
    pub duration: i32,
    pub subject_id: Uuid,
    pub lecturer_id: Uuid,
    pub published_at: Option<NaiveDateTime>,
}

// No Serialize on purpose: the password hash must never reach a response
// body. Use AuthUser for anything client-facing.
#[derive(Debug, Queryable, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::users)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl User {
    pub fn is_professor(&self) -> bool {
        self.role == ROLE_PROFESSOR
    }
}

/// Client-facing view of a user account.
#[derive(Debug, Serialize, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "type")]
    pub role: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// A video joined with its lecturer record. `lecturer` is null when the
/// referenced lecturer no longer exists.
#[derive(Debug, Serialize, Clone)]
pub struct VideoWithLecturer {
    #[serde(flatten)]
    pub video: Video,
    pub lecturer: Option<Lecturer>,
}
