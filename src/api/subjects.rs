use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{self, AuthClaims};
use crate::db::store::{CatalogStore, NewSubject};
use crate::error::ApiError;
use crate::services::catalog;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subjects")
            .route("", web::get().to(list_subjects))
            .route("", web::post().to(create_subject))
            .route("/{id}", web::get().to(get_subject))
            .route("/{subject_id}/videos", web::get().to(list_subject_videos)),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectsQuery {
    branch_id: Uuid,
    semester: i32,
}

async fn list_subjects(
    store: web::Data<dyn CatalogStore>,
    query: web::Query<SubjectsQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    if !(1..=8).contains(&query.semester) {
        return Err(ApiError::Validation(
            "semester must be between 1 and 8".to_string(),
        ));
    }
    // Resolving against an unknown branch would otherwise provision a
    // semester row with a dangling branch reference.
    let branch = store
        .get_branch(query.branch_id)
        .await?
        .ok_or(ApiError::NotFound("branch"))?;
    let subjects = catalog::resolve_subjects(store.get_ref(), branch.id, query.semester).await?;
    Ok(HttpResponse::Ok().json(subjects))
}

async fn get_subject(
    store: web::Data<dyn CatalogStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let subject = store
        .get_subject(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("subject"))?;
    Ok(HttpResponse::Ok().json(subject))
}

async fn create_subject(
    store: web::Data<dyn CatalogStore>,
    claims: AuthClaims,
    body: web::Json<NewSubject>,
) -> Result<HttpResponse, ApiError> {
    auth::require_professor(store.get_ref(), &claims.0).await?;
    let body = body.into_inner();
    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "name and description are required".to_string(),
        ));
    }
    let subject = catalog::create_subject(store.get_ref(), body).await?;
    Ok(HttpResponse::Created().json(subject))
}

async fn list_subject_videos(
    store: web::Data<dyn CatalogStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let videos = catalog::videos_with_lecturers(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(videos))
}
