use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::{self, AuthClaims};
use crate::db::store::{CatalogStore, NewVideo, VideoPatch};
use crate::error::ApiError;
use crate::services::catalog;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/videos")
            .route("", web::post().to(create_video))
            .route("/{id}", web::get().to(get_video))
            .route("/{id}", web::patch().to(update_video))
            .route("/{id}", web::delete().to(delete_video)),
    );
}

fn validate_new_video(video: &NewVideo) -> Result<(), ApiError> {
    if video.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    if video.youtube_id.trim().is_empty() {
        return Err(ApiError::Validation("youtubeId is required".to_string()));
    }
    if video.duration <= 0 {
        return Err(ApiError::Validation(
            "duration must be a positive number of seconds".to_string(),
        ));
    }
    Ok(())
}

fn validate_patch(patch: &VideoPatch) -> Result<(), ApiError> {
    if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }
    if matches!(&patch.youtube_id, Some(id) if id.trim().is_empty()) {
        return Err(ApiError::Validation(
            "youtubeId must not be empty".to_string(),
        ));
    }
    if matches!(patch.duration, Some(duration) if duration <= 0) {
        return Err(ApiError::Validation(
            "duration must be a positive number of seconds".to_string(),
        ));
    }
    Ok(())
}

async fn get_video(
    store: web::Data<dyn CatalogStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let video = catalog::video_with_lecturer(store.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("video"))?;
    Ok(HttpResponse::Ok().json(video))
}

async fn create_video(
    store: web::Data<dyn CatalogStore>,
    claims: AuthClaims,
    body: web::Json<NewVideo>,
) -> Result<HttpResponse, ApiError> {
    auth::require_professor(store.get_ref(), &claims.0).await?;
    let body = body.into_inner();
    validate_new_video(&body)?;
    let video = store.create_video(body).await?;
    Ok(HttpResponse::Created().json(video))
}

async fn update_video(
    store: web::Data<dyn CatalogStore>,
    claims: AuthClaims,
    path: web::Path<Uuid>,
    body: web::Json<VideoPatch>,
) -> Result<HttpResponse, ApiError> {
    auth::require_professor(store.get_ref(), &claims.0).await?;
    let patch = body.into_inner();
    validate_patch(&patch)?;
    let video = store
        .update_video(path.into_inner(), patch)
        .await?
        .ok_or(ApiError::NotFound("video"))?;
    Ok(HttpResponse::Ok().json(video))
}

async fn delete_video(
    store: web::Data<dyn CatalogStore>,
    claims: AuthClaims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    auth::require_professor(store.get_ref(), &claims.0).await?;
    if !store.delete_video(path.into_inner()).await? {
        return Err(ApiError::NotFound("video"));
    }
    Ok(HttpResponse::NoContent().finish())
}
