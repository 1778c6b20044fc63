use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db::store::CatalogStore;
use crate::error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/branches")
            .route("", web::get().to(list_branches))
            .route("/{code}", web::get().to(get_branch_by_code))
            .route("/{branch_id}/semesters", web::get().to(list_semesters)),
    );
}

async fn list_branches(store: web::Data<dyn CatalogStore>) -> Result<HttpResponse, ApiError> {
    let branches = store.all_branches().await?;
    Ok(HttpResponse::Ok().json(branches))
}

async fn get_branch_by_code(
    store: web::Data<dyn CatalogStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let branch = store
        .get_branch_by_code(&code)
        .await?
        .ok_or(ApiError::NotFound("branch"))?;
    Ok(HttpResponse::Ok().json(branch))
}

async fn list_semesters(
    store: web::Data<dyn CatalogStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let branch_id = path.into_inner();
    let semesters = store.semesters_by_branch(branch_id).await?;
    Ok(HttpResponse::Ok().json(semesters))
}
