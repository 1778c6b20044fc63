use actix_web::{web, HttpResponse};

use crate::db::store::CatalogStore;
use crate::error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/lecturers").route("", web::get().to(list_lecturers)));
}

async fn list_lecturers(store: web::Data<dyn CatalogStore>) -> Result<HttpResponse, ApiError> {
    let lecturers = store.all_lecturers().await?;
    Ok(HttpResponse::Ok().json(lecturers))
}
