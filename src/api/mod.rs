pub mod branches;
pub mod health;
pub mod lecturers;
pub mod subjects;
pub mod users;
pub mod videos;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(branches::configure)
            .configure(subjects::configure)
            .configure(videos::configure)
            .configure(lecturers::configure)
            .configure(users::configure)
            .configure(health::configure),
    );
}
