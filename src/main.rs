use actix_files::Files;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod error;
mod services;

use db::postgres::PgCatalog;
use db::store::CatalogStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if it exists
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    // Load configuration
    let config = config::AppConfig::new().expect("Failed to load configuration");

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );

    // Create DB pool and the catalog store handed to every handler
    let pool = db::create_pool(&config.database).await;
    let store: Arc<dyn CatalogStore> = Arc::new(PgCatalog::new(pool));
    let token_config = auth::token::TokenConfig::from(&config.auth);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(token_config.clone()))
            .wrap(actix_cors::Cors::permissive()) // Configure properly in production
            .configure(api::configure)
            .service(Files::new("/", "./public").index_file("index.html"))
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run()
    .await
}
