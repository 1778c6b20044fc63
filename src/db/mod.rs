#[cfg(test)]
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

use std::time::Duration;

use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

use crate::config::app_config::DatabaseConfig;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

// Bounded waits so an unreachable database surfaces as a pool error instead
// of a hung request.
const POOL_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn create_pool(config: &DatabaseConfig) -> DbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
    Pool::builder(manager)
        .max_size(config.max_connections as usize)
        .wait_timeout(Some(POOL_TIMEOUT))
        .create_timeout(Some(POOL_TIMEOUT))
        .build()
        .expect("Failed to create database pool")
}
