//! `PostgreSQL` adapters for task lifecycle persistence.

mod models;
mod pool;
mod repository;
mod schema;


pub use pool::{
    DATABASE_URL_ENV, POOL_SIZE_ENV, PoolConfigError, PostgresPoolConfig, TIMEOUT_ENV, TaskPgPool,
};
pub use repository::PostgresTaskRepository;
