//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, migrations_dir, run_migrations, DatabaseConfig};

pub use sqlx::postgres::PgPool;
