use std::str::FromStr;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlxSqliteConnector, Statement};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub type DbPool = SqlitePool;
pub type OrmConn = DatabaseConnection;

const ORDERS_SCHEMA: &str = include_str!("../migrations/0001_orders.sql");

/// Open (creating if needed) the SQLite order database.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Share an existing pool with SeaORM.
pub fn orm_from_pool(pool: DbPool) -> OrmConn {
    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

/// Creates the order tables if they are missing. Safe to run repeatedly.
pub async fn run_migrations(conn: &OrmConn) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    // Prepared statements hold a single command, so run the file one
    // statement at a time.
    for stmt in ORDERS_SCHEMA.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        conn.execute(Statement::from_string(backend, format!("{stmt};")))
            .await?;
    }
    Ok(())
}
