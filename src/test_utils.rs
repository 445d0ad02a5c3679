use std::sync::Arc;

use sea_orm::ConnectOptions;

use crate::database::Database;

/// Fresh in-memory database with all migrations applied.
pub async fn test_db() -> Arc<Database> {
    // An in-memory SQLite database lives only as long as its connection
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let database = Database::connect(opt).await.unwrap();
    Arc::new(database)
}
