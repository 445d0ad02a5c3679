use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        // Create SQLite connection URL
        let url = format!("sqlite://{}?mode=rwc", path.display());

        // Configure connection options
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .sqlx_logging(false);

        let database = Self::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        log::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// Connect with the given options and run pending migrations.
    ///
    /// sqlx opens every SQLite connection with `foreign_keys` on, so actor
    /// rows must reference an existing movie on every pooled connection.
    pub async fn connect(opt: ConnectOptions) -> Result<Self> {
        let conn = SeaDatabase::connect(opt)
            .await
            .context("Failed to connect to database")?;

        log::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        Ok(Database { conn })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveModelBehavior, ActiveModelTrait, EntityTrait, ModelTrait, Set};

    use crate::entities;
    use crate::services::movie::MovieRepository;
    use crate::test_utils::test_db;

    #[tokio::test]
    async fn test_actor_requires_existing_movie() {
        let db = test_db().await;

        let result = entities::actor::ActiveModel {
            actor_name: Set("Nobody".into()),
            movie_id: Set(999),
            ..entities::actor::ActiveModel::new()
        }
        .insert(&db.conn)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deleting_movie_cascades_to_actors() {
        let db = test_db().await;
        let repo = MovieRepository::new(db.clone());
        let movie = repo
            .create(
                "Blue Velvet".into(),
                1986,
                "David Lynch".into(),
                vec!["Isabella Rossellini".into(), "Dennis Hopper".into()],
            )
            .await
            .unwrap();

        let model = entities::movie::Entity::find_by_id(movie.id)
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();
        model.delete(&db.conn).await.unwrap();

        let actors = entities::actor::Entity::find().all(&db.conn).await.unwrap();
        assert!(actors.is_empty());
    }
}
