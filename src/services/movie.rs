use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::entities;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub actor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub actors: Vec<Actor>,
}

impl Movie {
    fn from_models(movie: entities::movie::Model, actors: Vec<entities::actor::Model>) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            director: movie.director,
            actors: actors
                .into_iter()
                .map(|actor| Actor {
                    id: actor.id,
                    actor_name: actor.actor_name,
                })
                .collect(),
        }
    }
}

/// Create, random-fetch and lookup over the `movies` and `actors` tables.
///
/// Actors are loaded with an explicit second query on `movie_id`, ordered by
/// actor id so they come back in insertion order.
pub struct MovieRepository {
    db: Arc<Database>,
}

impl MovieRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a movie and one actor row per name in a single transaction.
    #[tracing::instrument(skip(self, actor_names), fields(actors = actor_names.len()))]
    pub async fn create(
        &self,
        title: String,
        year: i32,
        director: String,
        actor_names: Vec<String>,
    ) -> CatalogResult<Movie> {
        log::debug!(
            "Creating movie '{}' ({}) with {} actor(s)",
            title,
            year,
            actor_names.len()
        );

        let movie = self
            .db
            .conn
            .transaction::<_, Movie, CatalogError>(|txn| {
                Box::pin(async move {
                    let movie = entities::movie::ActiveModel {
                        title: Set(title),
                        year: Set(year),
                        director: Set(director),
                        ..entities::movie::ActiveModel::new()
                    }
                    .insert(txn)
                    .await?;

                    let mut actors = Vec::with_capacity(actor_names.len());
                    for actor_name in actor_names {
                        let actor = entities::actor::ActiveModel {
                            actor_name: Set(actor_name),
                            movie_id: Set(movie.id),
                            ..entities::actor::ActiveModel::new()
                        }
                        .insert(txn)
                        .await?;
                        actors.push(actor);
                    }

                    Ok(Movie::from_models(movie, actors))
                })
            })
            .await
            .map_err(|e| match e {
                sea_orm::TransactionError::Connection(db_err) => CatalogError::Storage(db_err),
                sea_orm::TransactionError::Transaction(err) => err,
            })?;

        log::info!("Movie created: '{}' (ID: {})", movie.title, movie.id);
        Ok(movie)
    }

    /// Pick one movie uniformly at random. Returns `None` when the catalog is empty.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_random(&self) -> CatalogResult<Option<Movie>> {
        let movie = entities::movie::Entity::find()
            .order_by(Expr::cust("RANDOM()"), Order::Asc)
            .one(&self.db.conn)
            .await?;

        match movie {
            Some(movie) => Ok(Some(self.with_actors(movie).await?)),
            None => Ok(None),
        }
    }

    pub async fn fetch_by_id(&self, id: i64) -> CatalogResult<Option<Movie>> {
        let movie = entities::movie::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?;

        match movie {
            Some(movie) => Ok(Some(self.with_actors(movie).await?)),
            None => Ok(None),
        }
    }

    pub async fn count(&self) -> CatalogResult<u64> {
        Ok(entities::movie::Entity::find().count(&self.db.conn).await?)
    }

    async fn with_actors(&self, movie: entities::movie::Model) -> CatalogResult<Movie> {
        let actors = entities::actor::Entity::find()
            .filter(entities::actor::Column::MovieId.eq(movie.id))
            .order_by_asc(entities::actor::Column::Id)
            .all(&self.db.conn)
            .await?;

        Ok(Movie::from_models(movie, actors))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::test_utils::test_db;

    async fn insert_movie(repo: &MovieRepository, title: &str, actors: &[&str]) -> Movie {
        repo.create(
            title.into(),
            2000,
            "Some Director".into(),
            actors.iter().map(|a| a.to_string()).collect(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_movie_with_actors() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        let movie = repo
            .create(
                "Dune".into(),
                1984,
                "David Lynch".into(),
                vec![
                    "Kyle MacLachlan".into(),
                    "Sean Young".into(),
                    "Sting".into(),
                ],
            )
            .await
            .unwrap();

        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.year, 1984);
        assert_eq!(movie.director, "David Lynch");
        let names: Vec<_> = movie.actors.iter().map(|a| a.actor_name.as_str()).collect();
        assert_eq!(names, vec!["Kyle MacLachlan", "Sean Young", "Sting"]);

        let ids: HashSet<_> = movie.actors.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_create_movie_without_actors() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        let movie = insert_movie(&repo, "Koyaanisqatsi", &[]).await;
        assert!(movie.actors.is_empty());

        let fetched = repo.fetch_by_id(movie.id).await.unwrap().unwrap();
        assert_eq!(fetched, movie);
    }

    #[tokio::test]
    async fn test_duplicate_titles_allowed() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        let first = insert_movie(&repo, "Solaris", &["Donatas Banionis"]).await;
        let second = insert_movie(&repo, "Solaris", &["George Clooney"]).await;

        assert_ne!(first.id, second.id);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_by_id_keeps_actor_order() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        let movie = insert_movie(&repo, "Alien", &["Sigourney Weaver", "Tom Skerritt"]).await;
        insert_movie(&repo, "Aliens", &["Michael Biehn"]).await;

        let fetched = repo.fetch_by_id(movie.id).await.unwrap().unwrap();
        assert_eq!(fetched.actors, movie.actors);
    }

    #[tokio::test]
    async fn test_fetch_by_id_missing() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        assert!(repo.fetch_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_random_empty() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        assert!(repo.fetch_random().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_random_single_movie() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);
        let movie = insert_movie(&repo, "Stalker", &["Alisa Freyndlikh"]).await;

        for _ in 0..20 {
            let fetched = repo.fetch_random().await.unwrap().unwrap();
            assert_eq!(fetched, movie);
        }
    }

    #[tokio::test]
    async fn test_fetch_random_is_roughly_uniform() {
        let db = test_db().await;
        let repo = MovieRepository::new(db);

        let mut ids = Vec::new();
        for title in ["Heat", "Ronin", "Thief"] {
            ids.push(insert_movie(&repo, title, &["Robert De Niro"]).await.id);
        }

        let draws = 900;
        let mut counts: HashMap<i64, u32> = HashMap::new();
        for _ in 0..draws {
            let movie = repo.fetch_random().await.unwrap().unwrap();
            assert_eq!(movie.actors.len(), 1);
            *counts.entry(movie.id).or_default() += 1;
        }

        // Expected 300 each; the bounds sit far outside normal variance.
        for id in ids {
            let count = counts.get(&id).copied().unwrap_or(0);
            assert!(
                (200..=400).contains(&count),
                "movie {id} drawn {count} times out of {draws}"
            );
        }
    }
}
