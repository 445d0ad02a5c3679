use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CatalogError, CatalogResult},
    http_server::state::AppState,
    services::movie::Movie,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActor {
    pub actor_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub actors: Vec<NewActor>,
}

impl NewMovie {
    fn validate(&self) -> CatalogResult<()> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::Validation("title must not be empty".into()));
        }
        if self.director.trim().is_empty() {
            return Err(CatalogError::Validation("director must not be empty".into()));
        }
        if let Some(index) = self
            .actors
            .iter()
            .position(|actor| actor.actor_name.trim().is_empty())
        {
            return Err(CatalogError::Validation(format!(
                "actors[{index}].actor_name must not be empty"
            )));
        }
        Ok(())
    }
}

pub async fn create_movie(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> CatalogResult<Json<Movie>> {
    let Json(input) = payload?;
    input.validate()?;

    let movie = app_state
        .movies
        .create(
            input.title,
            input.year,
            input.director,
            input.actors.into_iter().map(|a| a.actor_name).collect(),
        )
        .await?;

    Ok(Json(movie))
}

pub async fn random_movie(State(app_state): State<Arc<AppState>>) -> CatalogResult<Json<Movie>> {
    app_state
        .movies
        .fetch_random()
        .await?
        .map(Json)
        .ok_or_else(|| CatalogError::NotFound("No movies found.".into()))
}

pub async fn get_movie(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> CatalogResult<Json<Movie>> {
    let Path(id) = id?;
    app_state
        .movies
        .fetch_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| CatalogError::NotFound("Movie not found.".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_movie(title: &str, actors: &[&str]) -> NewMovie {
        NewMovie {
            title: title.into(),
            year: 1984,
            director: "David Lynch".into(),
            actors: actors
                .iter()
                .map(|a| NewActor {
                    actor_name: a.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_accepts_no_actors() {
        assert!(new_movie("Eraserhead", &[]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let err = new_movie("  ", &[]).validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_validate_rejects_blank_actor_name() {
        let err = new_movie("Dune", &["Kyle MacLachlan", ""])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("actors[1].actor_name"));
    }
}
