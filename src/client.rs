//! Terminal client for a running catalog server.

use color_eyre::eyre::{Context, Result, eyre};
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

use crate::http_server::http_routes::{
    movies::NewMovie,
    summary::{SummaryRequest, SummaryResponse},
};
use crate::services::movie::Movie;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .wrap_err_with(|| eyre!("Invalid API path: {}", path))
    }

    pub async fn random_movie(&self) -> Result<Movie> {
        let res = self
            .client
            .get(self.endpoint("movies/random/")?)
            .send()
            .await
            .wrap_err("Failed to fetch a random movie")?;
        parse(res).await
    }

    pub async fn create_movie(&self, movie: &NewMovie) -> Result<Movie> {
        let res = self
            .client
            .post(self.endpoint("movies/")?)
            .json(movie)
            .send()
            .await
            .wrap_err("Failed to create movie")?;
        parse(res).await
    }

    pub async fn generate_summary(&self, movie_id: i64) -> Result<String> {
        let res = self
            .client
            .post(self.endpoint("generate_summary/")?)
            .json(&SummaryRequest { movie_id })
            .send()
            .await
            .wrap_err("Failed to generate a summary")?;
        let summary: SummaryResponse = parse(res).await?;
        Ok(summary.summary_text)
    }
}

async fn parse<T: serde::de::DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    if !status.is_success() {
        let detail = res
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| "no details".to_string());
        return Err(eyre!("Server returned {}: {}", status, detail));
    }
    res.json::<T>()
        .await
        .wrap_err("Failed to parse server response")
}

/// Render a movie the way the catalog UI shows it.
pub fn render_movie(movie: &Movie) -> String {
    let mut out = format!(
        "{} (#{})\nYear: {}\nDirector: {}\nActors:\n",
        movie.title, movie.id, movie.year, movie.director
    );
    if movie.actors.is_empty() {
        out.push_str("  (none)\n");
    }
    for actor in &movie.actors {
        out.push_str(&format!("- {}\n", actor.actor_name));
    }
    out
}
