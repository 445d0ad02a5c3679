use std::sync::Arc;

use crate::error::CatalogResult;
use crate::ports::text_generator::TextGenerator;
use crate::services::movie::Movie;

/// Render the summary prompt for a movie.
///
/// Actor names are joined in stored order. A movie without actors drops the
/// "and starring" clause instead of leaving it dangling.
pub fn build_prompt(movie: &Movie) -> String {
    let starring = if movie.actors.is_empty() {
        String::new()
    } else {
        let actor_list = movie
            .actors
            .iter()
            .map(|actor| actor.actor_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(" and starring {actor_list}")
    };

    format!(
        "Generate a short, engaging summary for the movie '{title}' ({year}), directed by {director}{starring}.",
        title = movie.title,
        year = movie.year,
        director = movie.director,
    )
}

pub struct SummaryComposer {
    generator: Arc<dyn TextGenerator>,
}

impl SummaryComposer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    #[tracing::instrument(skip_all, fields(movie_id = movie.id))]
    pub async fn summarize(&self, movie: &Movie) -> CatalogResult<String> {
        let prompt = build_prompt(movie);
        log::debug!("Requesting summary for movie {}: {}", movie.id, prompt);

        let summary = self.generator.generate(&prompt).await.inspect_err(|e| {
            log::error!("Summary generation failed for movie {}: {}", movie.id, e);
        })?;

        Ok(summary)
    }
}
