use crate::services::movie::MovieRepository;
use crate::services::summary::SummaryComposer;

pub struct AppState {
    pub movies: MovieRepository,
    pub summaries: SummaryComposer,
}
