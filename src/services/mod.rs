pub mod llm;
pub mod movie;
pub mod summary;
