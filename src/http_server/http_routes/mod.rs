pub mod movies;
pub mod summary;
