//! Thin transport clients for the two external collaborators: the catalog
//! API and the language model. Business logic (confidence grading,
//! batching, rate limiting policy) lives in `core`; these modules only
//! know how to talk HTTP.

pub mod llm;
pub mod tmdb;
