// src/summary/mod.rs

pub mod handlers;
pub mod routes;
pub mod summarizer;

pub use routes::summary_routes;
