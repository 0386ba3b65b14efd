// src/search/mod.rs

pub mod handlers;
pub mod routes;

pub use routes::search_routes;
