// src/pages/mod.rs

pub mod handlers;
pub mod routes;

pub use routes::page_routes;
