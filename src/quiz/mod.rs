// src/quiz/mod.rs

pub mod generator;
pub mod handlers;
pub mod routes;

pub use routes::quiz_routes;
