// src/convert/mod.rs

pub mod converters;
pub mod handlers;
pub mod routes;

pub use converters::{ConversionKind, ConvertError};
pub use routes::convert_routes;
