//! Domain types shared by the application and infrastructure layers.

pub mod document;
pub mod errors;
pub mod model;
