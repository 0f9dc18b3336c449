pub mod api;
pub mod models;
pub mod report;
pub mod resolver;
