pub mod config;
pub mod crawler;
pub mod export;
pub mod extractors;
pub mod models;
