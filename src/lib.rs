pub mod app;
pub mod bridge;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod infrastructure;
pub mod popup;
pub mod store;
pub mod surfaces;
pub mod watcher;
