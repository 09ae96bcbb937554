//! Command-line orchestration for montage coordinate pipelines.

pub mod app;
pub mod cache;
pub mod config;
pub mod loader;
