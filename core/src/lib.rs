pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod model;
pub mod projection;
pub mod repository;
