pub mod api;
pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod perf;
pub mod render;
pub mod report;
pub mod storage;

#[cfg(test)]
pub mod testing;
