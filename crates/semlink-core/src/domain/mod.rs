pub mod canonical;
pub mod config;
