pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod repository;
pub mod web;

pub use self::config::Config;
pub use error::{Error, Result};
