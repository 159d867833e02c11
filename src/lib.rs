pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod gapfill;
pub mod repositories;

pub use config::Config;
pub use error::{AppError, Result};
