pub mod config;
pub mod error;
pub mod report;
pub mod zk;

pub use error::{AppError, Result};
