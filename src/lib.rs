pub mod config;
pub mod error;
pub mod generator;
pub mod service;

pub use error::{Error, Result};
