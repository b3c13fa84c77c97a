// src/error.rs
//! Crate error type.
//!
//! Only failures that should stop a run live here (local I/O, a broken CSV file,
//! an HTTP client that can't be built, bad CLI input). Network misses, structural
//! misses and unparseable dates are *not* errors: they collapse to "absent" or
//! "skipped" at the point they happen.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Path exists but is not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
