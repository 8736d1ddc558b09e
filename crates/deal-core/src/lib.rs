//! Core types and errors for deal risk scoring.
//!
//! This crate provides the foundational building blocks including:
//! - Deal records as produced by data preparation
//! - Scored deals and their per-signal breakdown
//! - Error types shared by the data and scoring crates

pub mod error;
pub mod types;

pub use error::{DataError, ScoringError};
pub use types::*;
