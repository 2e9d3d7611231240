//! Utility functions and helpers.
//!
//! This module provides common functionality used across the audit pipeline:
//!
//! - [`format`] - Number formatting and pluralised headings
//! - [`progress`] - Progress tracking and display utilities
//! - [`reader`] - Smart file reader with automatic decompression
//! - [`time`] - Epoch, calendar date and human timestamp helpers
//!
//! # Examples
//!
//! ## Bucketing a timestamp by calendar date
//!
//! ```
//! use access_audit::utils::time::date_in;
//! use chrono::Utc;
//!
//! let date = date_in(1_704_067_200.5, &Utc).unwrap();
//! assert_eq!(date.to_string(), "2024-01-01");
//! ```

pub mod format;
pub mod progress;
pub mod reader;
pub mod time;
