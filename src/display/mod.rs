//! Terminal display and formatting utilities.
//!
//! Handles aligned pretty output, colorized JSON output and token
//! status rendering. Colors follow the global `colored` override set at
//! start-up.

pub mod json_printer;
pub mod pretty;
pub mod token_status;
