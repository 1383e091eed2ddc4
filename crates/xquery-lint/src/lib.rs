//! Command-line front end for the XQuery analyzer.
//!
//! Loads source units from disk, runs the analyzer over them and renders the
//! reports for humans or as JSON.

pub mod output;
pub mod units;

pub use output::{format_human, format_json, OutputFormat};
pub use units::{load_unit, load_units, UnitError};
