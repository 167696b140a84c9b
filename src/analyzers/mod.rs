//! Ridership analysis over cleaned trips.
//!
//! This module groups and filters the cleaned table, computes descriptive
//! statistics per column and per category, and writes the resulting report
//! as JSON.

pub mod aggregate;
pub mod groups;
pub mod report;
pub mod types;
pub mod utility;
pub mod writejson;
