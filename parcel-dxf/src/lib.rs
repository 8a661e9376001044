//! Drawing layer on top of the [`uldk`] pipeline
//!
//! Takes processed parcels and turns them into a DXF file: drawing
//! configuration, emission onto an abstract surface, the DXF writer
//! itself, and the run report.

pub mod config;
pub mod emit;
pub mod export;
pub mod report;

pub use config::DrawConfig;
pub use report::{BatchReport, RunStatus};
