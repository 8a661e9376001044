//! Output writers

pub mod dxf;
