//! # uldk
//!
//! Identifier-to-geometry pipeline for Polish cadastral parcels.
//!
//! Resolves batches of parcel identifiers against the ULDK registry,
//! normalizes the returned boundaries into drawable rings, and optionally
//! rewrites coordinates from PUWG 1992 into the matching PUWG 2000 zone.
//!
//! ## Features
//!
//! - Batch parsing with first-seen-order deduplication
//! - Pure-Rust PUWG 1992 → PUWG 2000 reprojection with automatic zone
//!   selection (no external projection library)
//! - Multi-part and degenerate geometry normalization
//! - Partial-failure bookkeeping: one bad identifier never aborts a batch
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uldk::{parse_identifiers, process_batch, CancelToken, ProcessOptions, UldkClient};
//!
//! let keys = parse_identifiers("141201_1.0001.123/4, 141201_1.0001.200")?;
//! let client = UldkClient::new();
//! let result = process_batch(
//!     keys,
//!     &client,
//!     &ProcessOptions::default(),
//!     &CancelToken::new(),
//!     |p| println!("{:.0}%", p.fraction() * 100.0),
//! )
//! .await;
//!
//! println!("{} drawn, {} failed", result.succeeded.len(), result.failed.len());
//! ```

pub mod batch;
pub mod client;
pub mod error;
pub mod normalize;
pub mod processor;
pub mod reproject;
pub mod types;

pub use batch::parse_identifiers;
pub use client::{RegistryClient, UldkClient, DEFAULT_BASE_URL};
pub use error::UldkError;
pub use processor::{
    process_batch, BatchProgress, CancelToken, ProcessOptions, DEFAULT_CONCURRENCY,
};
pub use reproject::PuwgZone;
pub use types::{
    BatchResult, CanonicalParcel, DrawMode, FailedKey, FailureReason, ParcelKey, ProcessedParcel,
    RawShape, Ring, RingKind,
};
