//! Batch processor
//!
//! Drives every key through fetch → normalize → (reproject) and records the
//! outcome. Keys are independent: a per-key failure is bookkept in the
//! result and the batch continues. Registry fetches may overlap up to the
//! configured concurrency, but decisions and progress events stay in input
//! order, so results are deterministic.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::client::RegistryClient;
use crate::normalize::normalize;
use crate::reproject::reproject_parcel;
use crate::types::{
    BatchResult, DrawMode, FailedKey, ParcelKey, ParcelState, ProcessedParcel,
};

/// Fetch parallelism used when the caller does not override it
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Options for one batch run
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub draw_mode: DrawMode,
    /// Rewrite coordinates into PUWG 2000; when false the reprojection
    /// stage is skipped entirely, not reported as a failure
    pub convert_to_puwg2000: bool,
    /// Maximum number of registry fetches in flight
    pub concurrency: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::Polygon,
            convert_to_puwg2000: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Cooperative cancellation, checked between keys
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress snapshot emitted after each decided key
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Runs one batch to completion.
///
/// The returned [`BatchResult`] always satisfies
/// `succeeded.len() + failed.len() == total`; on cancellation `total`
/// shrinks to the decided prefix so the invariant still holds.
pub async fn process_batch<C, F>(
    keys: Vec<ParcelKey>,
    client: &C,
    options: &ProcessOptions,
    cancel: &CancelToken,
    mut on_progress: F,
) -> BatchResult
where
    C: RegistryClient + Sync,
    F: FnMut(BatchProgress),
{
    let input_total = keys.len();
    // Shared with the fetch futures so a key is marked Fetching the
    // moment its request is issued, not when the response drains
    let states: RefCell<HashMap<ParcelKey, ParcelState>> = RefCell::new(
        keys.iter()
            .map(|k| (k.clone(), ParcelState::Pending))
            .collect(),
    );
    let mut result = BatchResult {
        total: input_total,
        ..Default::default()
    };

    let concurrency = options.concurrency.max(1);
    let mut fetches = stream::iter(keys.into_iter().map(|key| {
        let states = &states;
        async move {
            states
                .borrow_mut()
                .insert(key.clone(), ParcelState::Fetching);
            let fetched = client.fetch(&key).await;
            (key, fetched)
        }
    }))
    .buffered(concurrency);

    while let Some((key, fetched)) = fetches.next().await {
        if cancel.is_cancelled() {
            result.total = result.decided();
            warn!(decided = result.total, of = input_total, "batch cancelled");
            break;
        }

        let decided = match fetched {
            Err(err) => {
                warn!(key = %key, error = %err, "fetch failed");
                ParcelState::Failed(err.into())
            }
            Ok(shape) => {
                states
                    .borrow_mut()
                    .insert(key.clone(), ParcelState::Normalizing);
                match normalize(&key, &shape, options.draw_mode) {
                    Err(err) => ParcelState::Failed(err.into()),
                    Ok(parcel) => {
                        if options.convert_to_puwg2000 {
                            states
                                .borrow_mut()
                                .insert(key.clone(), ParcelState::Reprojecting);
                            match reproject_parcel(&parcel) {
                                Err(err) => {
                                    warn!(key = %key, error = %err, "reprojection failed");
                                    ParcelState::Failed(err.into())
                                }
                                Ok((projected, zone)) => {
                                    result.succeeded.push(ProcessedParcel {
                                        parcel: projected,
                                        zone: Some(zone),
                                    });
                                    ParcelState::Done
                                }
                            }
                        } else {
                            result.succeeded.push(ProcessedParcel { parcel, zone: None });
                            ParcelState::Done
                        }
                    }
                }
            }
        };

        if let ParcelState::Failed(reason) = &decided {
            result.failed.push(FailedKey {
                key: key.clone(),
                reason: reason.clone(),
            });
        }
        states.borrow_mut().insert(key.clone(), decided);

        // Progress is derived from the state map, not counted separately
        let processed = states.borrow().values().filter(|s| s.is_decided()).count();
        debug!(key = %key, processed, total = input_total, "key decided");
        on_progress(BatchProgress {
            processed,
            total: input_total,
        });
    }

    info!(
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        total = result.total,
        "batch complete"
    );
    debug_assert!(result.is_consistent());
    result
}
