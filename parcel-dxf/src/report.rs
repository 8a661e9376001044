//! Batch run report with graceful degradation
//!
//! A failed parcel never aborts the run; it lands here instead. The
//! report is printed to the console and can optionally be saved as
//! JSON or as a plain list of failed identifiers.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use uldk::BatchResult;

/// Overall outcome of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Every parcel was drawn
    Success,
    /// Some parcels were drawn, some failed
    PartialSuccess,
    /// No parcel was drawn
    Failed,
}

/// One failed parcel with its reason
#[derive(Debug, Clone, Serialize)]
pub struct FailedIdentifier {
    /// Full parcel identifier
    pub key: String,
    /// Stable reason code ("fetch", "empty_geometry", "projection")
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Complete report for one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Overall outcome
    pub status: RunStatus,
    /// Wall-clock duration
    pub duration_secs: f64,

    /// Identifiers submitted
    pub total: usize,
    /// Parcels drawn
    pub succeeded: usize,
    /// Parcels failed
    pub failed: usize,

    /// Failure counts per reason code
    pub by_reason: HashMap<String, usize>,

    /// Every failure, in batch order
    pub failures: Vec<FailedIdentifier>,
}

impl BatchReport {
    pub fn from_result(result: &BatchResult, duration: Duration) -> Self {
        let mut by_reason: HashMap<String, usize> = HashMap::new();
        let mut failures = Vec::with_capacity(result.failed.len());

        for failure in &result.failed {
            *by_reason
                .entry(failure.reason.code().to_string())
                .or_default() += 1;
            failures.push(FailedIdentifier {
                key: failure.key.to_string(),
                code: failure.reason.code().to_string(),
                message: failure.reason.to_string(),
            });
        }

        let succeeded = result.succeeded.len();
        let failed = result.failed.len();
        let status = if failed == 0 {
            RunStatus::Success
        } else if succeeded > 0 {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Failed
        };

        Self {
            status,
            duration_secs: duration.as_secs_f64(),
            total: result.total,
            succeeded,
            failed,
            by_reason,
            failures,
        }
    }

    /// Prints the report to the console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("BATCH REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Parcels: {} submitted, {} drawn, {} failed",
            self.total, self.succeeded, self.failed
        );

        if !self.by_reason.is_empty() {
            println!("\n--- BY REASON ---");
            let mut reasons: Vec<_> = self.by_reason.iter().collect();
            reasons.sort_by_key(|(k, _)| k.as_str());
            for (code, count) in reasons {
                println!("  {}: {}", code, count);
            }
        }

        if !self.failures.is_empty() {
            println!("\n--- FAILURES ({}) ---", self.failures.len());
            for f in self.failures.iter().take(20) {
                println!("  [{}] {}", f.key, f.message);
            }
            if self.failures.len() > 20 {
                println!("  ... and {} more", self.failures.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Saves the report as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Failed identifiers as a single comma-joined line
    pub fn failed_keys_csv(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.key.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Compact one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} submitted, {} drawn, {} failed",
            self.total, self.succeeded, self.failed
        )
    }
}
