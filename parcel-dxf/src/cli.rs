//! Implementation of the draw command
//!
//! Parse the identifier batch, run it through the pipeline, write the
//! DXF, print the report. Ctrl-C cancels cooperatively; keys already
//! decided stay in the report.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use uldk::{
    parse_identifiers, process_batch, CancelToken, ProcessOptions, UldkClient,
    DEFAULT_CONCURRENCY,
};

use parcel_dxf::config::DrawConfig;
use parcel_dxf::emit::emit_parcels;
use parcel_dxf::export::dxf::DxfDocument;
use parcel_dxf::report::{BatchReport, RunStatus};

/// Runs one batch from raw identifier text to a saved DXF file
pub async fn cmd_draw(
    raw: &str,
    config: &DrawConfig,
    output: &Path,
    base_url: &str,
    jobs: Option<usize>,
    failed_log: Option<&Path>,
    report_json: Option<&Path>,
) -> Result<()> {
    let keys = parse_identifiers(raw)?;
    info!(count = keys.len(), "identifiers parsed");

    let client = UldkClient::with_base_url(base_url);
    let options = ProcessOptions {
        draw_mode: config.draw_mode(),
        convert_to_puwg2000: config.convert_to_puwg2000,
        concurrency: jobs.unwrap_or(DEFAULT_CONCURRENCY),
    };

    let cancel = CancelToken::new();
    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing decided parcels");
            ctrlc_cancel.cancel();
        }
    });

    // Log every full decile instead of every key
    let mut last_decile = 0;
    let start = Instant::now();
    let result = process_batch(keys, &client, &options, &cancel, |progress| {
        let decile = (progress.fraction() * 10.0) as u32;
        if decile > last_decile {
            last_decile = decile;
            info!(
                processed = progress.processed,
                total = progress.total,
                "progress {}%",
                decile * 10
            );
        }
    })
    .await;

    let report = BatchReport::from_result(&result, start.elapsed());

    if result.succeeded.is_empty() {
        warn!("no parcels to draw, skipping output file");
    } else {
        // An existing drawing at the output path is appended to
        let mut document = DxfDocument::open_or_new(output)?;
        if !document.is_empty() {
            info!(path = %output.display(), "appending to existing drawing");
        }
        emit_parcels(&result.succeeded, config, &mut document);
        document.save(output)?;
        info!(
            path = %output.display(),
            parcels = result.succeeded.len(),
            entities = document.entity_count(),
            "drawing saved"
        );
    }

    report.display();

    if let Some(path) = failed_log {
        if report.failures.is_empty() {
            info!("no failures, skipping failed-identifier log");
        } else {
            std::fs::write(path, report.failed_keys_csv())
                .context(format!("Failed to write file: {}", path.display()))?;
            info!(path = %path.display(), count = report.failed, "failed identifiers saved");
        }
    }

    if let Some(path) = report_json {
        report.save_to_file(path)?;
        info!(path = %path.display(), "report saved");
    }

    if report.status == RunStatus::Failed {
        anyhow::bail!("no parcel could be drawn ({})", report.summary());
    }

    Ok(())
}
