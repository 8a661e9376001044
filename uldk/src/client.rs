//! ULDK registry client
//!
//! ULDK (Usługa Lokalizacji Działek Katastralnych) is the national parcel
//! lookup service. `GetParcelById` answers with a status line followed by
//! the parcel boundary as hex-encoded EWKB in PUWG 1992 coordinates.
//!
//! Retry and backoff are deliberately not implemented here; a failed
//! request surfaces as a per-key failure in the batch result.

use std::future::Future;

use geozero::wkb::Ewkb;
use geozero::ToGeo;

use crate::types::{ParcelKey, RawShape};
use crate::UldkError;

/// Public ULDK endpoint
pub const DEFAULT_BASE_URL: &str = "https://uldk.gugik.gov.pl";

/// Boundary lookup by parcel key
pub trait RegistryClient {
    /// Fetches the boundary shape for one parcel.
    ///
    /// # Errors
    ///
    /// Returns [`UldkError::Fetch`] when the registry is unreachable, the
    /// response is malformed, or the identifier is unknown.
    fn fetch(&self, key: &ParcelKey) -> impl Future<Output = Result<RawShape, UldkError>> + Send;
}

/// HTTP client for the ULDK service
#[derive(Debug, Clone)]
pub struct UldkClient {
    http: reqwest::Client,
    base_url: String,
}

impl UldkClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for UldkClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for UldkClient {
    fn fetch(&self, key: &ParcelKey) -> impl Future<Output = Result<RawShape, UldkError>> + Send {
        let url = format!("{}/?request=GetParcelById&id={}", self.base_url, key);
        async move {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| UldkError::fetch(key.as_str(), e.to_string()))?;

            let body = response
                .text()
                .await
                .map_err(|e| UldkError::fetch(key.as_str(), e.to_string()))?;

            decode_response(key, &body)
        }
    }
}

/// Decodes a raw ULDK response body into a geometry.
///
/// Expected layout: a numeric status line (negative means the lookup
/// failed, with a human-readable message appended), then one line of
/// hex-encoded EWKB.
fn decode_response(key: &ParcelKey, body: &str) -> Result<RawShape, UldkError> {
    let mut lines = body.trim().lines();

    let status_line = lines.next().unwrap_or("").trim();
    let status: i32 = status_line
        .split_whitespace()
        .next()
        .unwrap_or("")
        .parse()
        .map_err(|_| {
            UldkError::fetch(
                key.as_str(),
                format!("malformed registry response: {status_line:?}"),
            )
        })?;

    if status < 0 {
        return Err(UldkError::fetch(
            key.as_str(),
            format!("registry rejected identifier ({status_line})"),
        ));
    }

    let hex_line = lines
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| UldkError::fetch(key.as_str(), "response contains no geometry"))?;

    let bytes = hex::decode(hex_line)
        .map_err(|e| UldkError::fetch(key.as_str(), format!("invalid hex geometry: {e}")))?;

    Ewkb(bytes)
        .to_geo()
        .map_err(|e| UldkError::fetch(key.as_str(), format!("invalid EWKB geometry: {e}")))
}
