//! Raster-trace endpoint boundary: wire types and response ingestion.
//!
//! The trace service converts a bitmap into vector paths server-side; the
//! canvas treats it as opaque. Responses are untrusted input — every path
//! string is vetted before it becomes a document element, and a response
//! that fails vetting is rejected wholesale rather than partially applied.

#[cfg(test)]
#[path = "trace_test.rs"]
mod trace_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bounds::Bounds;
use crate::element::{Element, ElementKind, LayerKind};
use crate::sanitize::is_safe_external_path;

/// Tracing strategy requested from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    /// Solid filled outline of the subject.
    Silhouette,
    /// Centerline strokes for sketch-like art.
    Lineart,
}

/// Request payload for the trace endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRequest {
    /// Source bitmap as a data URL.
    pub image: String,
    pub mode: TraceMode,
    /// Longest-edge target size for the traced result, in millimeters.
    pub target_size_mm: f64,
    /// Luminance threshold, 0–255.
    pub threshold: u8,
    pub denoise: bool,
    pub auto_invert: bool,
}

/// Geometry statistics reported alongside a successful trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStats {
    pub local_bounds: Bounds,
}

/// Response payload from the trace endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResponse {
    pub ok: bool,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub combined_path: Option<String>,
    #[serde(default)]
    pub stats: Option<TraceStats>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Why a trace response could not be turned into an element.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TraceError {
    #[error("trace failed: {0}")]
    Failed(String),
    #[error("trace returned no paths")]
    Empty,
    #[error("trace path rejected by sanitizer")]
    Rejected,
}

/// Build a document element from a trace response.
///
/// A single-path result (or a combined path) becomes a `TracedPath`; a
/// multi-path result becomes a `TracedPathGroup` so it stays one selectable
/// unit. Any path failing [`is_safe_external_path`] rejects the whole
/// response.
///
/// # Errors
///
/// `Failed` when the endpoint reported an error, `Empty` when no usable
/// path came back, `Rejected` when a path fails vetting.
pub fn element_from_trace(response: &TraceResponse, layer: LayerKind) -> Result<Element, TraceError> {
    if !response.ok {
        let message = response.error.clone().unwrap_or_else(|| "unknown error".to_owned());
        return Err(TraceError::Failed(message));
    }

    if let Some(combined) = &response.combined_path {
        return checked_path(combined).map(|d| Element::new(ElementKind::TracedPath { d }, layer));
    }

    match response.paths.len() {
        0 => Err(TraceError::Empty),
        1 => checked_path(&response.paths[0])
            .map(|d| Element::new(ElementKind::TracedPath { d }, layer)),
        _ => {
            let paths = response
                .paths
                .iter()
                .map(|p| checked_path(p))
                .collect::<Result<Vec<String>, TraceError>>()?;
            Ok(Element::new(ElementKind::TracedPathGroup { paths }, layer))
        }
    }
}

fn checked_path(d: &str) -> Result<String, TraceError> {
    if is_safe_external_path(d) {
        Ok(d.to_owned())
    } else {
        warn!(length = d.len(), "rejected unsafe trace path");
        Err(TraceError::Rejected)
    }
}
