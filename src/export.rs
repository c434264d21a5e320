//! Laser-safe SVG export.
//!
//! A pure function over the committed document: visible non-GUIDE elements
//! are partitioned into `<g id="CUT">` and `<g id="ENGRAVE">` groups, text
//! is outlined through the font collaborator (an exported file must need no
//! fonts), and `Logo` elements flagged `cut_out` are subtracted from the
//! base CUT outline through the path-boolean collaborator, producing one
//! compound path with literal holes. Every number and path string written
//! out passes the sanitizer — the consumer is laser-control software that
//! chokes on `NaN`, `Infinity`, and non-ASCII bytes.
//!
//! Export never mutates the document, so a failed export is always safely
//! retryable. Collaborator failures degrade: missing fonts fall back, and a
//! failed boolean composition exports the uncomposed paths instead.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::fmt::Write;

use serde::Serialize;
use tracing::warn;

use crate::doc::Document;
use crate::element::{Element, ElementId, ElementKind, LayerKind, Transform};
use crate::matrix::Mat;
use crate::pathops::{PathArena, PathHandle, PathOpError, PathOps};
use crate::sanitize::{sanitize_number, sanitize_path_data};
use crate::text::FontService;

/// Failure modes of export serialization itself. Collaborator failures are
/// absorbed and degraded, not surfaced here.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("svg serialization failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Summary shipped alongside the SVG for filename templating and logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportMeta {
    pub width_mm: f64,
    pub height_mm: f64,
    pub cut_elements: usize,
    pub engrave_elements: usize,
}

/// The one surface the surrounding application consumes.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPayload {
    pub svg: String,
    pub name: String,
    pub meta: ExportMeta,
}

/// Build the export payload for a document.
///
/// # Errors
///
/// Only on serialization failure; see [`build_export_svg`].
pub async fn export_payload(
    doc: &Document,
    name: &str,
    fonts: &FontService,
    ops: Option<&dyn PathOps>,
) -> Result<ExportPayload, ExportError> {
    let svg = build_export_svg(doc, fonts, ops).await?;
    let (cut, engrave) = partition(doc);
    Ok(ExportPayload {
        svg,
        name: name.to_owned(),
        meta: ExportMeta {
            width_mm: doc.artboard.width_mm,
            height_mm: doc.artboard.height_mm,
            cut_elements: cut.len(),
            engrave_elements: engrave.len(),
        },
    })
}

/// Serialize the document to a layer-tagged SVG string.
///
/// # Errors
///
/// Only when writing into the output string fails.
pub async fn build_export_svg(
    doc: &Document,
    fonts: &FontService,
    ops: Option<&dyn PathOps>,
) -> Result<String, ExportError> {
    let (cut, engrave) = partition(doc);

    // Cut-out composition: union the flagged logos in the base outline's
    // local frame and subtract them from it.
    let base = cut.iter().find(|e| matches!(e.kind, ElementKind::Shape { .. })).copied();
    let cutouts: Vec<&Element> = cut
        .iter()
        .filter(|e| matches!(e.kind, ElementKind::Logo { cut_out: true, .. }))
        .copied()
        .collect();
    let mut compound: Option<(ElementId, Vec<ElementId>, String)> = None;
    if let (Some(ops), Some(base_el)) = (ops, base) {
        if !cutouts.is_empty() {
            match compose_cutout(base_el, &cutouts, ops) {
                Ok(d) => {
                    compound =
                        Some((base_el.id, cutouts.iter().map(|e| e.id).collect(), d));
                }
                Err(err) => {
                    warn!(%err, "cut-out composition failed, exporting paths unmodified");
                }
            }
        }
    }

    let w = sanitize_number(doc.artboard.width_mm);
    let h = sanitize_number(doc.artboard.height_mm);
    let mut out = String::new();
    write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\">",
    )?;

    write!(out, "<g id=\"CUT\" fill=\"none\" stroke=\"#FF0000\" stroke-width=\"0.2\">")?;
    for element in &cut {
        if let Some((base_id, consumed, d)) = &compound {
            if element.id == *base_id {
                write_path(&mut out, d, &element.transform)?;
                continue;
            }
            if consumed.contains(&element.id) {
                continue;
            }
        }
        write_element(&mut out, element, fonts).await?;
    }
    write!(out, "</g>")?;

    write!(out, "<g id=\"ENGRAVE\" fill=\"#000000\" stroke=\"none\">")?;
    for element in &engrave {
        write_element(&mut out, element, fonts).await?;
    }
    write!(out, "</g>")?;

    write!(out, "</svg>")?;
    Ok(out)
}

/// Serialize an element's transform for the `transform` attribute, omitting
/// every identity component to keep output minimal. Empty string when the
/// whole transform is identity.
#[must_use]
pub fn transform_attr(t: &Transform) -> String {
    const EPS: f64 = 1e-9;
    let mut parts: Vec<String> = Vec::new();
    if t.x_mm.abs() > EPS || t.y_mm.abs() > EPS {
        parts.push(format!("translate({} {})", sanitize_number(t.x_mm), sanitize_number(t.y_mm)));
    }
    if t.rotate_deg.abs() > EPS {
        parts.push(format!("rotate({})", sanitize_number(t.rotate_deg)));
    }
    if (t.scale_x - 1.0).abs() > EPS || (t.scale_y - 1.0).abs() > EPS {
        parts.push(format!("scale({} {})", sanitize_number(t.scale_x), sanitize_number(t.scale_y)));
    }
    parts.join(" ")
}

/// Visible, exportable elements split by layer tag; GUIDE never exports.
/// Iterates layers bottom-up so draw order inside each group is preserved.
fn partition(doc: &Document) -> (Vec<&Element>, Vec<&Element>) {
    let mut cut = Vec::new();
    let mut engrave = Vec::new();
    let mut layers = doc.layers_top_down();
    layers.reverse();
    for layer in layers {
        if !layer.visible {
            continue;
        }
        for element in &layer.elements {
            if !element.visible {
                continue;
            }
            match element.layer {
                LayerKind::Cut => cut.push(element),
                LayerKind::Engrave => engrave.push(element),
                LayerKind::Guide => {}
            }
        }
    }
    (cut, engrave)
}

/// Union the cut-out logos in the base element's local frame and subtract
/// them from the base outline. All handles are arena-owned and freed on
/// every exit path.
fn compose_cutout(
    base: &Element,
    cutouts: &[&Element],
    ops: &dyn PathOps,
) -> Result<String, PathOpError> {
    let arena = PathArena::new(ops);
    let base_d = base
        .path_data()
        .ok_or_else(|| PathOpError::Parse("base outline has no path data".to_owned()))?;
    let base_handle = arena.from_svg(base_d)?;
    let base_inverse = Mat::from_transform(&base.transform).invert();

    let mut holes: Option<PathHandle> = None;
    for logo in cutouts {
        let Some(d) = logo.path_data() else {
            continue;
        };
        let handle = arena.from_svg(d)?;
        let to_base_local = base_inverse.mul(&Mat::from_transform(&logo.transform));
        let placed = arena.transform(handle, &to_base_local)?;
        holes = Some(match holes {
            Some(merged) => arena.union(merged, placed)?,
            None => placed,
        });
    }

    match holes {
        Some(holes) => {
            let composed = arena.difference(base_handle, holes)?;
            arena.to_svg(composed)
        }
        None => arena.to_svg(base_handle),
    }
}

async fn write_element(
    out: &mut String,
    element: &Element,
    fonts: &FontService,
) -> Result<(), ExportError> {
    match &element.kind {
        ElementKind::Shape { d }
        | ElementKind::Border { d }
        | ElementKind::Ornament { d }
        | ElementKind::BasicShape { d }
        | ElementKind::TracedPath { d }
        | ElementKind::Logo { d, .. }
        | ElementKind::Icon { d } => write_path(out, d, &element.transform),
        ElementKind::TracedPathGroup { paths } => {
            write!(out, "<g{}>", attr("transform", &transform_attr(&element.transform)))?;
            for d in paths {
                write_path(out, d, &Transform::default())?;
            }
            write!(out, "</g>")?;
            Ok(())
        }
        ElementKind::Text { content, font_id, size_mm, letter_spacing_mm, shaped } => {
            let outline = match shaped {
                Some(cached) => Some(cached.d.clone()),
                None => fonts
                    .shape(font_id, content, *size_mm, *letter_spacing_mm)
                    .await
                    .map(|p| p.d),
            };
            match outline {
                Some(d) => write_path(out, &d, &element.transform),
                None => {
                    // Degraded fallback: live text needs the viewer to
                    // resolve fonts, but export must still produce output.
                    warn!(%font_id, "exporting live text, no outline available");
                    let size = sanitize_number(*size_mm);
                    write!(
                        out,
                        "<text x=\"0\" y=\"{size}\" font-size=\"{size}\"{}>{}</text>",
                        attr("transform", &transform_attr(&element.transform)),
                        xml_escape(content),
                    )?;
                    Ok(())
                }
            }
        }
        ElementKind::EngraveImage { data_url, width_mm, height_mm }
        | ElementKind::EngraveSketch { data_url, width_mm, height_mm } => {
            write!(
                out,
                "<image href=\"{}\" width=\"{}\" height=\"{}\"{}/>",
                xml_escape(data_url),
                sanitize_number(*width_mm),
                sanitize_number(*height_mm),
                attr("transform", &transform_attr(&element.transform)),
            )?;
            Ok(())
        }
    }
}

fn write_path(out: &mut String, d: &str, transform: &Transform) -> Result<(), ExportError> {
    write!(
        out,
        "<path d=\"{}\"{}/>",
        sanitize_path_data(d),
        attr("transform", &transform_attr(transform)),
    )?;
    Ok(())
}

/// ` name="value"` when the value is non-empty, nothing otherwise.
fn attr(name: &str, value: &str) -> String {
    if value.is_empty() { String::new() } else { format!(" {name}=\"{value}\"") }
}

/// Escape the five XML special characters for text content and attributes.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
