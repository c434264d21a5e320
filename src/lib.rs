//! Canvas and document engine for the laser-cutting design tools.
//!
//! This crate is compiled to WebAssembly and embedded in the browser app.
//! It owns the millimeter-accurate document model, bounded undo/redo
//! history, pan/zoom coordinate transforms, hit-testing and selection, the
//! pointer gesture state machine with its live-preview side-channel, and
//! laser-safe SVG export. The host JavaScript layer wires DOM events to
//! [`engine::Engine`], schedules one [`engine::EngineCore::on_frame`] call
//! per animation frame, and handles the [`engine::Action`]s that come back
//! (downloads, toasts, cursor styling).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller and testable [`engine::EngineCore`] |
//! | [`history`] | Snapshot history and the command reducer |
//! | [`doc`] | Artboard, layers, and the document container |
//! | [`element`] | Element tagged union and sparse patches |
//! | [`factory`] | Parametric document builder and rebuild splicing |
//! | [`camera`] | Pan/zoom camera and mm↔px conversions |
//! | [`bounds`] | Axis-aligned bounds per element kind |
//! | [`matrix`] | 2×3 affine matrices for frame conversions |
//! | [`selection`] | Selection set, active element, interaction mode |
//! | [`hit`] | Element and handle hit-testing |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`preview`] | Live-drag visual transform side-channel |
//! | [`export`] | Layer-partitioned laser-safe SVG export |
//! | [`text`] | Font-shaping boundary and memoized font service |
//! | [`pathops`] | Boolean-path boundary and handle arena |
//! | [`trace`] | Raster-trace wire types and ingestion |
//! | [`sanitize`] | NaN/Infinity/non-ASCII scrubbing |
//! | [`consts`] | Shared numeric constants |

pub mod bounds;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod export;
pub mod factory;
pub mod history;
pub mod hit;
pub mod input;
pub mod matrix;
pub mod pathops;
pub mod preview;
pub mod sanitize;
pub mod selection;
pub mod text;
pub mod trace;
