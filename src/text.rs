//! Font-shaping collaborator contract and the memoizing font service.
//!
//! Shaping itself (glyph outlines, kerning) belongs to an external library;
//! this module owns the boundary: the [`FontShaper`] trait, and a
//! [`FontService`] that loads each font id at most once. Loads are memoized
//! behind a shared future, so concurrent requests for the same id while a
//! load is in flight all await the one load instead of fetching twice.
//! A failed load falls back to the default font; text output degrades, it
//! never hard-fails an export.
//!
//! The service is constructed by the host and passed to whoever needs it —
//! no process-wide singleton, so tests substitute fakes freely.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use tracing::warn;

use crate::bounds::Bounds;
use crate::consts::DEFAULT_FONT_ID;

/// Failure modes of the font collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FontError {
    #[error("font load failed for {font_id}: {message}")]
    Load { font_id: String, message: String },
    #[error("text shaping failed: {0}")]
    Shape(String),
}

/// Opaque handle to a loaded font. Shaper implementations key their parsed
/// font data off the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    pub font_id: String,
}

/// Text converted to outlined path data, in local millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPath {
    pub d: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub bbox: Bounds,
}

/// The external font-shaping library boundary.
///
/// `load_font` is the only suspension point; shaping and measuring are
/// synchronous once a font is loaded.
#[async_trait(?Send)]
pub trait FontShaper {
    async fn load_font(&self, font_id: &str) -> Result<FontHandle, FontError>;

    fn text_to_path(
        &self,
        font: &FontHandle,
        text: &str,
        size_mm: f64,
        letter_spacing_mm: f64,
    ) -> Result<TextPath, FontError>;

    fn measure_text_width(&self, font: &FontHandle, text: &str, size_mm: f64) -> f64;
}

type LoadFuture = Shared<LocalBoxFuture<'static, Result<Rc<FontHandle>, FontError>>>;

enum Slot {
    Ready(Rc<FontHandle>),
    Pending(LoadFuture),
}

/// Memoizing facade over a [`FontShaper`].
pub struct FontService {
    shaper: Rc<dyn FontShaper>,
    slots: RefCell<HashMap<String, Slot>>,
}

impl FontService {
    #[must_use]
    pub fn new(shaper: Rc<dyn FontShaper>) -> Self {
        Self { shaper, slots: RefCell::new(HashMap::new()) }
    }

    /// Load a font, reusing a cached handle or joining an in-flight load.
    /// Failed loads are not cached; the next request retries.
    ///
    /// # Errors
    ///
    /// Propagates the shaper's load failure.
    pub async fn font(&self, font_id: &str) -> Result<Rc<FontHandle>, FontError> {
        let cached = {
            let slots = self.slots.borrow();
            slots.get(font_id).map(|slot| match slot {
                Slot::Ready(handle) => Ok(Rc::clone(handle)),
                Slot::Pending(load) => Err(load.clone()),
            })
        };
        let pending = match cached {
            Some(Ok(handle)) => return Ok(handle),
            Some(Err(load)) => load,
            None => {
                let shaper = Rc::clone(&self.shaper);
                let id = font_id.to_owned();
                let load = async move { shaper.load_font(&id).await.map(Rc::new) }
                    .boxed_local()
                    .shared();
                self.slots
                    .borrow_mut()
                    .insert(font_id.to_owned(), Slot::Pending(load.clone()));
                load
            }
            // all borrows are released before the await below
        };
        let result = pending.await;
        let mut slots = self.slots.borrow_mut();
        match &result {
            Ok(handle) => {
                slots.insert(font_id.to_owned(), Slot::Ready(Rc::clone(handle)));
            }
            Err(_) => {
                slots.remove(font_id);
            }
        }
        result
    }

    /// Load a font, degrading to the default font on failure. `None` only
    /// when the default font itself cannot load.
    pub async fn font_or_fallback(&self, font_id: &str) -> Option<Rc<FontHandle>> {
        match self.font(font_id).await {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(font_id, %err, "font load failed, falling back to default");
                if font_id == DEFAULT_FONT_ID {
                    return None;
                }
                match self.font(DEFAULT_FONT_ID).await {
                    Ok(handle) => Some(handle),
                    Err(err) => {
                        warn!(%err, "default font load failed");
                        None
                    }
                }
            }
        }
    }

    /// Shape text into an outlined path, with font fallback. `None` when no
    /// font could be loaded or shaping failed; callers render degraded text.
    pub async fn shape(
        &self,
        font_id: &str,
        text: &str,
        size_mm: f64,
        letter_spacing_mm: f64,
    ) -> Option<TextPath> {
        let font = self.font_or_fallback(font_id).await?;
        match self.shaper.text_to_path(&font, text, size_mm, letter_spacing_mm) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(font_id, %err, "text shaping failed");
                None
            }
        }
    }

    /// Measure text width with font fallback.
    pub async fn measure(&self, font_id: &str, text: &str, size_mm: f64) -> Option<f64> {
        let font = self.font_or_fallback(font_id).await?;
        Some(self.shaper.measure_text_width(&font, text, size_mm))
    }
}
