//! Path-boolean collaborator contract and handle lifetime management.
//!
//! The boolean geometry engine is an external module with manual memory
//! management: every handle it returns must be deleted exactly once, on
//! every code path, or native memory leaks accumulate across exports.
//! Rather than scattering paired create/delete calls through control flow,
//! callers run their composition inside a [`PathArena`] — every handle the
//! arena creates or adopts is freed when the arena drops, success or error.

#[cfg(test)]
#[path = "pathops_test.rs"]
mod pathops_test;

use std::cell::RefCell;

use crate::bounds::Bounds;
use crate::matrix::Mat;

/// Failure modes of the path-boolean collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PathOpError {
    #[error("path engine rejected input: {0}")]
    Parse(String),
    #[error("boolean operation failed: {0}")]
    Op(String),
    #[error("unknown path handle")]
    UnknownHandle,
}

/// Opaque handle to a path held by the external engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathHandle(pub u64);

/// Options for converting a stroke into a filled outline.
#[derive(Debug, Clone, Copy)]
pub struct StrokeOptions {
    pub width_mm: f64,
    pub miter_limit: f64,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self { width_mm: 0.2, miter_limit: 4.0 }
    }
}

/// The external boolean-path engine boundary.
///
/// Handles returned by any method are owned by the caller and must be
/// released with [`PathOps::delete_path`]; use a [`PathArena`] instead of
/// calling it directly.
pub trait PathOps {
    /// Parse SVG path data into an engine handle.
    ///
    /// # Errors
    ///
    /// `Parse` when the data is not valid path syntax.
    fn from_svg(&self, d: &str) -> Result<PathHandle, PathOpError>;

    /// Serialize a handle back to SVG path data.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` when the handle was already deleted.
    fn to_svg(&self, path: PathHandle) -> Result<String, PathOpError>;

    /// Boolean union of two paths.
    ///
    /// # Errors
    ///
    /// `Op` when the engine cannot combine the operands.
    fn union(&self, a: PathHandle, b: PathHandle) -> Result<PathHandle, PathOpError>;

    /// Subtract `b` from `a`.
    ///
    /// # Errors
    ///
    /// `Op` when the engine cannot combine the operands.
    fn difference(&self, a: PathHandle, b: PathHandle) -> Result<PathHandle, PathOpError>;

    /// Boolean intersection of two paths.
    ///
    /// # Errors
    ///
    /// `Op` when the engine cannot combine the operands.
    fn intersect(&self, a: PathHandle, b: PathHandle) -> Result<PathHandle, PathOpError>;

    /// Convert a stroked path into its filled outline.
    ///
    /// # Errors
    ///
    /// `Op` when outlining fails.
    fn stroke_to_path(
        &self,
        path: PathHandle,
        options: &StrokeOptions,
    ) -> Result<PathHandle, PathOpError>;

    /// Apply an affine matrix, returning a new handle.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` when the handle was already deleted.
    fn transform(&self, path: PathHandle, matrix: &Mat) -> Result<PathHandle, PathOpError>;

    /// Bounding box of a path.
    ///
    /// # Errors
    ///
    /// `UnknownHandle` when the handle was already deleted.
    fn get_bounds(&self, path: PathHandle) -> Result<Bounds, PathOpError>;

    /// Release a handle. Must be called exactly once per handle.
    fn delete_path(&self, path: PathHandle);
}

/// Scope guard that owns every handle created through it and frees them all
/// on drop, whichever way the enclosing function exits.
pub struct PathArena<'e> {
    engine: &'e dyn PathOps,
    handles: RefCell<Vec<PathHandle>>,
}

impl<'e> PathArena<'e> {
    #[must_use]
    pub fn new(engine: &'e dyn PathOps) -> Self {
        Self { engine, handles: RefCell::new(Vec::new()) }
    }

    /// Take ownership of a handle created outside the arena.
    pub fn adopt(&self, handle: PathHandle) -> PathHandle {
        self.handles.borrow_mut().push(handle);
        handle
    }

    /// Parse path data; the resulting handle is arena-owned.
    ///
    /// # Errors
    ///
    /// Propagates the engine's `Parse` error.
    pub fn from_svg(&self, d: &str) -> Result<PathHandle, PathOpError> {
        self.engine.from_svg(d).map(|h| self.adopt(h))
    }

    /// Union; the result is arena-owned, the operands stay arena-owned too.
    ///
    /// # Errors
    ///
    /// Propagates the engine's `Op` error.
    pub fn union(&self, a: PathHandle, b: PathHandle) -> Result<PathHandle, PathOpError> {
        self.engine.union(a, b).map(|h| self.adopt(h))
    }

    /// Difference; the result is arena-owned.
    ///
    /// # Errors
    ///
    /// Propagates the engine's `Op` error.
    pub fn difference(&self, a: PathHandle, b: PathHandle) -> Result<PathHandle, PathOpError> {
        self.engine.difference(a, b).map(|h| self.adopt(h))
    }

    /// Intersection; the result is arena-owned.
    ///
    /// # Errors
    ///
    /// Propagates the engine's `Op` error.
    pub fn intersect(&self, a: PathHandle, b: PathHandle) -> Result<PathHandle, PathOpError> {
        self.engine.intersect(a, b).map(|h| self.adopt(h))
    }

    /// Stroke outline; the result is arena-owned.
    ///
    /// # Errors
    ///
    /// Propagates the engine's `Op` error.
    pub fn stroke_to_path(
        &self,
        path: PathHandle,
        options: &StrokeOptions,
    ) -> Result<PathHandle, PathOpError> {
        self.engine.stroke_to_path(path, options).map(|h| self.adopt(h))
    }

    /// Transform; the result is arena-owned.
    ///
    /// # Errors
    ///
    /// Propagates the engine's error.
    pub fn transform(&self, path: PathHandle, matrix: &Mat) -> Result<PathHandle, PathOpError> {
        self.engine.transform(path, matrix).map(|h| self.adopt(h))
    }

    /// Serialize to SVG path data (no new handle involved).
    ///
    /// # Errors
    ///
    /// Propagates the engine's error.
    pub fn to_svg(&self, path: PathHandle) -> Result<String, PathOpError> {
        self.engine.to_svg(path)
    }
}

impl Drop for PathArena<'_> {
    fn drop(&mut self) {
        for handle in self.handles.borrow_mut().drain(..) {
            self.engine.delete_path(handle);
        }
    }
}
