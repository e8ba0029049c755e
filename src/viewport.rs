//! Aspect-preserving "fit" viewport mapping a fixed logical world onto a
//! variable-size render surface.
//!
//! The world is scaled by `min(surface_w / world_w, surface_h / world_h)` and
//! centered, so content is letterboxed or pillarboxed but never stretched
//! non-uniformly. The viewport is the sole coordinate-conversion authority:
//! drawing goes through [`FitViewport::project`] (applied as a canvas
//! transform once per frame) and pointer input comes back through
//! [`FitViewport::unproject`].

use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct FitViewport {
    world_width: f64,
    world_height: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl FitViewport {
    /// World dimensions are design-time constants; non-positive values are a
    /// configuration error caught before any session state exists.
    pub fn new(world_width: f64, world_height: f64) -> Result<Self, EngineError> {
        if !(world_width > 0.0) || !(world_height > 0.0) {
            return Err(EngineError::InvalidWorldSize {
                width: world_width,
                height: world_height,
            });
        }
        Ok(Self {
            world_width,
            world_height,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    pub fn world_width(&self) -> f64 {
        self.world_width
    }

    pub fn world_height(&self) -> f64 {
        self.world_height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Recompute scale and centering offsets for the current surface size.
    /// Called once per frame before drawing. A zero-size surface yields a
    /// degenerate zero-scale viewport; world dimensions are guaranteed
    /// positive by construction so no division by zero is possible here.
    pub fn resize(&mut self, surface_width: f64, surface_height: f64) {
        let limiting = (surface_width / self.world_width).min(surface_height / self.world_height);
        self.scale = limiting;
        let fitted_width = self.world_width * limiting;
        let fitted_height = self.world_height * limiting;
        self.offset_x = (surface_width - fitted_width) / 2.0;
        self.offset_y = (surface_height - fitted_height) / 2.0;
    }

    /// World coordinates to surface coordinates.
    pub fn project(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            self.offset_x + world_x * self.scale,
            self.offset_y + world_y * self.scale,
        )
    }

    /// Surface coordinates to world coordinates (e.g. a pointer click into a
    /// world-space shot target). Inverse of [`FitViewport::project`] whenever
    /// the scale is positive.
    pub fn unproject(&self, surface_x: f64, surface_y: f64) -> (f64, f64) {
        (
            (surface_x - self.offset_x) / self.scale,
            (surface_y - self.offset_y) / self.scale,
        )
    }
}
