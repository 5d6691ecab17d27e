//! The visible logical window and the pan/zoom controller that owns it.
//!
//! Logical space maps onto the container with a uniform scale and the
//! viewport centred ("meet"), so the whole viewport is always visible.

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use tracing::debug;

use super::config::ZoomConfig;

/// Container size assumed while the real one is zero or unknown.
pub const FALLBACK_CONTAINER: Vec2 = Vec2::new(900.0, 700.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(center: Pos2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    pub fn min(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn center(&self) -> Pos2 {
        self.min() + self.size() / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.min(), self.size())
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Logical units covered by one container pixel.
    pub fn units_per_pixel(&self, container: Vec2) -> f32 {
        let container = usable_container(container);
        (self.width / container.x).max(self.height / container.y)
    }

    /// Converts a point relative to the container's top-left corner.
    pub fn logical_at(&self, pixel: Pos2, container: Vec2) -> Pos2 {
        let container = usable_container(container);
        let units = self.units_per_pixel(container);
        let offset = (container - self.size() / units) / 2.0;
        self.min() + (pixel.to_vec2() - offset) * units
    }

    pub fn pixel_at(&self, logical: Pos2, container: Vec2) -> Pos2 {
        let container = usable_container(container);
        let units = self.units_per_pixel(container);
        let offset = (container - self.size() / units) / 2.0;
        Pos2::ZERO + offset + (logical - self.min()) / units
    }
}

/// `container` when it is a real, laid-out size, otherwise the fixed fallback.
pub fn usable_container(container: Vec2) -> Vec2 {
    if container.x.is_finite() && container.y.is_finite() && container.x > 0.0 && container.y > 0.0
    {
        container
    } else {
        FALLBACK_CONTAINER
    }
}

/// Pan and zoom state. The simulation never writes to it.
#[derive(Clone, Debug)]
pub struct ViewportController {
    viewport: Viewport,
    container: Vec2,
    zoom: ZoomConfig,
    drag_from: Option<Pos2>,
}

impl ViewportController {
    pub fn new(zoom: ZoomConfig) -> Self {
        let initial = zoom.initial_viewport();
        Self {
            viewport: if initial.is_valid() {
                initial
            } else {
                Viewport::new(-450.0, -350.0, 900.0, 700.0)
            },
            container: Vec2::ZERO,
            zoom,
            drag_from: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last reported container size; may be zero before the first layout.
    pub fn container(&self) -> Vec2 {
        self.container
    }

    pub fn set_container(&mut self, container: Vec2) {
        self.container = container;
    }

    /// Replaces the viewport unless `candidate` is degenerate.
    pub fn set_viewport(&mut self, candidate: Viewport) -> bool {
        if !candidate.is_valid() {
            debug!(?candidate, "rejected degenerate viewport");
            return false;
        }
        self.viewport = candidate;
        true
    }

    pub fn logical_at(&self, pixel: Pos2) -> Pos2 {
        self.viewport.logical_at(pixel, self.container)
    }

    pub fn pixel_at(&self, logical: Pos2) -> Pos2 {
        self.viewport.pixel_at(logical, self.container)
    }

    pub fn is_panning(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn begin_pan(&mut self, pixel: Pos2) {
        self.drag_from = Some(pixel);
    }

    /// Moves the viewport with the pointer while a drag is active.
    pub fn pan_to(&mut self, pixel: Pos2) -> bool {
        let Some(from) = self.drag_from else {
            return false;
        };
        let units = self.viewport.units_per_pixel(self.container);
        let shift = (pixel - from) * units;

        let mut candidate = self.viewport;
        candidate.x -= shift.x;
        candidate.y -= shift.y;
        self.drag_from = Some(pixel);
        self.set_viewport(candidate)
    }

    pub fn end_pan(&mut self) {
        self.drag_from = None;
    }

    /// The pointer left the surface; any drag in progress ends here.
    pub fn pointer_left(&mut self) {
        self.end_pan();
    }

    /// Zooms one wheel notch. Positive `direction` zooms out, negative zooms in,
    /// zero is ignored. The logical point under `focus` (container pixels) stays
    /// put; without a focus the viewport centre does.
    pub fn zoom(&mut self, direction: f32, focus: Option<Pos2>) -> bool {
        let factor = if direction > 0.0 {
            self.zoom.zoom_out_factor
        } else if direction < 0.0 {
            self.zoom.zoom_in_factor
        } else {
            return false;
        };

        let current = self.viewport;
        let min = self.zoom.min_size();
        let max = self.zoom.max_size();
        let size = vec2(
            (current.width * factor).clamp(min.x, max.x),
            (current.height * factor).clamp(min.y, max.y),
        );

        let anchor = focus
            .map(|pixel| self.logical_at(pixel))
            .filter(|point| point.x.is_finite() && point.y.is_finite())
            .unwrap_or_else(|| current.center());
        let ratio = vec2(size.x / current.width, size.y / current.height);
        let min_corner = anchor - (anchor - current.min()) * ratio;

        self.set_viewport(Viewport::new(min_corner.x, min_corner.y, size.x, size.y))
    }
}
