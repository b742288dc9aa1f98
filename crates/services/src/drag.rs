//! Pointer geometry for the hue bar and the saturation/value plane.
//!
//! Coordinates are window-space, independent of the windowing toolkit.

use shared::color::normalize_hue;
use tracing::debug;

/// Bounding box of a picker control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PickerRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Pointer position as fractions of the box, each clamped to `[0, 1]`.
    /// A zero-sized axis yields 0.
    pub fn fraction(&self, pointer: Pointer) -> (f64, f64) {
        let axis = |offset: f64, extent: f64| {
            if extent <= 0.0 {
                0.0
            } else {
                offset.clamp(0.0, extent) / extent
            }
        };
        (
            axis(pointer.client_x - self.left, self.width),
            axis(pointer.client_y - self.top, self.height),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub client_x: f64,
    pub client_y: f64,
}

impl Pointer {
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Hue in whole degrees under the pointer; the right edge wraps to 0
pub fn hue_at(rect: PickerRect, pointer: Pointer) -> f64 {
    let (fx, _) = rect.fraction(pointer);
    normalize_hue((fx * 360.0).round())
}

/// `(s, v)` under the pointer: saturation grows rightward, value grows upward
pub fn saturation_value_at(rect: PickerRect, pointer: Pointer) -> (f64, f64) {
    let (fx, fy) = rect.fraction(pointer);
    (fx, 1.0 - fy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Hue,
    SaturationValue,
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    target: DragTarget,
    rect: PickerRect,
}

/// Tracks the single drag that may be in progress
#[derive(Debug, Default)]
pub struct DragTracker {
    active: Option<ActiveDrag>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag, replacing one that never saw its release
    pub fn begin(&mut self, target: DragTarget, rect: PickerRect) {
        if let Some(previous) = self.active {
            debug!(target = ?previous.target, "Replacing unreleased drag");
        }
        debug!(target = ?target, "Drag started");
        self.active = Some(ActiveDrag { target, rect });
    }

    /// Target and box of the active drag, if any
    pub fn active(&self) -> Option<(DragTarget, PickerRect)> {
        self.active.map(|d| (d.target, d.rect))
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// End the drag. Returns false if none was active.
    pub fn end(&mut self) -> bool {
        match self.active.take() {
            Some(drag) => {
                debug!(target = ?drag.target, "Drag ended");
                true
            }
            None => false,
        }
    }
}
