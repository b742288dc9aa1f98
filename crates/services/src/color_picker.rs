//! Session color state behind the design color picker.
//!
//! HSV is authoritative. Every successful edit ends in [`ColorPicker::refresh`],
//! which re-derives RGB from HSV, formats HEX and stores it as the form's
//! design color.

use crate::drag::{hue_at, saturation_value_at, DragTarget, DragTracker, PickerRect, Pointer};
use crate::state_store::StateStore;
use crate::storage::StorageBackend;
use shared::color::{
    hsv_to_rgb, normalize_hex_input, normalize_hue, parse_hex, rgb_to_hex, rgb_to_hsv,
    ColorProjection, Hsv, Rgb,
};
use shared::ColorError;
use tracing::{debug, warn};

/// Picker color before anything is chosen or restored
pub const DEFAULT_HSV: Hsv = Hsv::new(210.0, 0.74, 0.69);
pub const DEFAULT_RGB: Rgb = Rgb::new(46, 111, 176);

#[derive(Debug)]
pub struct ColorPicker {
    hsv: Hsv,
    rgb: Rgb,
    drag: DragTracker,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self {
            hsv: DEFAULT_HSV,
            rgb: DEFAULT_RGB,
            drag: DragTracker::new(),
        }
    }
}

impl ColorPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a previously saved design color. `"auto"` keeps the default
    /// color and writes nothing.
    pub fn restore<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
    ) -> Result<(), ColorError> {
        let Some(design) = store.state().gen_form.design_hex().map(str::to_owned) else {
            return Ok(());
        };
        match self.set_color_from_hex(store, &design) {
            Err(ColorError::InvalidHex(hex)) => {
                warn!(design = %hex, "Saved design color is not valid; keeping default");
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn projection(&self) -> ColorProjection {
        ColorProjection {
            hex: rgb_to_hex(self.rgb),
            rgb: self.rgb,
            hsv: self.hsv,
        }
    }

    pub fn set_hue<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        h: f64,
    ) -> Result<ColorProjection, ColorError> {
        self.hsv.h = normalize_hue(h);
        self.refresh(store)
    }

    pub fn set_saturation_value<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        s: f64,
        v: f64,
    ) -> Result<ColorProjection, ColorError> {
        self.hsv.s = s.clamp(0.0, 1.0);
        self.hsv.v = v.clamp(0.0, 1.0);
        self.refresh(store)
    }

    /// RGB edit. The result may snap to the nearest color HSV can reproduce.
    pub fn set_color_from_rgb<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        rgb: Rgb,
    ) -> Result<ColorProjection, ColorError> {
        self.rgb = rgb;
        self.hsv = rgb_to_hsv(rgb);
        self.refresh(store)
    }

    /// RGB edit from three text fields
    pub fn set_color_from_rgb_input<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        r: &str,
        g: &str,
        b: &str,
    ) -> Result<ColorProjection, ColorError> {
        let rgb = Rgb::new(parse_channel('R', r)?, parse_channel('G', g)?, parse_channel('B', b)?);
        self.set_color_from_rgb(store, rgb)
    }

    /// Strict `#RRGGBB` edit. Anything else is rejected and changes nothing.
    pub fn set_color_from_hex<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        hex: &str,
    ) -> Result<ColorProjection, ColorError> {
        let rgb = parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(hex.to_string()))?;
        self.set_color_from_rgb(store, rgb)
    }

    /// HEX edit from a text field: surrounding whitespace and a missing `#` are tolerated
    pub fn set_color_from_hex_input<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        input: &str,
    ) -> Result<ColorProjection, ColorError> {
        self.set_color_from_hex(store, &normalize_hex_input(input))
    }

    /// Begin dragging on a control and apply the position under the pointer
    pub fn pointer_down<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        target: DragTarget,
        rect: PickerRect,
        pointer: Pointer,
    ) -> Result<ColorProjection, ColorError> {
        self.drag.begin(target, rect);
        self.apply_drag(store, target, rect, pointer)
    }

    /// Follow the pointer. Returns `Ok(None)` when no drag is active.
    pub fn pointer_move<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        pointer: Pointer,
    ) -> Result<Option<ColorProjection>, ColorError> {
        match self.drag.active() {
            Some((target, rect)) => self.apply_drag(store, target, rect, pointer).map(Some),
            None => Ok(None),
        }
    }

    /// End the drag; safe to call any number of times
    pub fn pointer_up(&mut self) -> bool {
        self.drag.end()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_target(&self) -> Option<DragTarget> {
        self.drag.active().map(|(target, _)| target)
    }

    fn apply_drag<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
        target: DragTarget,
        rect: PickerRect,
        pointer: Pointer,
    ) -> Result<ColorProjection, ColorError> {
        match target {
            DragTarget::Hue => self.set_hue(store, hue_at(rect, pointer)),
            DragTarget::SaturationValue => {
                let (s, v) = saturation_value_at(rect, pointer);
                self.set_saturation_value(store, s, v)
            }
        }
    }

    /// Re-derive RGB and HEX from HSV and store HEX as the design color.
    ///
    /// The color is updated even when the store fails to save.
    pub fn refresh<B: StorageBackend>(
        &mut self,
        store: &mut StateStore<B>,
    ) -> Result<ColorProjection, ColorError> {
        self.rgb = hsv_to_rgb(self.hsv.h, self.hsv.s, self.hsv.v);
        let projection = self.projection();
        debug!(hex = %projection.hex, "Design color updated");
        store.set_design(projection.hex.clone())?;
        Ok(projection)
    }
}

fn parse_channel(channel: char, value: &str) -> Result<u8, ColorError> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|_| ColorError::InvalidChannel {
            channel,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_store::STATE_KEY;
    use crate::storage::MemoryStorage;
    use shared::state::AUTO;

    fn design(store: &StateStore<&MemoryStorage>) -> String {
        store.state().gen_form.design.clone()
    }

    #[test]
    fn test_default_projection() {
        let picker = ColorPicker::new();
        let p = picker.projection();
        assert_eq!(p.hex, "#2E6FB0");
        assert_eq!(p.hsv, DEFAULT_HSV);
    }

    #[test]
    fn test_default_rgb_matches_default_hsv() {
        let p = ColorPicker::new().projection();
        assert_eq!(hsv_to_rgb(p.hsv.h, p.hsv.s, p.hsv.v), p.rgb);
        assert_eq!(rgb_to_hex(p.rgb), p.hex);
    }

    #[test]
    fn test_invalid_hex_changes_nothing() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();
        let before = picker.projection();

        for bad in ["#12345", "blue", "123456", "#GG0000", ""] {
            let err = picker.set_color_from_hex(&mut store, bad).unwrap_err();
            assert!(matches!(err, ColorError::InvalidHex(_)));
            assert_eq!(picker.projection(), before);
        }
        assert_eq!(design(&store), AUTO);
        assert!(storage.raw(STATE_KEY).is_none());
    }

    #[test]
    fn test_hex_edit_writes_design() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();

        let p = picker.set_color_from_hex(&mut store, "#ff0000").unwrap();
        assert_eq!(p.hex, "#FF0000");
        assert_eq!(p.hsv, Hsv::new(0.0, 1.0, 1.0));
        assert_eq!(design(&store), "#FF0000");
    }

    #[test]
    fn test_hex_edit_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();

        for hex in ["#2E66AF", "#FF7F01", "#010203", "#ABCDEF"] {
            let first = picker.set_color_from_hex(&mut store, hex).unwrap();
            let second = picker.set_color_from_hex(&mut store, &first.hex).unwrap();
            assert_eq!(first.hex, second.hex);
        }
    }

    #[test]
    fn test_rgb_edit_snaps_to_reproducible_color() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();

        let p = picker.set_color_from_rgb(&mut store, Rgb::new(46, 102, 175)).unwrap();
        assert_eq!(p.hsv.h, 214.0);
        // Hue is quantized, so the middle channel moves slightly
        assert_eq!(p.rgb.r, 46);
        assert_eq!(p.rgb.b, 175);
        assert!(p.rgb.g.abs_diff(102) <= 2);
        assert_eq!(design(&store), p.hex);
    }

    #[test]
    fn test_rgb_text_input_validation() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();
        let before = picker.projection();

        let err = picker.set_color_from_rgb_input(&mut store, "10", "256", "0").unwrap_err();
        assert!(matches!(err, ColorError::InvalidChannel { channel: 'G', .. }));
        let err = picker.set_color_from_rgb_input(&mut store, "x", "0", "0").unwrap_err();
        assert!(matches!(err, ColorError::InvalidChannel { channel: 'R', .. }));
        assert_eq!(picker.projection(), before);

        let p = picker.set_color_from_rgb_input(&mut store, " 0", "0 ", "255").unwrap();
        assert_eq!(p.hex, "#0000FF");
    }

    #[test]
    fn test_lenient_hex_input() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();

        assert_eq!(picker.set_color_from_hex_input(&mut store, " 00ff00 ").unwrap().hex, "#00FF00");
        assert!(picker.set_color_from_hex_input(&mut store, "0f0").is_err());
        assert_eq!(picker.projection().hex, "#00FF00");
    }

    #[test]
    fn test_restore_from_saved_design() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        store.set_design("#00FF00").unwrap();

        let mut picker = ColorPicker::new();
        picker.restore(&mut store).unwrap();
        assert_eq!(picker.projection().hex, "#00FF00");
        assert_eq!(picker.hsv().h, 120.0);
    }

    #[test]
    fn test_restore_auto_keeps_default_without_writing() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();

        picker.restore(&mut store).unwrap();
        assert_eq!(picker.projection().hex, "#2E6FB0");
        assert!(storage.raw(STATE_KEY).is_none());
    }

    #[test]
    fn test_restore_ignores_garbage_design() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        store.set_design("teal").unwrap();

        let mut picker = ColorPicker::new();
        picker.restore(&mut store).unwrap();
        assert_eq!(picker.projection().hex, "#2E6FB0");
        assert_eq!(design(&store), "teal");
    }

    #[test]
    fn test_drag_session() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();
        let bar = PickerRect::new(0.0, 0.0, 360.0, 12.0);
        let plane = PickerRect::new(0.0, 20.0, 100.0, 100.0);

        assert_eq!(picker.pointer_move(&mut store, Pointer::new(10.0, 0.0)).unwrap(), None);

        picker.pointer_down(&mut store, DragTarget::Hue, bar, Pointer::new(120.0, 5.0)).unwrap();
        assert_eq!(picker.hsv().h, 120.0);
        let moved = picker.pointer_move(&mut store, Pointer::new(360.0, 5.0)).unwrap().unwrap();
        assert_eq!(moved.hsv.h, 0.0);
        assert!(picker.pointer_up());
        assert!(!picker.pointer_up());

        // Moves after release are ignored
        assert_eq!(picker.pointer_move(&mut store, Pointer::new(90.0, 5.0)).unwrap(), None);
        assert_eq!(picker.hsv().h, 0.0);

        let p = picker
            .pointer_down(&mut store, DragTarget::SaturationValue, plane, Pointer::new(100.0, 20.0))
            .unwrap();
        assert_eq!((p.hsv.s, p.hsv.v), (1.0, 1.0));
        assert_eq!(p.hex, "#FF0000");
        assert_eq!(design(&store), "#FF0000");
        picker.pointer_up();
    }

    #[test]
    fn test_failed_save_still_updates_color() {
        let storage = MemoryStorage::with_quota(8);
        let mut store = StateStore::load(&storage);
        let mut picker = ColorPicker::new();

        let err = picker.set_color_from_hex(&mut store, "#0000FF").unwrap_err();
        assert!(matches!(err, ColorError::State(_)));
        assert_eq!(picker.projection().hex, "#0000FF");
        assert_eq!(design(&store), "#0000FF");
    }
}
