//! Design color picker: saturation/value plane, hue bar, RGB and HEX fields.
//!
//! The widget only paints and forwards pointer positions; the color math and
//! persistence live in the session.

use crate::session::Session;
use egui::epaint::Mesh;
use egui::{Color32, Pos2, Rect, Sense, Shape, Stroke, TextEdit, Ui, Vec2};
use services::{DragTarget, PickerRect, Pointer, StorageBackend};
use shared::color::{hsv_to_rgb, ColorProjection, Rgb};

const PLANE_SIZE: Vec2 = Vec2::new(240.0, 150.0);
const HUE_BAR_HEIGHT: f32 = 14.0;
const PLANE_GRID: u32 = 12;

fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

fn picker_rect(rect: Rect) -> PickerRect {
    PickerRect::new(
        rect.left() as f64,
        rect.top() as f64,
        rect.width() as f64,
        rect.height() as f64,
    )
}

fn pointer(pos: Pos2) -> Pointer {
    Pointer::new(pos.x as f64, pos.y as f64)
}

/// Text buffers behind the RGB and HEX inputs
#[derive(Debug, Default)]
pub struct ColorFields {
    r: String,
    g: String,
    b: String,
    hex: String,
    shown_hex: Option<String>,
    editing: bool,
}

impl ColorFields {
    fn sync(&mut self, projection: &ColorProjection) {
        self.r = projection.rgb.r.to_string();
        self.g = projection.rgb.g.to_string();
        self.b = projection.rgb.b.to_string();
        self.hex = projection.hex.clone();
        self.shown_hex = Some(projection.hex.clone());
    }
}

pub fn color_picker<B: StorageBackend>(
    ui: &mut Ui,
    session: &mut Session<B>,
    fields: &mut ColorFields,
) {
    let projection = session.color_projection();
    let hsv = projection.hsv;

    let (plane_rect, plane_response) = ui.allocate_exact_size(PLANE_SIZE, Sense::click_and_drag());
    paint_sv_plane(ui, plane_rect, hsv.h);
    let cursor = Pos2::new(
        plane_rect.left() + hsv.s as f32 * plane_rect.width(),
        plane_rect.top() + (1.0 - hsv.v as f32) * plane_rect.height(),
    );
    ui.painter().circle_stroke(cursor, 6.0, Stroke::new(2.0, Color32::WHITE));
    ui.painter().circle_stroke(cursor, 7.0, Stroke::new(1.0, Color32::BLACK));

    ui.add_space(6.0);
    let (bar_rect, bar_response) = ui.allocate_exact_size(
        Vec2::new(PLANE_SIZE.x, HUE_BAR_HEIGHT),
        Sense::click_and_drag(),
    );
    paint_hue_bar(ui, bar_rect);
    let marker_x = bar_rect.left() + (hsv.h / 360.0) as f32 * bar_rect.width();
    ui.painter().rect_stroke(
        Rect::from_center_size(
            Pos2::new(marker_x, bar_rect.center().y),
            Vec2::new(4.0, HUE_BAR_HEIGHT + 4.0),
        ),
        1.0,
        Stroke::new(2.0, Color32::WHITE),
    );

    let mut began = false;
    for (response, rect, target) in [
        (&plane_response, plane_rect, DragTarget::SaturationValue),
        (&bar_response, bar_rect, DragTarget::Hue),
    ] {
        if response.is_pointer_button_down_on() && session.drag_target() != Some(target) {
            if let Some(pos) = response.interact_pointer_pos() {
                session.pointer_down(target, picker_rect(rect), pointer(pos));
                began = true;
            }
        }
    }

    // Release is read from global input so a drag ending outside the control still ends
    if session.drag_target().is_some() && !began {
        let (down, moved, pos) = ui.input(|i| {
            (
                i.pointer.primary_down(),
                i.pointer.delta() != Vec2::ZERO,
                i.pointer.latest_pos(),
            )
        });
        match pos {
            Some(pos) if down && moved => session.pointer_move(pointer(pos)),
            _ if !down => session.pointer_up(),
            _ => {}
        }
    }

    let projection = session.color_projection();
    if !fields.editing && fields.shown_hex.as_deref() != Some(projection.hex.as_str()) {
        fields.sync(&projection);
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(22.0), Sense::hover());
        ui.painter().rect_filled(swatch, 4.0, color32(projection.rgb));

        let mut rgb_committed = false;
        let mut focused = false;
        for (label, buffer) in [("R", &mut fields.r), ("G", &mut fields.g), ("B", &mut fields.b)] {
            ui.label(label);
            let response = ui.add(TextEdit::singleline(buffer).desired_width(34.0));
            rgb_committed |= response.lost_focus();
            focused |= response.has_focus();
        }

        ui.label("HEX");
        let hex_response = ui.add(TextEdit::singleline(&mut fields.hex).desired_width(72.0));
        focused |= hex_response.has_focus();
        fields.editing = focused;

        // Rejected input reverts to the current color
        if rgb_committed {
            session.set_color_from_rgb_input(&fields.r, &fields.g, &fields.b);
            fields.sync(&session.color_projection());
        }
        if hex_response.lost_focus() {
            session.set_color_from_hex_input(&fields.hex);
            fields.sync(&session.color_projection());
        }
    });
}

fn paint_sv_plane(ui: &Ui, rect: Rect, hue: f64) {
    let mut mesh = Mesh::default();
    for row in 0..=PLANE_GRID {
        for col in 0..=PLANE_GRID {
            let fx = col as f32 / PLANE_GRID as f32;
            let fy = row as f32 / PLANE_GRID as f32;
            let color = hsv_to_rgb(hue, f64::from(fx), 1.0 - f64::from(fy));
            mesh.colored_vertex(
                Pos2::new(
                    rect.left() + fx * rect.width(),
                    rect.top() + fy * rect.height(),
                ),
                color32(color),
            );
        }
    }

    let stride = PLANE_GRID + 1;
    for row in 0..PLANE_GRID {
        for col in 0..PLANE_GRID {
            let i = row * stride + col;
            mesh.add_triangle(i, i + 1, i + stride);
            mesh.add_triangle(i + 1, i + stride + 1, i + stride);
        }
    }
    ui.painter().add(Shape::mesh(mesh));
}

fn paint_hue_bar(ui: &Ui, rect: Rect) {
    const STOPS: u32 = 6;

    let mut mesh = Mesh::default();
    for stop in 0..=STOPS {
        let fx = stop as f32 / STOPS as f32;
        let color = color32(hsv_to_rgb(f64::from(fx) * 360.0, 1.0, 1.0));
        let x = rect.left() + fx * rect.width();
        mesh.colored_vertex(Pos2::new(x, rect.top()), color);
        mesh.colored_vertex(Pos2::new(x, rect.bottom()), color);
    }
    for stop in 0..STOPS {
        let i = stop * 2;
        mesh.add_triangle(i, i + 1, i + 2);
        mesh.add_triangle(i + 1, i + 3, i + 2);
    }
    ui.painter().add(Shape::mesh(mesh));
}
