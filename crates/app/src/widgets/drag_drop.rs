//! File drops onto the window, feeding the generation form's attachment list.

use egui::{Align2, Color32, Context, FontId, Id, Order, Rect, Response, Sense, Stroke, Ui, Vec2};
use std::path::PathBuf;

const ZONE_HEIGHT: f32 = 56.0;

pub struct DragDropHandler {
    pending: Vec<PathBuf>,
    /// Number of files currently dragged over the window
    hovered: usize,
    id: Id,
}

impl DragDropHandler {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            pending: Vec::new(),
            hovered: 0,
            id: Id::new(id),
        }
    }

    /// Read hover and drop events for this frame
    pub fn update(&mut self, ctx: &Context) {
        let (hovered, dropped) = ctx.input(|i| {
            let dropped: Vec<PathBuf> = i
                .raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect();
            (i.raw.hovered_files.len(), dropped)
        });
        self.hovered = hovered;
        self.pending.extend(dropped);
    }

    pub fn take_dropped_files(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_hovering(&self) -> bool {
        self.hovered > 0
    }

    fn hover_text(&self) -> String {
        match self.hovered {
            1 => "📥 Drop 1 file to attach".to_string(),
            n => format!("📥 Drop {n} files to attach"),
        }
    }

    /// Clickable attachment area. The caller opens a file dialog on click.
    pub fn show_drop_zone(&mut self, ui: &mut Ui, label: &str) -> Response {
        let size = Vec2::new(ui.available_width(), ZONE_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        let highlighted = self.is_hovering() || response.hovered();
        let widget = if highlighted {
            ui.visuals().widgets.hovered
        } else {
            ui.visuals().widgets.inactive
        };
        let stroke = if self.is_hovering() {
            Stroke::new(2.0, ui.visuals().selection.bg_fill)
        } else {
            widget.bg_stroke
        };
        let text = if self.is_hovering() {
            self.hover_text()
        } else {
            label.to_string()
        };
        paint_panel(ui, rect, widget.bg_fill, stroke, &text, 14.0);

        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }

    pub fn show_drag_overlay(&self, ctx: &Context) {
        if !self.is_hovering() {
            return;
        }

        egui::Area::new(self.id.with("overlay"))
            .order(Order::Foreground)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                let screen = ctx.screen_rect();
                ui.painter()
                    .rect_filled(screen, 0.0, Color32::from_black_alpha(100));
                let card = Rect::from_center_size(screen.center(), Vec2::new(320.0, 120.0));
                paint_panel(
                    ui,
                    card,
                    ui.visuals().extreme_bg_color,
                    Stroke::new(3.0, ui.visuals().selection.bg_fill),
                    &self.hover_text(),
                    18.0,
                );
            });
    }
}

fn paint_panel(ui: &Ui, rect: Rect, fill: Color32, stroke: Stroke, text: &str, size: f32) {
    let painter = ui.painter();
    painter.rect(rect, 6.0, fill, stroke);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(size),
        ui.visuals().strong_text_color(),
    );
}
