//! Transient notifications stacked at the bottom of the window.

use crate::session::{Toast, ToastLevel};
use egui::{Align2, Color32, Context, Id, Order, RichText, Vec2};

pub fn show_toasts(ctx: &Context, toasts: &[Toast]) {
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(Id::new("toasts"))
        .order(Order::Foreground)
        .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -24.0))
        .show(ctx, |ui| {
            for toast in toasts {
                let (fill, text) = match toast.level {
                    ToastLevel::Info => (Color32::from_rgb(40, 40, 48), Color32::WHITE),
                    ToastLevel::Warning => (
                        Color32::from_rgb(120, 70, 10),
                        Color32::from_rgb(255, 240, 220),
                    ),
                };
                egui::Frame::popup(ui.style())
                    .fill(fill)
                    .show(ui, |ui| {
                        ui.label(RichText::new(&toast.message).color(text));
                    });
                ui.add_space(4.0);
            }
        });
}
