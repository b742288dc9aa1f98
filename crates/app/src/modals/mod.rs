//! Blocking dialogs drawn over the main window: the generation confirmation
//! and the custom template form.

pub mod confirm_dialog;
pub mod template_dialog;

pub use confirm_dialog::ConfirmDialog;
pub use template_dialog::TemplateDialog;

use egui::{Align2, Area, Context, Id, Vec2};

/// A dialog the app drives once per frame while it is open.
///
/// `update` returns true on the frame the user answers; the answer is then
/// read with the dialog's own `take_result`.
pub trait Modal {
    fn update(&mut self, ctx: &Context) -> bool;

    fn is_open(&self) -> bool;

    /// Show the dialog with a cleared answer
    fn open(&mut self);

    /// Dismiss without an answer, as if cancelled
    fn close(&mut self);
}

/// Answer held by a dialog until the app takes it.
///
/// `ConfirmDialog` confirms with `()`; `TemplateDialog` confirms with the
/// drafted template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResult<T> {
    Pending,
    Confirmed(T),
    Cancelled,
}

impl<T> ModalResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ModalResult::Pending)
    }

    /// The confirmed payload; `None` for pending or cancelled
    pub fn take_value(self) -> Option<T> {
        match self {
            ModalResult::Confirmed(v) => Some(v),
            _ => None,
        }
    }
}

/// Dim the main window and swallow clicks so only the dialog is live
fn backdrop(ctx: &Context, id: Id) {
    Area::new(id.with("overlay"))
        .anchor(Align2::LEFT_TOP, Vec2::ZERO)
        .show(ctx, |ui| {
            let screen_rect = ctx.screen_rect();
            ui.allocate_response(screen_rect.size(), egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(140));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_confirmed_answers_carry_a_value() {
        assert_eq!(ModalResult::Confirmed("draft").take_value(), Some("draft"));
        assert_eq!(ModalResult::<&str>::Cancelled.take_value(), None);
        assert!(ModalResult::<()>::Pending.is_pending());
    }
}
