//! Form for adding a custom chat template.

use super::{backdrop, Modal, ModalResult};
use egui::{Align2, Context, Id, Key, TextEdit, Vec2};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub title: String,
    pub desc: String,
    pub body: String,
}

impl TemplateDraft {
    /// Title and body are required
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }
}

pub struct TemplateDialog {
    is_open: bool,
    draft: TemplateDraft,
    error: Option<String>,
    result: ModalResult<TemplateDraft>,
    id: Id,
}

impl TemplateDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            is_open: false,
            draft: TemplateDraft::default(),
            error: None,
            result: ModalResult::Pending,
            id: Id::new(id),
        }
    }

    pub fn take_result(&mut self) -> ModalResult<TemplateDraft> {
        std::mem::replace(&mut self.result, ModalResult::Pending)
    }

    fn submit(&mut self) -> bool {
        if !self.draft.is_complete() {
            self.error = Some("Title and body are required".to_string());
            return false;
        }
        self.result = ModalResult::Confirmed(std::mem::take(&mut self.draft));
        true
    }
}

impl Modal for TemplateDialog {
    fn update(&mut self, ctx: &Context) -> bool {
        if !self.is_open {
            return false;
        }

        let mut should_close = false;
        backdrop(ctx, self.id);

        egui::Window::new("New template")
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(380.0);

                ui.label("Title");
                ui.add(TextEdit::singleline(&mut self.draft.title).desired_width(f32::INFINITY));
                ui.label("Description (optional)");
                ui.add(TextEdit::singleline(&mut self.draft.desc).desired_width(f32::INFINITY));
                ui.label("Instruction");
                ui.add(
                    TextEdit::multiline(&mut self.draft.body)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::RED, error);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.result = ModalResult::Cancelled;
                        should_close = true;
                    }
                    ui.add_space(8.0);
                    if ui.button("Save").clicked() && self.submit() {
                        should_close = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.result = ModalResult::Cancelled;
            should_close = true;
        }

        if should_close {
            self.is_open = false;
        }
        should_close
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn open(&mut self) {
        self.is_open = true;
        self.draft = TemplateDraft::default();
        self.error = None;
        self.result = ModalResult::Pending;
    }

    fn close(&mut self) {
        self.is_open = false;
        self.result = ModalResult::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_draft_is_not_submitted() {
        let mut dialog = TemplateDialog::new("test");
        dialog.open();
        dialog.draft.title = "Tone".into();
        dialog.draft.body = "   ".into();

        assert!(!dialog.submit());
        assert!(dialog.error.is_some());
        assert!(dialog.take_result().is_pending());
    }

    #[test]
    fn test_complete_draft_is_confirmed() {
        let mut dialog = TemplateDialog::new("test");
        dialog.open();
        dialog.draft.title = "Tone".into();
        dialog.draft.body = "Make it friendlier".into();

        assert!(dialog.submit());
        let draft = dialog.take_result().take_value().unwrap();
        assert_eq!(draft.title, "Tone");
        assert!(dialog.draft.title.is_empty());
    }
}
