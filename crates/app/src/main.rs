use assistant::{BUILTIN_TEMPLATES, MODEL_CHOICES};
use eframe::egui;
use services::{FileStorage, StateStore};
use shared::settings::AppSettings;
use shared::state::{Role, Tab, Target, OPTION_CHOICES, PAGE_CHOICES, USAGE_CHOICES};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod modals;
mod session;
mod utils;
mod widgets;

use config::SettingsOrigin;
use modals::{ConfirmDialog, Modal, TemplateDialog};
use session::Session;
use widgets::{ColorFields, DragDropHandler, FilePickerWidget};

const ASSISTANT_PANEL_WIDTH: std::ops::RangeInclusive<f32> = 300.0..=800.0;

fn init_tracing(settings: &AppSettings) {
    // RUST_LOG wins over the settings file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let (settings, origin) = config::load_settings_or_default();
    init_tracing(&settings);
    match &origin {
        SettingsOrigin::Loaded => {}
        SettingsOrigin::Missing => info!("No settings file, using defaults"),
        SettingsOrigin::Invalid(reason) => {
            warn!(%reason, "Settings file unreadable, using defaults")
        }
    }

    let data_dir = config::resolve_data_dir(&settings, std::env::var_os(config::DATA_DIR_ENV));
    info!(data_dir = %data_dir.display(), "Starting Slide Assistant");

    let store = StateStore::load(FileStorage::new(data_dir));
    let session = Session::new(store, &settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Slide Assistant",
        options,
        Box::new(move |_cc| Box::new(SlideAssistantApp::new(session, settings))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the window: {e}"))
}

struct SlideAssistantApp {
    session: Session<FileStorage>,
    settings: AppSettings,
    chat_input: String,
    instruction: String,
    show_templates: bool,
    color_fields: ColorFields,
    template_dialog: TemplateDialog,
    confirm_dialog: ConfirmDialog,
    drop_handler: DragDropHandler,
    file_picker: FilePickerWidget,
}

impl SlideAssistantApp {
    fn new(session: Session<FileStorage>, settings: AppSettings) -> Self {
        let instruction = session.state().gen_form.instruction.clone();
        Self {
            session,
            settings,
            chat_input: String::new(),
            instruction,
            show_templates: false,
            color_fields: ColorFields::default(),
            template_dialog: TemplateDialog::new("template_dialog"),
            confirm_dialog: ConfirmDialog::new("confirm_generation", "Generate document")
                .with_confirm_label("Generate"),
            drop_handler: DragDropHandler::new("attachments"),
            file_picker: FilePickerWidget::new()
                .with_title("Attach reference files")
                .with_filter(widgets::file_picker::FileFilter::documents())
                .with_filter(widgets::file_picker::FileFilter::images()),
        }
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style.visuals = if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        style.visuals.window_rounding = egui::Rounding::same(10.0);
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        ctx.set_style(style);
    }

    fn attach_paths(&mut self, paths: Vec<std::path::PathBuf>) {
        let mut files = Vec::new();
        for path in paths {
            match utils::file_meta_from_path(&path) {
                Ok(meta) => files.push(meta),
                Err(e) => warn!(path = %path.display(), error = %e, "Cannot attach file"),
            }
        }
        if !files.is_empty() {
            self.session.add_files(files);
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Slide Assistant");
            ui.add_space(16.0);

            let current = self.session.state().current_tab;
            for tab in Tab::all() {
                if ui
                    .selectable_label(current == *tab, tab.display_name())
                    .clicked()
                    && current != *tab
                {
                    self.session.set_tab(*tab);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.settings.dark_mode { "☀ Light" } else { "🌙 Dark" };
                if ui.button(label).clicked() {
                    self.settings.dark_mode = !self.settings.dark_mode;
                    if let Err(e) = config::save_settings(&self.settings) {
                        warn!(error = %e, "Failed to save settings");
                    }
                }
                self.render_model_selector(ui, current);
            });
        });
    }

    fn render_model_selector(&mut self, ui: &mut egui::Ui, tab: Tab) {
        let selected = self.session.model(tab).to_string();
        egui::ComboBox::from_id_source(("model", tab.as_str()))
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for model in MODEL_CHOICES {
                    if ui.selectable_label(selected == *model, *model).clicked() {
                        self.session.set_model(tab, model);
                    }
                }
            });
    }

    fn render_slide(&self, ui: &mut egui::Ui) {
        let slide = self.session.slide();
        egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::same(32.0))
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());
                ui.label(egui::RichText::new(&slide.title).size(30.0).strong());
                ui.separator();
                ui.label(egui::RichText::new(&slide.body).size(18.0));
            });
    }

    fn render_chat(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let target = self.session.state().target;
            ui.menu_button(format!("🎯 {}", target.display_name()), |ui| {
                for option in Target::all() {
                    if ui
                        .selectable_label(target == *option, option.display_name())
                        .clicked()
                    {
                        self.session.set_target(*option);
                        ui.close_menu();
                    }
                }
            });
            if ui
                .selectable_label(self.show_templates, "⚡ Templates")
                .clicked()
            {
                self.show_templates = !self.show_templates;
            }
        });

        if self.show_templates {
            self.render_templates(ui);
        }
        ui.separator();

        let input_height = 110.0;
        let mut rerun = false;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - input_height).max(80.0))
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                let history = &self.session.state().chat_history;
                if history.is_empty() {
                    ui.weak("Ask the assistant to improve the current slide.");
                }
                for message in history {
                    let fill = match message.role {
                        Role::User => ui.visuals().faint_bg_color,
                        Role::Ai => ui.visuals().extreme_bg_color,
                    };
                    egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        if message.role == Role::Ai {
                            ui.label(
                                egui::RichText::new(format!("Target: {}", message.target.display_name()))
                                    .small()
                                    .weak(),
                            );
                        }
                        ui.label(&message.content);
                        if message.role == Role::Ai {
                            ui.horizontal(|ui| {
                                if ui.small_button("Copy").clicked() {
                                    ui.output_mut(|o| o.copied_text = message.content.clone());
                                }
                                if ui.small_button("Re-run").clicked() {
                                    rerun = true;
                                }
                                ui.add_enabled(false, egui::Button::new("Apply").small())
                                    .on_disabled_hover_text("Coming soon");
                            });
                        }
                    });
                }
                if self.session.is_thinking() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.weak("Thinking...");
                    });
                }
            });
        if rerun {
            self.session.rerun();
        }

        ui.separator();
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.chat_input)
                .hint_text("Describe what to change (Ctrl+Enter to send)")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        let shortcut = response.has_focus()
            && ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
        let can_send = !self.chat_input.trim().is_empty();
        let clicked = ui
            .add_enabled(can_send, egui::Button::new("Send ➤"))
            .clicked();
        if (clicked || shortcut) && self.session.send_message(&self.chat_input) {
            self.chat_input.clear();
        }
    }

    fn render_templates(&mut self, ui: &mut egui::Ui) {
        let items = self.session.state().template_display_order(&BUILTIN_TEMPLATES);
        let mut delete = None;
        egui::ScrollArea::vertical()
            .id_source("templates")
            .max_height(200.0)
            .show(ui, |ui| {
                for item in &items {
                    ui.horizontal(|ui| {
                        let text = format!("⚡ {}\n{}", item.title, item.desc);
                        if ui.selectable_label(false, text).clicked() {
                            self.chat_input = item.body.clone();
                            self.show_templates = false;
                        }
                        if let Some(id) = item.id {
                            if ui.small_button("×").on_hover_text("Delete").clicked() {
                                delete = Some(id);
                            }
                        }
                    });
                }
            });
        if let Some(id) = delete {
            self.session.delete_template(id);
        }
        if ui.button("+ Add template").clicked() {
            self.template_dialog.open();
        }
    }

    fn render_generation_form(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.strong("Instruction");
                let response = ui.add(
                    egui::TextEdit::multiline(&mut self.instruction)
                        .hint_text("What should the document cover?")
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.session.set_instruction(self.instruction.clone());
                }

                ui.strong("Usage");
                let usage = self.session.state().gen_form.usage.clone();
                ui.horizontal_wrapped(|ui| {
                    for (value, label) in USAGE_CHOICES {
                        let selected = usage.as_deref() == Some(*value);
                        if ui.selectable_label(selected, *label).clicked() && !selected {
                            self.session.set_usage(Some(value.to_string()));
                        }
                    }
                });

                ui.horizontal(|ui| {
                    ui.strong("Design color");
                    let design = self.session.state().gen_form.design.clone();
                    ui.weak(design.as_str());
                    if self.session.state().gen_form.design_hex().is_some()
                        && ui.small_button("Auto").clicked()
                    {
                        self.session.reset_design();
                    }
                });
                widgets::color_picker(ui, &mut self.session, &mut self.color_fields);

                ui.horizontal(|ui| {
                    ui.strong("Pages");
                    let pages = self.session.state().gen_form.pages.clone();
                    let selected = PAGE_CHOICES
                        .iter()
                        .find(|(value, _)| *value == pages)
                        .map(|(_, label)| *label)
                        .unwrap_or(pages.as_str())
                        .to_string();
                    egui::ComboBox::from_id_source("pages")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for (value, label) in PAGE_CHOICES {
                                if ui.selectable_label(pages == *value, *label).clicked() {
                                    self.session.set_pages(*value);
                                }
                            }
                        });
                });

                ui.strong("Options");
                for (value, label) in OPTION_CHOICES {
                    let mut enabled = self.session.state().gen_form.options.contains(*value);
                    if ui.checkbox(&mut enabled, *label).changed() {
                        self.session.set_option(value, enabled);
                    }
                }

                ui.strong("Reference files");
                if self
                    .drop_handler
                    .show_drop_zone(ui, "📎 Drop files or click to browse")
                    .clicked()
                {
                    let paths = self.file_picker.pick_files();
                    self.attach_paths(paths);
                }
                let mut remove = None;
                for file in &self.session.state().gen_form.files {
                    ui.horizontal(|ui| {
                        ui.label(utils::file_icon(file));
                        ui.label(&file.name);
                        ui.weak(utils::format_size(file.size));
                        if ui.small_button("×").on_hover_text("Remove").clicked() {
                            remove = Some(file.id);
                        }
                    });
                }
                if let Some(id) = remove {
                    self.session.remove_file(id);
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let label = if self.session.is_generating() {
                        "Generating..."
                    } else {
                        "Generate document"
                    };
                    if ui
                        .add_enabled(self.session.can_generate(), egui::Button::new(label))
                        .clicked()
                    {
                        self.confirm_dialog
                            .open_with_message("Generate a document from this form?");
                    }
                    if self.session.is_generating() {
                        ui.spinner();
                    }
                });
            });
    }

    fn handle_modals(&mut self, ctx: &egui::Context) {
        if self.template_dialog.update(ctx) {
            if let Some(draft) = self.template_dialog.take_result().take_value() {
                self.session
                    .add_template(&draft.title, &draft.body, &draft.desc);
            }
        }
        if self.confirm_dialog.update(ctx)
            && self.confirm_dialog.take_result().take_value().is_some()
        {
            self.session.start_generation();
        }
    }
}

impl eframe::App for SlideAssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();
        self.session.prune_toasts(Instant::now());
        if self.session.has_pending_work() || !self.session.toasts().is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.apply_theme(ctx);

        self.drop_handler.update(ctx);
        let dropped = self.drop_handler.take_dropped_files();
        if !dropped.is_empty() {
            if self.session.state().current_tab == Tab::DocGeneration {
                self.attach_paths(dropped);
            } else {
                info!(count = dropped.len(), "Ignoring files dropped outside the generation form");
            }
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(6.0);
        });

        egui::SidePanel::right("assistant")
            .resizable(true)
            .default_width(380.0)
            .width_range(ASSISTANT_PANEL_WIDTH)
            .show(ctx, |ui| {
                let tab = self.session.state().current_tab;
                match tab {
                    Tab::SlideSupport => self.render_chat(ui),
                    Tab::DocGeneration => self.render_generation_form(ui),
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| self.render_slide(ui));

        self.handle_modals(ctx);
        widgets::show_toasts(ctx, self.session.toasts());
        let modal_open = self.template_dialog.is_open() || self.confirm_dialog.is_open();
        if self.session.state().current_tab == Tab::DocGeneration && !modal_open {
            self.drop_handler.show_drag_overlay(ctx);
        }
    }
}
