//! The session controller.
//!
//! `Session` owns everything the window shows: the persisted state store,
//! the picker color, the slide preview, pending simulated requests and toast
//! notifications. Views call its methods and read its accessors; nothing is
//! global. Store failures are turned into toasts here so views never have
//! to handle them.

use assistant::{
    generated_document, rerun_reply, respond, AssistantReply, Delivery, LatencyDispatcher,
    RequestKind, RequestTracker, SlidePreview, MODEL_CHOICES,
};
use services::{ColorPicker, DragTarget, PickerRect, Pointer, StateStore, StorageBackend};
use shared::color::ColorProjection;
use shared::settings::AppSettings;
use shared::state::{AppState, FileMeta, Role, Tab, Target, AUTO};
use shared::{ColorError, StateError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const GENERATION_DONE: &str = "Document generation completed";
const SAVE_FAILED: &str = "Could not save your changes. They are kept until the app closes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

/// Work finished by a simulated request
#[derive(Debug)]
pub enum Outcome {
    Chat { instruction: String },
    Rerun { instruction: Option<String> },
    Generation,
}

#[derive(Debug, Clone, Copy)]
pub struct Latency {
    pub chat: Duration,
    pub rerun: Duration,
    pub generation: Duration,
}

impl Latency {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            chat: Duration::from_millis(settings.chat_latency_ms),
            rerun: Duration::from_millis(settings.rerun_latency_ms),
            generation: Duration::from_millis(settings.generation_latency_ms),
        }
    }
}

pub struct Session<B: StorageBackend> {
    store: StateStore<B>,
    picker: ColorPicker,
    slide: SlidePreview,
    requests: RequestTracker,
    dispatcher: LatencyDispatcher<Outcome>,
    latency: Latency,
    toast_duration: Duration,
    toasts: Vec<Toast>,
    support_model: String,
    generation_model: String,
}

impl<B: StorageBackend> Session<B> {
    pub fn new(store: StateStore<B>, settings: &AppSettings) -> Self {
        let default_model = MODEL_CHOICES.first().copied().unwrap_or_default().to_string();
        let mut session = Self {
            store,
            picker: ColorPicker::new(),
            slide: SlidePreview::default(),
            requests: RequestTracker::new(),
            dispatcher: LatencyDispatcher::new(),
            latency: Latency::from_settings(settings),
            toast_duration: Duration::from_millis(settings.toast_duration_ms),
            toasts: Vec::new(),
            support_model: default_model.clone(),
            generation_model: default_model,
        };

        let restored = session.picker.restore(&mut session.store);
        if let Err(e) = restored {
            session.report_color(Err(e));
        }
        session
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn slide(&self) -> &SlidePreview {
        &self.slide
    }

    pub fn color_projection(&self) -> ColorProjection {
        self.picker.projection()
    }

    // --- Notifications ---

    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toasts.push(Toast {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Drop toasts that have been visible for the configured duration
    pub fn prune_toasts(&mut self, now: Instant) {
        let duration = self.toast_duration;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < duration);
    }

    fn report<T>(&mut self, result: Result<T, StateError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) if e.is_persist_failure() => {
                warn!(error = %e, "Change applied in memory only");
                self.notify(ToastLevel::Warning, SAVE_FAILED);
                None
            }
            Err(e) => {
                debug!(error = %e, "Edit rejected");
                self.notify(ToastLevel::Warning, e.to_string());
                None
            }
        }
    }

    /// `None` when the edit was rejected and the input should be reverted
    fn report_color(
        &mut self,
        result: Result<ColorProjection, ColorError>,
    ) -> Option<ColorProjection> {
        match result {
            Ok(projection) => Some(projection),
            Err(ColorError::State(e)) => {
                self.report::<()>(Err(e));
                Some(self.picker.projection())
            }
            Err(e) => {
                debug!(error = %e, "Color edit rejected");
                None
            }
        }
    }

    // --- State mutators ---

    pub fn set_tab(&mut self, tab: Tab) {
        let result = self.store.set_tab(tab);
        self.report(result);
    }

    pub fn set_target(&mut self, target: Target) {
        let result = self.store.set_target(target);
        self.report(result);
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        let result = self.store.set_instruction(instruction);
        self.report(result);
    }

    pub fn set_usage(&mut self, usage: Option<String>) {
        let result = self.store.set_usage(usage);
        self.report(result);
    }

    pub fn set_pages(&mut self, pages: impl Into<String>) {
        let result = self.store.set_pages(pages);
        self.report(result);
    }

    pub fn set_option(&mut self, option: &str, enabled: bool) {
        let result = self.store.set_option(option, enabled);
        self.report(result);
    }

    /// Go back to letting the generator pick the design color
    pub fn reset_design(&mut self) {
        let result = self.store.set_design(AUTO);
        self.report(result);
    }

    pub fn add_files(&mut self, files: Vec<FileMeta>) -> usize {
        let offered = files.len();
        let result = self.store.add_files(files);
        let added = self.report(result).unwrap_or(0);
        if added < offered {
            debug!(offered, added, "Skipped already attached files");
        }
        added
    }

    pub fn remove_file(&mut self, id: Uuid) {
        let result = self.store.remove_file(id);
        self.report(result);
    }

    /// Returns true when the template was added
    pub fn add_template(&mut self, title: &str, body: &str, desc: &str) -> bool {
        let result = self.store.add_template(title, body, desc);
        self.report(result).is_some()
    }

    pub fn delete_template(&mut self, id: Uuid) {
        let result = self.store.delete_template(id);
        self.report(result);
    }

    // --- Color picker ---

    pub fn set_color_from_hex_input(&mut self, input: &str) -> Option<ColorProjection> {
        let result = self.picker.set_color_from_hex_input(&mut self.store, input);
        self.report_color(result)
    }

    pub fn set_color_from_rgb_input(
        &mut self,
        r: &str,
        g: &str,
        b: &str,
    ) -> Option<ColorProjection> {
        let result = self.picker.set_color_from_rgb_input(&mut self.store, r, g, b);
        self.report_color(result)
    }

    pub fn pointer_down(&mut self, target: DragTarget, rect: PickerRect, pointer: Pointer) {
        let result = self.picker.pointer_down(&mut self.store, target, rect, pointer);
        self.report_color(result);
    }

    pub fn pointer_move(&mut self, pointer: Pointer) {
        if let Some(result) = self.picker.pointer_move(&mut self.store, pointer).transpose() {
            self.report_color(result);
        }
    }

    pub fn pointer_up(&mut self) {
        self.picker.pointer_up();
    }

    pub fn drag_target(&self) -> Option<DragTarget> {
        self.picker.drag_target()
    }

    // --- Models ---

    pub fn model(&self, tab: Tab) -> &str {
        match tab {
            Tab::SlideSupport => &self.support_model,
            Tab::DocGeneration => &self.generation_model,
        }
    }

    pub fn set_model(&mut self, tab: Tab, model: &str) {
        info!(tab = tab.as_str(), model, "Model selected");
        let slot = match tab {
            Tab::SlideSupport => &mut self.support_model,
            Tab::DocGeneration => &mut self.generation_model,
        };
        *slot = model.to_string();
    }

    // --- Assistant ---

    /// Send a chat instruction. Blank input is ignored and returns false.
    pub fn send_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let result = self.store.append_message(Role::User, text);
        self.report(result);

        let ticket = self.requests.issue(RequestKind::Chat);
        self.dispatcher.schedule(
            ticket,
            self.latency.chat,
            Outcome::Chat {
                instruction: text.to_string(),
            },
        );
        true
    }

    /// Replay the most recent user instruction
    pub fn rerun(&mut self) {
        let instruction = self
            .store
            .state()
            .last_user_message()
            .map(|m| m.content.clone());
        let ticket = self.requests.issue(RequestKind::Rerun);
        self.dispatcher
            .schedule(ticket, self.latency.rerun, Outcome::Rerun { instruction });
    }

    pub fn is_thinking(&self) -> bool {
        self.requests.is_pending(RequestKind::Chat) || self.requests.is_pending(RequestKind::Rerun)
    }

    pub fn is_generating(&self) -> bool {
        self.requests.is_pending(RequestKind::Generation)
    }

    pub fn has_pending_work(&self) -> bool {
        self.requests.any_pending()
    }

    pub fn can_generate(&self) -> bool {
        self.store.state().gen_form.can_generate() && !self.is_generating()
    }

    /// Start document generation. Returns false if the form is incomplete
    /// or a generation is already running.
    pub fn start_generation(&mut self) -> bool {
        if !self.can_generate() {
            debug!(generating = self.is_generating(), "Generate request ignored");
            return false;
        }
        let ticket = self.requests.issue(RequestKind::Generation);
        info!(
            usage = ?self.store.state().gen_form.usage,
            model = %self.generation_model,
            "Document generation started"
        );
        self.dispatcher
            .schedule(ticket, self.latency.generation, Outcome::Generation);
        true
    }

    /// Apply finished requests. Call once per frame.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Some(delivery) = self.dispatcher.try_recv() {
            applied |= self.deliver(delivery);
        }
        applied
    }

    fn deliver(&mut self, delivery: Delivery<Outcome>) -> bool {
        if !self.requests.settle(delivery.ticket) {
            return false;
        }
        match delivery.payload {
            Outcome::Chat { instruction } => {
                let reply = respond(&instruction, &self.slide.title);
                self.apply_reply(reply);
            }
            Outcome::Rerun { instruction } => {
                let reply = rerun_reply(instruction.as_deref(), &self.slide.title);
                self.apply_reply(reply);
            }
            Outcome::Generation => {
                self.slide.apply(&generated_document());
                info!("Document generation completed");
                self.notify(ToastLevel::Info, GENERATION_DONE);
            }
        }
        true
    }

    fn apply_reply(&mut self, reply: AssistantReply) {
        self.slide.apply(&reply.slide);
        let result = self.store.append_message(Role::Ai, reply.message);
        self.report(result);
    }
}
