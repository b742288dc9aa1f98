//! Write-through store for the session state record.
//!
//! Every mutator applies its change in memory first and then saves the whole
//! record synchronously. A failed save is returned as `StateError::Persist`
//! but never rolls back the in-memory change.

use crate::reconcile::reconcile;
use crate::storage::StorageBackend;
use shared::state::{AppState, FileMeta, Message, Role, Tab, Target, Template};
use shared::StateError;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Key the state record is stored under
pub const STATE_KEY: &str = "ai_slide_assistant_state_v1";

pub struct StateStore<B: StorageBackend> {
    backend: B,
    key: String,
    state: AppState,
}

impl<B: StorageBackend> StateStore<B> {
    /// Load the record under `STATE_KEY`, falling back to defaults
    pub fn load(backend: B) -> Self {
        Self::load_with_key(backend, STATE_KEY)
    }

    pub fn load_with_key(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = match backend.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    info!(key = %key, "Restored saved state");
                    reconcile(value)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Saved state is corrupt; starting fresh");
                    AppState::default()
                }
            },
            Ok(None) => {
                info!(key = %key, "No saved state; starting fresh");
                AppState::default()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read saved state; starting fresh");
                AppState::default()
            }
        };

        Self {
            backend,
            key,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serialize the whole record and write it under the store key
    pub fn save(&self) -> Result<(), StateError> {
        let json = serde_json::to_string(&self.state)?;
        self.backend.set(&self.key, &json).map_err(|e| {
            warn!(key = %self.key, error = %e, "Failed to save state");
            StateError::from(e)
        })
    }

    pub fn set_tab(&mut self, tab: Tab) -> Result<(), StateError> {
        self.state.current_tab = tab;
        self.save()
    }

    pub fn set_target(&mut self, target: Target) -> Result<(), StateError> {
        self.state.target = target;
        self.save()
    }

    /// Append a message stamped with the scope that is active right now
    pub fn append_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
    ) -> Result<(), StateError> {
        let message = Message::new(role, content, self.state.target);
        self.state.chat_history.push(message);
        self.save()
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) -> Result<(), StateError> {
        self.state.gen_form.instruction = instruction.into();
        self.save()
    }

    pub fn set_usage(&mut self, usage: Option<String>) -> Result<(), StateError> {
        self.state.gen_form.usage = usage;
        self.save()
    }

    /// Store the design color (`#RRGGBB`) or `"auto"`
    pub fn set_design(&mut self, design: impl Into<String>) -> Result<(), StateError> {
        self.state.gen_form.design = design.into();
        self.save()
    }

    pub fn set_pages(&mut self, pages: impl Into<String>) -> Result<(), StateError> {
        self.state.gen_form.pages = pages.into();
        self.save()
    }

    pub fn set_options(&mut self, options: BTreeSet<String>) -> Result<(), StateError> {
        self.state.gen_form.options = options;
        self.save()
    }

    /// Turn a single option flag on or off
    pub fn set_option(&mut self, option: &str, enabled: bool) -> Result<(), StateError> {
        let mut options = self.state.gen_form.options.clone();
        if enabled {
            options.insert(option.to_string());
        } else {
            options.remove(option);
        }
        self.set_options(options)
    }

    /// Add files not already attached (same name and size). Returns how many were added.
    pub fn add_files(
        &mut self,
        files: impl IntoIterator<Item = FileMeta>,
    ) -> Result<usize, StateError> {
        let attached = &mut self.state.gen_form.files;
        let mut added = 0;
        for file in files {
            if attached.iter().any(|f| f.same_file(&file)) {
                debug!(name = %file.name, size = file.size, "Skipping duplicate file");
                continue;
            }
            attached.push(file);
            added += 1;
        }
        self.save()?;
        Ok(added)
    }

    pub fn remove_file(&mut self, id: Uuid) -> Result<FileMeta, StateError> {
        let index = self
            .state
            .gen_form
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or(StateError::NotFound { what: "file", id })?;
        self.remove_file_at(index)
    }

    pub fn remove_file_at(&mut self, index: usize) -> Result<FileMeta, StateError> {
        let files = &mut self.state.gen_form.files;
        if index >= files.len() {
            return Err(StateError::OutOfRange {
                what: "file",
                index,
            });
        }
        let removed = files.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Append a custom template. Title and body are required after trimming.
    pub fn add_template(
        &mut self,
        title: &str,
        body: &str,
        desc: &str,
    ) -> Result<Uuid, StateError> {
        let (title, body) = (title.trim(), body.trim());
        if title.is_empty() || body.is_empty() {
            return Err(StateError::IncompleteTemplate);
        }
        let template = Template::new(title, body, desc.trim());
        let id = template.id;
        self.state.custom_templates.push(template);
        self.save()?;
        Ok(id)
    }

    pub fn delete_template(&mut self, id: Uuid) -> Result<Template, StateError> {
        let index = self
            .state
            .custom_templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(StateError::NotFound {
                what: "template",
                id,
            })?;
        self.delete_template_at(index)
    }

    /// Remove by array position. Positions above `index` shift down by one.
    pub fn delete_template_at(&mut self, index: usize) -> Result<Template, StateError> {
        let templates = &mut self.state.custom_templates;
        if index >= templates.len() {
            return Err(StateError::OutOfRange {
                what: "template",
                index,
            });
        }
        let removed = templates.remove(index);
        self.save()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Utc;

    fn file(name: &str, size: u64) -> FileMeta {
        FileMeta::new(name, size, "application/pdf", Utc::now())
    }

    fn stored_value(storage: &MemoryStorage) -> serde_json::Value {
        serde_json::from_str(&storage.raw(STATE_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_load_absent_is_default() {
        let storage = MemoryStorage::new();
        let store = StateStore::load(&storage);
        assert_eq!(store.state(), &AppState::default());
        // Loading alone does not write
        assert!(storage.raw(STATE_KEY).is_none());
    }

    #[test]
    fn test_load_corrupt_is_default() {
        let storage = MemoryStorage::new();
        storage.insert_raw(STATE_KEY, "{not json");
        let store = StateStore::load(&storage);
        assert_eq!(store.state(), &AppState::default());
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);

        store.set_tab(Tab::DocGeneration).unwrap();
        assert_eq!(stored_value(&storage)["currentTab"], "doc-generation");

        store.set_instruction("Draft the plan").unwrap();
        assert_eq!(stored_value(&storage)["genForm"]["instruction"], "Draft the plan");

        store.set_usage(Some("proposal".into())).unwrap();
        store.set_design("#2E66AF").unwrap();
        store.set_pages("6-10").unwrap();
        store.set_option("agenda", true).unwrap();

        let value = stored_value(&storage);
        assert_eq!(value["genForm"]["usage"], "proposal");
        assert_eq!(value["genForm"]["design"], "#2E66AF");
        assert_eq!(value["genForm"]["pages"], "6-10");
        assert_eq!(value["genForm"]["options"], serde_json::json!(["agenda"]));

        store.set_option("agenda", false).unwrap();
        assert_eq!(stored_value(&storage)["genForm"]["options"], serde_json::json!([]));
    }

    #[test]
    fn test_message_target_is_a_snapshot() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);

        store.set_target(Target::Current).unwrap();
        store.append_message(Role::User, "Fix the title").unwrap();
        store.set_target(Target::All).unwrap();
        store.append_message(Role::Ai, "Done").unwrap();

        let history = &store.state().chat_history;
        assert_eq!(history[0].target, Target::Current);
        assert_eq!(history[1].target, Target::All);
        assert_eq!(stored_value(&storage)["chatHistory"][0]["target"], "current");
    }

    #[test]
    fn test_duplicate_files_are_suppressed() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);

        assert_eq!(store.add_files([file("a.pdf", 100)]).unwrap(), 1);
        assert_eq!(store.add_files([file("a.pdf", 100)]).unwrap(), 0);
        // Same name, different size is a different file
        assert_eq!(
            store.add_files([file("a.pdf", 200), file("b.pdf", 100), file("b.pdf", 100)]).unwrap(),
            2
        );
        assert_eq!(store.state().gen_form.files.len(), 3);
    }

    #[test]
    fn test_remove_file_by_id_and_position() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        store.add_files([file("a.pdf", 1), file("b.pdf", 2), file("c.pdf", 3)]).unwrap();

        let b_id = store.state().gen_form.files[1].id;
        assert_eq!(store.remove_file(b_id).unwrap().name, "b.pdf");
        assert!(matches!(store.remove_file(b_id), Err(StateError::NotFound { .. })));

        assert_eq!(store.remove_file_at(0).unwrap().name, "a.pdf");
        assert!(matches!(store.remove_file_at(5), Err(StateError::OutOfRange { index: 5, .. })));

        let names: Vec<&str> = store.state().gen_form.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf"]);
    }

    #[test]
    fn test_templates_append_and_delete() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);

        let t1 = store.add_template(" T1 ", "first body", "").unwrap();
        let t2 = store.add_template("T2", "second body", " desc ").unwrap();
        let titles: Vec<&str> = store.state().custom_templates.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["T1", "T2"]);
        assert_eq!(store.state().custom_templates[1].desc, "desc");

        assert_eq!(store.delete_template(t1).unwrap().title, "T1");
        assert_eq!(store.state().custom_templates[0].id, t2);
        assert_eq!(stored_value(&storage)["customTemplates"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_incomplete_template_is_rejected() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);

        assert!(matches!(store.add_template("  ", "body", ""), Err(StateError::IncompleteTemplate)));
        assert!(matches!(store.add_template("title", "", ""), Err(StateError::IncompleteTemplate)));
        assert!(store.state().custom_templates.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let storage = MemoryStorage::with_quota(64);
        let mut store = StateStore::load(&storage);

        let err = store.set_instruction("x".repeat(200)).unwrap_err();
        assert!(err.is_persist_failure());
        assert_eq!(store.state().gen_form.instruction.len(), 200);
        assert!(storage.raw(STATE_KEY).is_none());
    }

    #[test]
    fn test_reload_restores_everything() {
        let storage = MemoryStorage::new();
        let mut store = StateStore::load(&storage);
        store.set_target(Target::Selection).unwrap();
        store.append_message(Role::User, "Summarize").unwrap();
        store.add_files([file("deck.pptx", 2048)]).unwrap();
        store.add_template("T", "B", "").unwrap();

        let reloaded = StateStore::load(&storage);
        assert_eq!(reloaded.state(), store.state());
    }
}
