//! Reconcile a stored state record against the current default shape.
//!
//! Stored keys override defaults, missing keys fall back to defaults, and
//! `genForm` gets the same treatment one level down. Fields with the wrong
//! type are replaced by their default, list fields keep every entry that
//! still parses, and unknown keys are carried through untouched.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::state::{AppState, FileMeta, GenerationForm};
use tracing::warn;

/// Merge a parsed record over `AppState::default()`
pub fn reconcile(stored: Value) -> AppState {
    let mut root = match stored {
        Value::Object(map) => map,
        other => {
            warn!(kind = value_kind(&other), "Stored state is not an object; using defaults");
            return AppState::default();
        }
    };

    let defaults = AppState::default();
    let gen_form = match root.remove("genForm") {
        Some(Value::Object(form)) => reconcile_form(form),
        Some(Value::Null) | None => defaults.gen_form,
        Some(other) => {
            warn!(kind = value_kind(&other), "Stored genForm is not an object; using defaults");
            defaults.gen_form
        }
    };

    AppState {
        current_tab: take_field(&mut root, "currentTab", defaults.current_tab),
        target: take_field(&mut root, "target", defaults.target),
        chat_history: take_list(&mut root, "chatHistory", defaults.chat_history),
        gen_form,
        custom_templates: take_list(&mut root, "customTemplates", defaults.custom_templates),
        extra: root,
    }
}

fn reconcile_form(mut form: Map<String, Value>) -> GenerationForm {
    let defaults = GenerationForm::default();
    GenerationForm {
        instruction: take_field(&mut form, "instruction", defaults.instruction),
        usage: take_field(&mut form, "usage", defaults.usage),
        design: take_field(&mut form, "design", defaults.design),
        pages: take_field(&mut form, "pages", defaults.pages),
        options: take_list::<String>(&mut form, "options", Vec::new()).into_iter().collect(),
        reference: take_field(&mut form, "reference", defaults.reference),
        files: dedup_files(take_list(&mut form, "files", defaults.files)),
        extra: form,
    }
}

/// Remove `key` and decode it, or keep `fallback` when absent or malformed
fn take_field<T: DeserializeOwned>(obj: &mut Map<String, Value>, key: &str, fallback: T) -> T {
    let Some(value) = obj.remove(key) else {
        return fallback;
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(field = key, error = %e, "Discarding malformed stored field");
            fallback
        }
    }
}

/// Like `take_field`, but decodes array entries one by one and drops the bad ones
fn take_list<T: DeserializeOwned>(
    obj: &mut Map<String, Value>,
    key: &str,
    fallback: Vec<T>,
) -> Vec<T> {
    let items = match obj.remove(key) {
        None => return fallback,
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(field = key, kind = value_kind(&other), "Stored list is not an array");
            return fallback;
        }
    };

    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        warn!(
            field = key,
            dropped = total - kept.len(),
            "Dropped malformed entries from stored list"
        );
    }
    kept
}

/// Keep the first of any entries sharing a name and size
fn dedup_files(files: Vec<FileMeta>) -> Vec<FileMeta> {
    let total = files.len();
    let mut kept: Vec<FileMeta> = Vec::with_capacity(total);
    for file in files {
        if !kept.iter().any(|k| k.same_file(&file)) {
            kept.push(file);
        }
    }
    if kept.len() < total {
        warn!(dropped = total - kept.len(), "Dropped duplicate stored files");
    }
    kept
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
