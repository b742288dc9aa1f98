//! Persisted session state.
//!
//! `AppState` is the only unit of persistence: it is serialized as one JSON
//! record after every mutation and reconciled against defaults on startup.
//! Field names on the wire are camelCase to stay readable by earlier builds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Sentinel used by `design` and `pages` when the user has not chosen a value
pub const AUTO: &str = "auto";

/// Usage purposes offered as tiles on the generation form (value, label)
pub const USAGE_CHOICES: &[(&str, &str)] = &[
    ("proposal", "Proposal"),
    ("report", "Report"),
    ("meeting", "Meeting material"),
    ("training", "Training"),
];

/// Page-count preferences (value, label)
pub const PAGE_CHOICES: &[(&str, &str)] = &[
    (AUTO, "Auto"),
    ("1-5", "1-5 pages"),
    ("6-10", "6-10 pages"),
    ("11-20", "11-20 pages"),
    ("21+", "21+ pages"),
];

/// Optional flags for the generated document (value, label)
pub const OPTION_CHOICES: &[(&str, &str)] = &[
    ("agenda", "Agenda slide"),
    ("summary", "Executive summary"),
    ("speaker-notes", "Speaker notes"),
    ("appendix", "Appendix"),
];

/// Top-level UI section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    SlideSupport,
    DocGeneration,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::SlideSupport, Tab::DocGeneration]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::SlideSupport => "slide-support",
            Tab::DocGeneration => "doc-generation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tab::SlideSupport => "Slide support",
            Tab::DocGeneration => "Document generation",
        }
    }
}

/// Scope the assistant acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Current,
    Selection,
    All,
}

impl Target {
    pub fn all() -> &'static [Target] {
        &[Target::Current, Target::Selection, Target::All]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Current => "Current slide",
            Target::Selection => "Selected text",
            Target::All => "All slides",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

/// A chat transcript entry.
///
/// `target` is a snapshot of the scope active when the message was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub target: Target,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, target: Target) -> Self {
        Self {
            role,
            content: content.into(),
            target,
        }
    }
}

/// Metadata of an attached file. The file's contents are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Milliseconds since the Unix epoch on the wire
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
}

impl FileMeta {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified,
        }
    }

    /// Duplicate detection key: same name and same size
    pub fn same_file(&self, other: &FileMeta) -> bool {
        self.name == other.name && self.size == other.size
    }
}

/// A user-defined chat prompt template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub desc: String,
}

impl Template {
    pub fn new(title: impl Into<String>, body: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            desc: desc.into(),
        }
    }

    pub fn display_desc(&self) -> String {
        display_desc(&self.desc, &self.body)
    }
}

/// A template shipped with the app. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    pub title: &'static str,
    pub body: &'static str,
    pub desc: &'static str,
}

/// One row of the template list as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    /// `None` for built-ins, which cannot be deleted
    pub id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub desc: String,
}

/// Description shown under a template title: `desc`, or the start of `body`
fn display_desc(desc: &str, body: &str) -> String {
    const PREVIEW_CHARS: usize = 15;

    if !desc.is_empty() {
        return desc.to_string();
    }
    let preview: String = body.chars().take(PREVIEW_CHARS).collect();
    if body.chars().count() > PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Draft configuration for a document-generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationForm {
    pub instruction: String,
    pub usage: Option<String>,
    /// `#RRGGBB` or `"auto"`
    pub design: String,
    /// One of `PAGE_CHOICES` or `"auto"`
    pub pages: String,
    pub options: BTreeSet<String>,
    /// Kept for record compatibility; no input surface writes it
    pub reference: String,
    pub files: Vec<FileMeta>,
    /// Keys written by other builds, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GenerationForm {
    fn default() -> Self {
        Self {
            instruction: String::new(),
            usage: None,
            design: AUTO.to_string(),
            pages: AUTO.to_string(),
            options: BTreeSet::new(),
            reference: String::new(),
            files: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl GenerationForm {
    /// Generate is enabled iff the instruction has non-whitespace text and a usage is chosen
    pub fn can_generate(&self) -> bool {
        !self.instruction.trim().is_empty()
            && self.usage.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// The chosen design color, if it is not `"auto"`
    pub fn design_hex(&self) -> Option<&str> {
        if self.design == AUTO {
            None
        } else {
            Some(&self.design)
        }
    }
}

/// The persisted root object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_tab: Tab,
    pub target: Target,
    pub chat_history: Vec<Message>,
    pub gen_form: GenerationForm,
    pub custom_templates: Vec<Template>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppState {
    /// Template list in display order: custom templates newest first, then built-ins.
    pub fn template_display_order(&self, builtins: &[BuiltinTemplate]) -> Vec<TemplateItem> {
        let custom = self.custom_templates.iter().rev().map(|t| TemplateItem {
            id: Some(t.id),
            title: t.title.clone(),
            body: t.body.clone(),
            desc: t.display_desc(),
        });
        let builtin = builtins.iter().map(|t| TemplateItem {
            id: None,
            title: t.title.to_string(),
            body: t.body.to_string(),
            desc: display_desc(t.desc, t.body),
        });
        custom.chain(builtin).collect()
    }

    /// Most recent message sent by the user
    pub fn last_user_message(&self) -> Option<&Message> {
        self.chat_history.iter().rev().find(|m| m.role == Role::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_shape() {
        let value = serde_json::to_value(AppState::default()).unwrap();

        assert_eq!(value["currentTab"], "slide-support");
        assert_eq!(value["target"], "current");
        assert_eq!(value["chatHistory"], serde_json::json!([]));
        assert_eq!(value["genForm"]["design"], "auto");
        assert_eq!(value["genForm"]["pages"], "auto");
        assert_eq!(value["genForm"]["usage"], Value::Null);
        assert_eq!(value["genForm"]["options"], serde_json::json!([]));
        assert_eq!(value["customTemplates"], serde_json::json!([]));
    }

    #[test]
    fn test_generate_gate() {
        let mut form = GenerationForm::default();
        assert!(!form.can_generate());

        form.instruction = " ".into();
        form.usage = Some("proposal".into());
        assert!(!form.can_generate());

        form.instruction = "x".into();
        assert!(form.can_generate());

        form.usage = None;
        assert!(!form.can_generate());
    }

    #[test]
    fn test_empty_usage_is_not_chosen() {
        let form = GenerationForm {
            instruction: "Quarterly review".into(),
            usage: Some(String::new()),
            ..Default::default()
        };
        assert!(!form.can_generate());
    }

    #[test]
    fn test_file_meta_wire_format() {
        let modified = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        let file = FileMeta::new("a.pdf", 100, "application/pdf", modified);
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(value["type"], "application/pdf");
        assert_eq!(value["lastModified"], 1_700_000_000_123_i64);

        let legacy: FileMeta = serde_json::from_value(serde_json::json!({
            "name": "b.png", "size": 5, "type": "image/png", "lastModified": 42
        }))
        .unwrap();
        assert_eq!(legacy.last_modified.timestamp_millis(), 42);
        assert!(!legacy.id.is_nil());
    }

    #[test]
    fn test_template_display_desc() {
        let described = Template::new("T", "body text", "short");
        assert_eq!(described.display_desc(), "short");

        let long = Template::new("T", "Summarize this slide briefly", "");
        assert_eq!(long.display_desc(), "Summarize this ...");

        let exact = Template::new("T", "fifteen chars!!", "");
        assert_eq!(exact.display_desc(), "fifteen chars!!");
    }

    #[test]
    fn test_template_display_order() {
        let mut state = AppState::default();
        state.custom_templates.push(Template::new("T1", "one", ""));
        state.custom_templates.push(Template::new("T2", "two", ""));
        let builtins = [BuiltinTemplate {
            title: "B",
            body: "builtin",
            desc: "",
        }];

        let titles: Vec<String> = state
            .template_display_order(&builtins)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["T2", "T1", "B"]);
    }

    #[test]
    fn test_message_target_defaults_to_current() {
        let msg: Message =
            serde_json::from_value(serde_json::json!({"role": "ai", "content": "hi"})).unwrap();
        assert_eq!(msg.target, Target::Current);
        assert_eq!(msg.role, Role::Ai);
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let raw = serde_json::json!({
            "currentTab": "doc-generation",
            "target": "all",
            "chatHistory": [],
            "genForm": {
                "instruction": "", "usage": null, "design": "auto", "pages": "auto",
                "options": [], "reference": "", "files": [], "tone": "formal"
            },
            "customTemplates": [],
            "theme": "dark"
        });
        let state: AppState = serde_json::from_value(raw).unwrap();
        assert_eq!(state.extra["theme"], "dark");
        assert_eq!(state.gen_form.extra["tone"], "formal");

        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back["theme"], "dark");
        assert_eq!(back["genForm"]["tone"], "formal");
    }
}
