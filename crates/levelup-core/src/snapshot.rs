//! Snapshot, full-export and list-export documents.
//!
//! Loading a persisted snapshot is lenient: a corrupt document is logged and
//! replaced by an empty default so startup never fails. Imports are strict:
//! a bad document is rejected and the caller's state is left alone.
//!
//! Both paths also accept the older browser layout, where a student's lists
//! are plain word arrays with sentences and visibility kept in side maps
//! (`sentences`, `listConfigs`).

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QuestError, Result};
use crate::model::{AppData, Student, WordList};
use crate::traits::SnapshotStore;

/// Type marker carried by every list export.
pub const LIST_EXPORT_TYPE: &str = "levelup-list";

/// Parse a snapshot and apply defaults. Fails on malformed JSON or a
/// top-level value that is not an object.
pub fn parse_snapshot(raw: &str) -> Result<AppData> {
    let doc: Value = serde_json::from_str(raw)?;
    document_from_value(doc)
}

fn document_from_value(mut doc: Value) -> Result<AppData> {
    let Some(root) = doc.as_object_mut() else {
        return Err(serde_json::Error::custom("data document must be a JSON object").into());
    };
    if let Some(Value::Object(students)) = root.get_mut("students") {
        for student in students.values_mut().filter_map(Value::as_object_mut) {
            upgrade_legacy_lists(student);
        }
    }
    let mut data: AppData = serde_json::from_value(doc)?;
    data.normalize();
    Ok(data)
}

/// Rewrite one student from the side-map layout into inline lists.
fn upgrade_legacy_lists(student: &mut Map<String, Value>) {
    let sentences = student.remove("sentences");
    let list_configs = student.remove("listConfigs");
    // Goals typed into a form field were stored as strings.
    let typed_goal = match student.get("weeklyGoal") {
        Some(Value::String(goal)) => Some(goal.trim().parse::<u32>().ok()),
        _ => None,
    };
    match typed_goal {
        Some(Some(goal)) => {
            student.insert("weeklyGoal".into(), goal.into());
        }
        Some(None) => {
            student.remove("weeklyGoal");
        }
        None => {}
    }

    let Some(Value::Object(lists)) = student.get_mut("lists") else {
        return;
    };
    for list in lists.values_mut() {
        if list.is_array() {
            let words = list.take();
            *list = Value::Object(Map::from_iter([("words".to_string(), words)]));
        }
    }

    if let Some(Value::Object(sentences)) = sentences {
        for (name, lines) in sentences {
            if let Some(Value::Object(list)) = lists.get_mut(&name) {
                if lines.is_array() && !list.contains_key("sentences") {
                    list.insert("sentences".into(), lines);
                }
            }
        }
    }
    if let Some(Value::Object(configs)) = list_configs {
        for (name, config) in configs {
            let hidden = config.get("visible") == Some(&Value::Bool(false));
            if let Some(Value::Object(list)) = lists.get_mut(&name) {
                list.entry("hidden").or_insert(Value::Bool(hidden));
            }
        }
    }
}

/// Parse a snapshot, falling back to an empty document when it is corrupt.
pub fn load_or_default(raw: Option<&str>) -> AppData {
    let Some(raw) = raw else {
        return AppData::default();
    };
    match parse_snapshot(raw) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "stored data is corrupted, starting fresh");
            AppData::default()
        }
    }
}

/// Read from `store` with the same fallback as [`load_or_default`].
///
/// Only an unreadable store is an error; unparseable contents are not.
pub fn load_from_store(store: &dyn SnapshotStore) -> anyhow::Result<AppData> {
    let raw = store.load()?;
    Ok(load_or_default(raw.as_deref()))
}

/// Serialize the compact form written to the store.
pub fn to_snapshot(data: &AppData) -> Result<String> {
    Ok(serde_json::to_string(data)?)
}

pub fn save_to_store(store: &dyn SnapshotStore, data: &AppData) -> anyhow::Result<()> {
    let snapshot = to_snapshot(data)?;
    store.save(&snapshot)?;
    tracing::debug!(bytes = snapshot.len(), "snapshot saved");
    Ok(())
}

/// Pretty-printed full backup.
pub fn export_full(data: &AppData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Parse a full backup. Unlike [`load_or_default`] this rejects bad input:
/// the document must be an object carrying a `students` object, and typed
/// documents such as list exports are refused.
pub fn import_full(raw: &str) -> Result<AppData> {
    let invalid = |msg: String| QuestError::InvalidImport(msg);
    let doc: Value = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let Some(root) = doc.as_object() else {
        return Err(invalid("backup must be a JSON object".into()));
    };
    if let Some(kind) = root.get("type") {
        let kind = kind.as_str().unwrap_or("typed");
        return Err(invalid(format!("expected a full backup, found a '{kind}' document")));
    }
    if !matches!(root.get("students"), Some(Value::Object(_))) {
        return Err(invalid("backup has no students".into()));
    }
    document_from_value(doc).map_err(|e| invalid(e.to_string()))
}

/// A single list as shared between students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListExport {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<String>>,
}

/// Build the export document for one of `student`'s lists.
pub fn export_list(student: &Student, name: &str) -> Result<ListExport> {
    let list = student.list(name)?;
    Ok(ListExport {
        kind: LIST_EXPORT_TYPE.to_string(),
        name: name.to_string(),
        words: list.words.clone(),
        sentences: Some(list.sentences.clone()),
    })
}

/// Parse and validate a list export.
pub fn parse_list_export(raw: &str) -> Result<ListExport> {
    let doc: ListExport =
        serde_json::from_str(raw).map_err(|e| QuestError::InvalidImport(e.to_string()))?;
    if doc.kind != LIST_EXPORT_TYPE {
        return Err(QuestError::InvalidImport(format!(
            "expected type '{LIST_EXPORT_TYPE}', found '{}'",
            doc.kind
        )));
    }
    if doc.name.trim().is_empty() {
        return Err(QuestError::InvalidImport("list name is empty".into()));
    }
    Ok(doc)
}

/// Import a list export into `student`.
///
/// The named list is created if missing. Its words are replaced; its
/// sentences only when the document carries them. Hidden state is kept.
/// Returns the list name.
pub fn import_list(student: &mut Student, raw: &str) -> Result<String> {
    let doc = parse_list_export(raw)?;
    let name = doc.name.trim().to_string();
    let has_sentences = doc.sentences.is_some();
    let incoming = WordList::new(doc.words, doc.sentences.unwrap_or_default());

    let entry = student.lists.entry(name.clone()).or_default();
    entry.words = incoming.words;
    if has_sentences {
        entry.sentences = incoming.sentences;
    }
    tracing::info!(list = %name, words = entry.words.len(), "imported list");
    Ok(name)
}
