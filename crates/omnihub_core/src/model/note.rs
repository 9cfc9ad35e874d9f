//! Note domain model.
//!
//! # Responsibility
//! - Define text, checklist and drawing notes.
//! - Encode/decode checklist items carried in the note `content` field.
//!
//! # Invariants
//! - `title` is never blank.
//! - For `NoteKind::Checklist`, `content` is a JSON array of `ChecklistItem`.
//! - `created_at` is assigned by the store and never changes.

use crate::model::record::{RecordId, RecordKind};
use crate::model::validation::{require_item_title, require_title, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Note flavor; decides how `content` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Plain text body.
    Text,
    /// JSON-encoded checklist items.
    Checklist,
    /// Opaque image data URL produced by a drawing surface.
    Drawing,
}

/// One entry of a checklist note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

/// Stored note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Creation draft for a note; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub kind: NoteKind,
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: NoteKind::Text,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Builds a checklist note, encoding `items` into `content`.
    pub fn checklist(title: impl Into<String>, items: &[ChecklistItem]) -> Self {
        Self {
            kind: NoteKind::Checklist,
            title: title.into(),
            content: encode_checklist(items),
        }
    }

    pub fn into_note(self, id: RecordId, created_at: i64) -> Note {
        Note {
            id,
            kind: self.kind,
            title: self.title,
            content: self.content,
            created_at,
        }
    }
}

impl Note {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_title(&self.title, RecordKind::Note)?;
        if self.kind == NoteKind::Checklist {
            for item in self.checklist_items()? {
                require_item_title(&item.title, RecordKind::Note)?;
            }
        }
        Ok(())
    }

    /// Decodes checklist items; non-checklist notes yield an empty list.
    pub fn checklist_items(&self) -> Result<Vec<ChecklistItem>, ValidationError> {
        if self.kind != NoteKind::Checklist {
            return Ok(Vec::new());
        }
        decode_checklist(&self.content)
    }
}

pub fn encode_checklist(items: &[ChecklistItem]) -> String {
    // Serializing plain structs of strings/bools into a Vec cannot fail.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_checklist(content: &str) -> Result<Vec<ChecklistItem>, ValidationError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(content).map_err(|err| ValidationError::InvalidChecklist(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{decode_checklist, ChecklistItem, NewNote, NoteKind};
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn checklist_content_roundtrips_through_note() {
        let items = vec![ChecklistItem::new("milk"), ChecklistItem::new("eggs")];
        let note = NewNote::checklist("groceries", &items).into_note(Uuid::new_v4(), 1);

        assert_eq!(note.kind, NoteKind::Checklist);
        assert_eq!(note.checklist_items().unwrap(), items);
        note.validate().unwrap();
    }

    #[test]
    fn malformed_checklist_content_is_rejected() {
        let mut note = NewNote::text("list", "").into_note(Uuid::new_v4(), 1);
        note.kind = NoteKind::Checklist;
        note.content = "{not json".to_string();

        assert!(matches!(
            note.validate(),
            Err(ValidationError::InvalidChecklist(_))
        ));
    }

    #[test]
    fn empty_checklist_content_decodes_to_no_items() {
        assert!(decode_checklist("  ").unwrap().is_empty());
    }

    #[test]
    fn note_serializes_kind_as_type_field() {
        let note = NewNote::text("t", "body").into_note(Uuid::nil(), 42);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["createdAt"], 42);
    }
}
