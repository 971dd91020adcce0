use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique counseling note identifier
pub type NoteId = Uuid;

/// Topic of a counseling note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    Academic,
    Behavioral,
    Financial,
    General,
}

/// Who may read a note besides mentors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteVisibility {
    /// Mentors only.
    Private,
    /// Also shown on student and parent dashboards.
    Shared,
}

/// A note attached to a student record by a mentor (or the system).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounselingNote {
    pub id: NoteId,
    pub date: NaiveDate,
    pub author: String,
    pub note: String,
    pub category: NoteCategory,
    pub visibility: NoteVisibility,
}

/// Input for appending a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    /// Defaults to today (UTC) when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub author: String,
    pub note: String,
    pub category: NoteCategory,
    pub visibility: NoteVisibility,
}

impl NewNote {
    pub fn new(author: &str, note: &str, category: NoteCategory, visibility: NoteVisibility) -> Self {
        Self {
            date: None,
            author: author.to_string(),
            note: note.to_string(),
            category,
            visibility,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn into_note(self) -> CounselingNote {
        CounselingNote {
            id: Uuid::new_v4(),
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            author: self.author,
            note: self.note,
            category: self.category,
            visibility: self.visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_date_is_kept() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let note = NewNote::new("Dr. Smith", "Recommended tutoring", NoteCategory::Academic, NoteVisibility::Shared)
            .on(date)
            .into_note();
        assert_eq!(note.date, date);
        assert_eq!(note.category, NoteCategory::Academic);
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let before = Utc::now().date_naive();
        let note = NewNote::new("System", "Profile created", NoteCategory::General, NoteVisibility::Shared)
            .into_note();
        assert!(note.date >= before && note.date <= Utc::now().date_naive());
    }

    #[test]
    fn note_wire_format() {
        let json = r#"{"author":"Dr. Smith","note":"Fee plan agreed","category":"financial","visibility":"private"}"#;
        let note: NewNote = serde_json::from_str(json).unwrap();
        assert_eq!(note.date, None);
        assert_eq!(note.visibility, NoteVisibility::Private);
    }
}
