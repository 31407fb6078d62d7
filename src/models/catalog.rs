//! Records returned by the catalog backend.
//!
//! Field names arrive in camelCase; snake_case spellings are accepted too.
//! Timestamps are kept as the strings the backend sent.

use serde::{Deserialize, Serialize};

use super::{Id, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    /// Name if the identity service knows one, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    #[serde(default, alias = "updated_at")]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub id: Id,
    #[serde(alias = "arabic_text")]
    pub arabic_text: String,
    #[serde(alias = "indonesian_text")]
    pub indonesian_text: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<Id>,
    #[serde(default, alias = "arabic_audio")]
    pub arabic_audio: Option<String>,
    #[serde(default, alias = "indonesian_audio")]
    pub indonesian_audio: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    #[serde(default, alias = "updated_at")]
    pub updated_at: String,
}

impl Vocabulary {
    /// Id of the owning category, from the nested record or the flat column.
    pub fn category_ref(&self) -> Option<&Id> {
        self.category
            .as_ref()
            .map(|c| &c.id)
            .or(self.category_id.as_ref())
    }

    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    #[serde(default, alias = "updated_at")]
    pub updated_at: String,
    /// Present only when fetched with `include=exercises`.
    #[serde(default)]
    pub exercises: Vec<Question>,
    /// Present only when fetched with `include=lessons`.
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default, alias = "level_id")]
    pub level_id: Option<Id>,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    #[serde(default, alias = "updated_at")]
    pub updated_at: String,
}

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_categories: usize,
    pub total_vocabulary: usize,
    pub total_lessons: usize,
    pub total_levels: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_with_nested_category() {
        let json = r#"{
            "id": 3,
            "arabicText": "كِتَاب",
            "indonesianText": "buku",
            "category": {"id": 2, "name": "Objects"},
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;
        let v: Vocabulary = serde_json::from_str(json).unwrap();
        assert_eq!(v.category_ref(), Some(&Id::Int(2)));
        assert_eq!(v.category_name(), "Objects");
        assert_eq!(v.updated_at, "");
    }

    #[test]
    fn lesson_accepts_snake_case() {
        let json = r#"{"id": 7, "title": "Greetings", "content": "...", "sequence": 2, "level_id": 1}"#;
        let l: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(l.level_id, Some(Id::Int(1)));
        assert_eq!(l.sequence, 2);
    }

    #[test]
    fn level_without_includes() {
        let json = r#"{"id": 1, "name": "Beginner", "description": "Start here", "sequence": 1}"#;
        let level: Level = serde_json::from_str(json).unwrap();
        assert!(level.exercises.is_empty());
        assert!(level.lessons.is_empty());
    }
}
