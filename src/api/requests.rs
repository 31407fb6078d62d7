//! Request bodies sent to the backend, one struct per entity.

use serde::Serialize;

use crate::forms::{CategoryFields, LessonFields, LevelFields, VocabularyFields};
use crate::models::{Id, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRequest {
    pub name: String,
}

impl From<&CategoryFields> for CategoryRequest {
    fn from(fields: &CategoryFields) -> Self {
        Self {
            name: fields.name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyRequest {
    pub arabic_text: String,
    pub indonesian_text: String,
    pub category_id: Option<Id>,
}

impl From<&VocabularyFields> for VocabularyRequest {
    fn from(fields: &VocabularyFields) -> Self {
        Self {
            arabic_text: fields.arabic_text.trim().to_string(),
            indonesian_text: fields.indonesian_text.trim().to_string(),
            category_id: fields.category_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelRequest {
    pub name: String,
    pub description: String,
    pub sequence: u32,
}

impl From<&LevelFields> for LevelRequest {
    fn from(fields: &LevelFields) -> Self {
        Self {
            name: fields.name.trim().to_string(),
            description: fields.description.trim().to_string(),
            sequence: fields.sequence,
        }
    }
}

/// `level_id` is only sent when creating; a lesson never moves between levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRequest {
    pub title: String,
    pub content: String,
    pub sequence: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<Id>,
}

impl LessonRequest {
    pub fn create(fields: &LessonFields) -> Self {
        Self {
            level_id: fields.level_id.clone(),
            ..Self::update(fields)
        }
    }

    pub fn update(fields: &LessonFields) -> Self {
        Self {
            title: fields.title.trim().to_string(),
            content: fields.content.clone(),
            sequence: fields.sequence,
            level_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    MultipleChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub text: String,
    pub is_correct: bool,
    /// 1-based display position.
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseRequest {
    pub level_id: Id,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub choices: Vec<ChoiceRequest>,
}

impl ExerciseRequest {
    pub fn from_question(level_id: &Id, question: &Question) -> Self {
        Self {
            level_id: level_id.clone(),
            question: question.text.trim().to_string(),
            kind: ExerciseKind::MultipleChoice,
            choices: question
                .choices
                .iter()
                .zip(1..)
                .map(|(c, order)| ChoiceRequest {
                    id: c.id.clone(),
                    text: c.text.clone(),
                    is_correct: c.is_correct,
                    order,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lesson_update_omits_level() {
        let fields = LessonFields::for_level(Id::Int(3), 2);
        let create = serde_json::to_value(LessonRequest::create(&fields)).unwrap();
        let update = serde_json::to_value(LessonRequest::update(&fields)).unwrap();
        assert_eq!(create["level_id"], json!(3));
        assert!(update.get("level_id").is_none());
    }

    #[test]
    fn exercise_body_shape() {
        let mut q = Question::blank();
        q.text = "  Apa arti باب?  ".to_string();
        q.choices[1].id = Some(Id::Int(22));
        q.choices[1].text = "pintu".to_string();

        let body = serde_json::to_value(ExerciseRequest::from_question(&Id::Int(8), &q)).unwrap();
        assert_eq!(body["level_id"], json!(8));
        assert_eq!(body["question"], json!("Apa arti باب?"));
        assert_eq!(body["type"], json!("multiple_choice"));
        assert_eq!(body["choices"][0], json!({"text": "", "is_correct": true, "order": 1}));
        assert_eq!(
            body["choices"][1],
            json!({"id": 22, "text": "pintu", "is_correct": false, "order": 2})
        );
        assert_eq!(body["choices"].as_array().unwrap().len(), 4);
    }
}
