//! Top-level field sets, one per editable record.

use crate::error::FieldError;
use crate::models::{Category, Id, Lesson, Level, Question, Vocabulary};

/// Fields a form can validate and expose as editable text inputs.
pub trait FormFields {
    /// Input labels, in display order.
    fn labels(&self) -> &'static [&'static str];

    /// Current value of input `index` as text.
    fn value(&self, index: usize) -> String;

    /// Store raw text typed into input `index`. Out-of-range indexes are ignored.
    fn set_value(&mut self, index: usize, raw: &str);

    fn validate(&self) -> Vec<FieldError>;
}

/// Parse a typed sequence number, falling back to `default` on bad input.
pub fn parse_sequence(raw: &str, default: u32) -> u32 {
    raw.trim().parse().unwrap_or(default)
}

fn parse_id(raw: &str) -> Option<Id> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else if let Ok(n) = raw.parse::<i64>() {
        Some(Id::Int(n))
    } else {
        Some(Id::from(raw))
    }
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

/// Every question needs text; choices may stay empty.
pub fn validate_questions(questions: &[Question]) -> Vec<FieldError> {
    questions
        .iter()
        .enumerate()
        .filter(|(_, q)| q.text.trim().is_empty())
        .map(|(i, _)| {
            FieldError::new(
                format!("exercise {}", i + 1),
                format!("Exercise {}: question text is required", i + 1),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
}

impl CategoryFields {
    pub fn from_record(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
        }
    }
}

impl FormFields for CategoryFields {
    fn labels(&self) -> &'static [&'static str] {
        &["Name"]
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, raw: &str) {
        if index == 0 {
            self.name = raw.to_string();
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name, "Category name is required");
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyFields {
    pub arabic_text: String,
    pub indonesian_text: String,
    pub category_id: Option<Id>,
}

impl VocabularyFields {
    pub fn from_record(vocabulary: &Vocabulary) -> Self {
        Self {
            arabic_text: vocabulary.arabic_text.clone(),
            indonesian_text: vocabulary.indonesian_text.clone(),
            category_id: vocabulary.category_ref().cloned(),
        }
    }
}

impl FormFields for VocabularyFields {
    fn labels(&self) -> &'static [&'static str] {
        &["Arabic text", "Indonesian text", "Category"]
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.arabic_text.clone(),
            1 => self.indonesian_text.clone(),
            2 => self
                .category_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, raw: &str) {
        match index {
            0 => self.arabic_text = raw.to_string(),
            1 => self.indonesian_text = raw.to_string(),
            2 => self.category_id = parse_id(raw),
            _ => {}
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require(&mut errors, "arabic_text", &self.arabic_text, "Arabic text is required");
        require(
            &mut errors,
            "indonesian_text",
            &self.indonesian_text,
            "Indonesian text is required",
        );
        if self.category_id.is_none() {
            errors.push(FieldError::new("category", "Select a category"));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFields {
    pub name: String,
    pub description: String,
    pub sequence: u32,
}

impl LevelFields {
    pub const DEFAULT_SEQUENCE: u32 = 1;

    pub fn from_record(level: &Level) -> Self {
        Self {
            name: level.name.clone(),
            description: level.description.clone(),
            sequence: level.sequence,
        }
    }
}

impl Default for LevelFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            sequence: Self::DEFAULT_SEQUENCE,
        }
    }
}

impl FormFields for LevelFields {
    fn labels(&self) -> &'static [&'static str] {
        &["Name", "Description", "Sequence"]
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.description.clone(),
            2 => self.sequence.to_string(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, raw: &str) {
        match index {
            0 => self.name = raw.to_string(),
            1 => self.description = raw.to_string(),
            2 => self.sequence = parse_sequence(raw, Self::DEFAULT_SEQUENCE),
            _ => {}
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name, "Level name is required");
        require(&mut errors, "description", &self.description, "Description is required");
        if self.sequence < 1 {
            errors.push(FieldError::new("sequence", "Sequence must be at least 1"));
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonFields {
    pub title: String,
    pub content: String,
    pub sequence: u32,
    pub level_id: Option<Id>,
}

impl LessonFields {
    pub const DEFAULT_SEQUENCE: u32 = 0;

    /// Blank lesson for `level_id`, numbered after the existing ones.
    pub fn for_level(level_id: Id, sequence: u32) -> Self {
        Self {
            sequence,
            level_id: Some(level_id),
            ..Self::default()
        }
    }

    pub fn from_record(lesson: &Lesson) -> Self {
        Self {
            title: lesson.title.clone(),
            content: lesson.content.clone(),
            sequence: lesson.sequence,
            level_id: lesson.level_id.clone(),
        }
    }
}

impl FormFields for LessonFields {
    fn labels(&self) -> &'static [&'static str] {
        &["Title", "Content", "Sequence"]
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.title.clone(),
            1 => self.content.clone(),
            2 => self.sequence.to_string(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, raw: &str) {
        match index {
            0 => self.title = raw.to_string(),
            1 => self.content = raw.to_string(),
            2 => self.sequence = parse_sequence(raw, Self::DEFAULT_SEQUENCE),
            _ => {}
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title, "Lesson title is required");
        require(&mut errors, "content", &self.content, "Lesson content is required");
        errors
    }
}
