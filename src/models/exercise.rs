use serde::{Deserialize, Deserializer, Serialize};

use super::Id;

/// Every question carries exactly this many answer choices.
pub const CHOICES_PER_QUESTION: usize = 4;

/// One selectable answer belonging to a [`Question`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "is_correct")]
    pub is_correct: bool,
}

impl Choice {
    pub fn blank(is_correct: bool) -> Self {
        Self {
            id: None,
            text: String::new(),
            is_correct,
        }
    }
}

/// A multiple-choice exercise prompt.
///
/// `id` is `None` until the backend has stored the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(rename = "question", alias = "text")]
    pub text: String,
    #[serde(default, deserialize_with = "four_choices")]
    pub choices: [Choice; CHOICES_PER_QUESTION],
}

/// Stored exercises do not always have four choices. Short lists are padded
/// with blank incorrect choices; only the first four of a long list are kept.
fn four_choices<'de, D>(deserializer: D) -> Result<[Choice; CHOICES_PER_QUESTION], D::Error>
where
    D: Deserializer<'de>,
{
    let mut choices = Vec::<Choice>::deserialize(deserializer)?;
    choices.resize_with(CHOICES_PER_QUESTION, Choice::default);
    Ok(std::array::from_fn(|i| std::mem::take(&mut choices[i])))
}

impl Question {
    /// An unsaved question with empty text and the first choice marked correct.
    pub fn blank() -> Self {
        Self {
            id: None,
            text: String::new(),
            choices: [
                Choice::blank(true),
                Choice::blank(false),
                Choice::blank(false),
                Choice::blank(false),
            ],
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn correct_count(&self) -> usize {
        self.choices.iter().filter(|c| c.is_correct).count()
    }

    /// Position of the first choice marked correct.
    pub fn correct_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| c.is_correct)
    }
}

impl Default for Question {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_question_has_one_correct_choice() {
        let q = Question::blank();
        assert!(!q.is_persisted());
        assert_eq!(q.correct_count(), 1);
        assert_eq!(q.correct_index(), Some(0));
    }

    #[test]
    fn decodes_backend_exercise_shape() {
        let json = r#"{
            "id": 12,
            "question": "What is كتاب?",
            "type": "multiple_choice",
            "choices": [
                {"id": 1, "text": "book", "isCorrect": true},
                {"id": 2, "text": "pen", "isCorrect": false},
                {"id": 3, "text": "door", "is_correct": false},
                {"id": 4, "text": "house"}
            ]
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, Some(Id::Int(12)));
        assert_eq!(q.text, "What is كتاب?");
        assert_eq!(q.correct_index(), Some(0));
        assert!(!q.choices[3].is_correct);
    }

    #[test]
    fn short_and_long_choice_lists_become_four() {
        let json = r#"{
            "id": 3,
            "question": "Pick one",
            "choices": [
                {"id": 1, "text": "yes", "isCorrect": true},
                {"id": 2, "text": "no"}
            ]
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.choices[1].text, "no");
        assert_eq!(q.choices[2], Choice::blank(false));
        assert_eq!(q.choices[3], Choice::blank(false));
        assert_eq!(q.correct_count(), 1);

        let json = r#"{"question": "Many", "choices": [
            {"text": "a"}, {"text": "b"}, {"text": "c"}, {"text": "d"}, {"text": "e"}
        ]}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.choices[3].text, "d");

        let q: Question = serde_json::from_str(r#"{"question": "None"}"#).unwrap();
        assert_eq!(q.correct_count(), 0);
    }
}
