//! Exercise editor.
//!
//! Holds the questions of one editing session and the ids of persisted
//! questions removed during it. Every operation is a synchronous state
//! transition; nothing here talks to the network. A failed operation
//! leaves the state exactly as it was.

use tracing::debug;

use crate::error::{AdminError, Result};
use crate::models::{Id, Question, CHOICES_PER_QUESTION};

/// Whether a form is creating a new record or changing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit,
}

/// What the editor hands to the save function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub questions: Vec<Question>,
    /// Persisted question ids to delete on save, in removal order.
    pub deleted: Vec<Id>,
}

#[derive(Debug, Clone, Default)]
pub struct ExerciseEditor {
    questions: Vec<Question>,
    pending_deletions: Vec<Id>,
}

impl ExerciseEditor {
    pub fn new(mode: Mode, existing: &[Question]) -> Self {
        let mut editor = Self::default();
        editor.initialize(mode, existing);
        editor
    }

    /// Reset the session.
    ///
    /// Edit mode copies `existing`; add mode ignores it and starts with a
    /// single blank question. Pending deletions are always cleared.
    pub fn initialize(&mut self, mode: Mode, existing: &[Question]) {
        self.questions = match mode {
            Mode::Edit => existing.to_vec(),
            Mode::Add => vec![Question::blank()],
        };
        self.pending_deletions.clear();
        debug!(target: "editor", ?mode, questions = self.questions.len(), "Editor initialized");
    }

    pub fn add_question(&mut self) {
        self.questions.push(Question::blank());
    }

    /// Remove the question at `index`, recording its id for deletion if it
    /// was persisted. Returns the removed question.
    pub fn remove_question(&mut self, index: usize) -> Result<Question> {
        self.check_question(index)?;
        let removed = self.questions.remove(index);
        if let Some(id) = &removed.id {
            if !self.pending_deletions.contains(id) {
                self.pending_deletions.push(id.clone());
            }
        }
        debug!(target: "editor", index, persisted = removed.is_persisted(), "Question removed");
        Ok(removed)
    }

    pub fn set_question_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.check_question(index)?;
        self.questions[index].text = text.into();
        Ok(())
    }

    pub fn set_choice_text(
        &mut self,
        question: usize,
        choice: usize,
        text: impl Into<String>,
    ) -> Result<()> {
        self.check_choice(question, choice)?;
        self.questions[question].choices[choice].text = text.into();
        Ok(())
    }

    /// Mark one choice correct and every sibling incorrect.
    ///
    /// Sweeps all siblings rather than swapping with the previous answer, so
    /// a question loaded with several correct choices ends up with one.
    pub fn set_choice_correct(&mut self, question: usize, choice: usize) -> Result<()> {
        self.check_choice(question, choice)?;
        for (i, c) in self.questions[question].choices.iter_mut().enumerate() {
            c.is_correct = i == choice;
        }
        Ok(())
    }

    /// Record that the question at `index` now exists on the backend as `id`,
    /// so the next save updates it instead of creating it again.
    pub fn mark_saved(&mut self, index: usize, id: Id) -> Result<()> {
        self.check_question(index)?;
        self.questions[index].id = Some(id);
        Ok(())
    }

    /// Drop `id` from the pending deletions once the backend has removed it.
    pub fn forget_deletion(&mut self, id: &Id) {
        self.pending_deletions.retain(|pending| pending != id);
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            questions: self.questions.clone(),
            deleted: self.pending_deletions.clone(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn pending_deletions(&self) -> &[Id] {
        &self.pending_deletions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn check_question(&self, index: usize) -> Result<()> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(AdminError::OutOfRange {
                what: "question",
                index,
                len: self.questions.len(),
            })
        }
    }

    fn check_choice(&self, question: usize, choice: usize) -> Result<()> {
        self.check_question(question)?;
        if choice < CHOICES_PER_QUESTION {
            Ok(())
        } else {
            Err(AdminError::OutOfRange {
                what: "choice",
                index: choice,
                len: CHOICES_PER_QUESTION,
            })
        }
    }
}
