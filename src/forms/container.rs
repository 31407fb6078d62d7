use std::future::Future;

use tracing::{info, warn};

use super::fields::{validate_questions, FormFields};
use crate::editor::{ExerciseEditor, Mode};
use crate::error::{AdminError, Result};
use crate::models::{Id, Question};

/// Where a form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    /// Waiting on the save function.
    Saving,
    /// Saved or cancelled; the form is done.
    Closed,
}

pub struct FormContainer<F> {
    mode: Mode,
    fields: F,
    exercises: Option<ExerciseEditor>,
    status: FormStatus,
    error: Option<String>,
}

impl<F: FormFields + Clone> FormContainer<F> {
    /// A form without an exercise section.
    pub fn open(mode: Mode, fields: F) -> Self {
        Self {
            mode,
            fields,
            exercises: None,
            status: FormStatus::Editing,
            error: None,
        }
    }

    /// A form whose exercise section is seeded from `existing` in edit mode.
    pub fn with_exercises(mode: Mode, fields: F, existing: &[Question]) -> Self {
        Self {
            exercises: Some(ExerciseEditor::new(mode, existing)),
            ..Self::open(mode, fields)
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    pub fn exercises(&self) -> Option<&ExerciseEditor> {
        self.exercises.as_ref()
    }

    pub fn exercises_mut(&mut self) -> Option<&mut ExerciseEditor> {
        self.exercises.as_mut()
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Message from the last failed submit, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.status != FormStatus::Closed
    }

    pub fn cancel(&mut self) {
        self.status = FormStatus::Closed;
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = self.fields.validate();
        if let Some(editor) = &self.exercises {
            errors.extend(validate_questions(editor.questions()));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AdminError::Validation(errors))
        }
    }

    /// Validate, then hand fields, questions and removed question ids to `save`.
    ///
    /// Success closes the form. Any failure keeps it open with the fields and
    /// exercises exactly as they were, and records a readable message so the
    /// user can retry.
    pub async fn submit<S, Fut, T>(&mut self, save: S) -> Result<T>
    where
        S: FnOnce(F, Vec<Question>, Vec<Id>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.status == FormStatus::Closed {
            return Err(AdminError::FormClosed);
        }
        if let Err(e) = self.validate() {
            self.error = Some(e.user_message());
            return Err(e);
        }

        let snapshot = self
            .exercises
            .as_ref()
            .map(ExerciseEditor::snapshot)
            .unwrap_or_default();

        self.status = FormStatus::Saving;
        self.error = None;

        match save(self.fields.clone(), snapshot.questions, snapshot.deleted).await {
            Ok(saved) => {
                self.status = FormStatus::Closed;
                info!(target: "forms", mode = ?self.mode, "Form saved");
                Ok(saved)
            }
            Err(e) => {
                self.status = FormStatus::Editing;
                self.error = Some(e.user_message());
                warn!(target: "forms", error = %e, "Save failed; form kept open");
                Err(e)
            }
        }
    }
}
