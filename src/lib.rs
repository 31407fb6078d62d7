//! # catalog-admin
//!
//! Administration client for a language-learning content catalog:
//! categories, vocabulary entries, levels, lessons and the multiple-choice
//! exercises attached to each level.
//!
//! ## Usage
//!
//! ```rust
//! use catalog_admin::editor::{ExerciseEditor, Mode};
//!
//! let mut editor = ExerciseEditor::new(Mode::Add, &[]);
//! editor.set_question_text(0, "مَا هَذَا؟").unwrap();
//! editor.set_choice_correct(0, 2).unwrap();
//!
//! let snapshot = editor.snapshot();
//! assert_eq!(snapshot.questions.len(), 1);
//! assert!(snapshot.deleted.is_empty());
//! ```
//!
//! The [`editor`] module is pure state; [`forms`] wraps it with top-level
//! fields and submission, [`api`] talks to the REST backend and [`auth`]
//! holds the signed-in session.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod editor;
mod error;
pub mod forms;
pub mod models;
pub mod telemetry;
pub mod terminal;
pub mod tui;

#[cfg(test)]
mod test_support;

pub use error::{AdminError, FieldError, Result};
pub use models::{Category, Choice, DashboardStats, Id, Lesson, Level, Question, User, Vocabulary};
