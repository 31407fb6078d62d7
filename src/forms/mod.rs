//! Form container.
//!
//! A form owns the top-level fields of one record, optionally an
//! [`ExerciseEditor`](crate::editor::ExerciseEditor), and submits both
//! through a save function supplied by the caller.

mod container;
mod fields;

pub use container::{FormContainer, FormStatus};
pub use fields::{
    parse_sequence, validate_questions, CategoryFields, FormFields, LessonFields, LevelFields,
    VocabularyFields,
};
