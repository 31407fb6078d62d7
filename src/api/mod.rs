//! REST backend client.
//!
//! [`ApiClient`] maps each catalog operation to one HTTP call. Request bodies
//! are explicit structs per entity ([`requests`]). Saving a level with its
//! exercises goes through [`plan_exercise_sync`] and
//! [`ApiClient::sync_exercises`]: independent deletes, updates and creates
//! issued together, with no rollback when some of them fail.

mod client;
pub mod requests;
mod sync;

pub use client::ApiClient;
pub use requests::{
    CategoryRequest, ChoiceRequest, ExerciseKind, ExerciseRequest, LessonRequest, LevelRequest,
    VocabularyRequest,
};
pub use sync::{plan_exercise_sync, SyncFailure, SyncOp, SyncPlan, SyncReport};
