mod catalog;
mod exercise;
mod id;

pub use catalog::{Category, DashboardStats, Lesson, Level, User, Vocabulary};
pub use exercise::{Choice, Question, CHOICES_PER_QUESTION};
pub use id::Id;
