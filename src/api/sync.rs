use std::fmt;

use crate::models::{Id, Question};

use super::requests::ExerciseRequest;

/// One exercise change to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
    Delete(Id),
    Update(Id, ExerciseRequest),
    /// Create the question at this index of the snapshot.
    Create(usize, ExerciseRequest),
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOp::Delete(id) => write!(f, "delete exercise {}", id),
            SyncOp::Update(id, _) => write!(f, "update exercise {}", id),
            SyncOp::Create(_, req) => write!(f, "create exercise \"{}\"", req.question),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub ops: Vec<SyncOp>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Turn an editor snapshot into backend operations for `level_id`.
///
/// Removed ids become deletes; questions with an id become updates and the
/// rest creates. Deletes and upserts touch disjoint ids, so their relative
/// order does not matter.
pub fn plan_exercise_sync(level_id: &Id, questions: &[Question], deleted: &[Id]) -> SyncPlan {
    let deletes = deleted.iter().cloned().map(SyncOp::Delete);
    let upserts = questions.iter().enumerate().map(|(index, q)| {
        let request = ExerciseRequest::from_question(level_id, q);
        match &q.id {
            Some(id) => SyncOp::Update(id.clone(), request),
            None => SyncOp::Create(index, request),
        }
    });
    SyncPlan {
        ops: deletes.chain(upserts).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub operation: String,
    pub message: String,
}

/// Outcome of a sync; operations that succeeded stay applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub succeeded: usize,
    pub failures: Vec<SyncFailure>,
    /// Snapshot index and backend id of each question that was created,
    /// when the backend returned the new id.
    pub created: Vec<(usize, Id)>,
    /// Exercise ids whose delete went through.
    pub deleted: Vec<Id>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn summary(&self) -> String {
        match self.failures.first() {
            None => format!("{} exercise changes saved", self.succeeded),
            Some(first) => format!(
                "{} of {} exercise changes failed ({}: {})",
                self.failures.len(),
                self.total(),
                first.operation,
                first.message
            ),
        }
    }
}
