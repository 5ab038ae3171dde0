use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credit-weighted grade point average over completed enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GpaSummary {
    pub gpa: f64,
    pub completed_credits: f64,
}
