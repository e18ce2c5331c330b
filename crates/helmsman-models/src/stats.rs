use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SessionStatusCounts {
    pub upcoming: i64,
    pub ongoing: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResultCounts {
    pub pending: i64,
    pub passed: i64,
    pub failed: i64,
    pub absent: i64,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub agents: i64,
    pub formateurs: i64,
    pub formations: i64,
    pub cours: i64,
    pub sessions: SessionStatusCounts,
    pub enrollments: EnrollmentResultCounts,
}
