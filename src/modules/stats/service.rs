use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use helmsman_core::AppError;
use helmsman_db::DbResultExt;
use helmsman_models::{DashboardStats, EnrollmentResultCounts, SessionStatusCounts};

#[derive(sqlx::FromRow)]
struct StatsRow {
    agents: i64,
    formateurs: i64,
    formations: i64,
    cours: i64,
    sessions_upcoming: i64,
    sessions_ongoing: i64,
    sessions_completed: i64,
    enrollments_pending: i64,
    enrollments_passed: i64,
    enrollments_failed: i64,
    enrollments_absent: i64,
}

impl From<StatsRow> for DashboardStats {
    fn from(row: StatsRow) -> Self {
        Self {
            agents: row.agents,
            formateurs: row.formateurs,
            formations: row.formations,
            cours: row.cours,
            sessions: SessionStatusCounts {
                upcoming: row.sessions_upcoming,
                ongoing: row.sessions_ongoing,
                completed: row.sessions_completed,
            },
            enrollments: EnrollmentResultCounts {
                pending: row.enrollments_pending,
                passed: row.enrollments_passed,
                failed: row.enrollments_failed,
                absent: row.enrollments_absent,
            },
        }
    }
}

pub struct StatsService;

impl StatsService {
    /// Session statuses are evaluated on `today`.
    #[instrument(skip(db))]
    pub async fn get_dashboard_stats(
        db: &PgPool,
        today: NaiveDate,
    ) -> Result<DashboardStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"SELECT
                   (SELECT COUNT(*) FROM agents) AS agents,
                   (SELECT COUNT(*) FROM formateurs) AS formateurs,
                   (SELECT COUNT(*) FROM formations) AS formations,
                   (SELECT COUNT(*) FROM cours) AS cours,
                   s.upcoming AS sessions_upcoming,
                   s.ongoing AS sessions_ongoing,
                   s.completed AS sessions_completed,
                   e.pending AS enrollments_pending,
                   e.passed AS enrollments_passed,
                   e.failed AS enrollments_failed,
                   e.absent AS enrollments_absent
               FROM
                   (SELECT COUNT(*) FILTER (WHERE $1::date < start_date) AS upcoming,
                           COUNT(*) FILTER (WHERE $1::date BETWEEN start_date AND end_date) AS ongoing,
                           COUNT(*) FILTER (WHERE $1::date > end_date) AS completed
                    FROM training_sessions) s,
                   (SELECT COUNT(*) FILTER (WHERE result = 'pending') AS pending,
                           COUNT(*) FILTER (WHERE result = 'passed') AS passed,
                           COUNT(*) FILTER (WHERE result = 'failed') AS failed,
                           COUNT(*) FILTER (WHERE result = 'absent') AS absent
                    FROM agent_formations) e"#,
        )
        .bind(today)
        .fetch_one(db)
        .await
        .or_db_error()?;

        Ok(row.into())
    }
}
