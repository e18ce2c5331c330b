//! Training sessions.
//!
//! Status is never stored. Listing computes it in SQL against a bound `today`
//! so the status filter and pagination agree; single rows compute it in Rust
//! with [`SessionStatus::from_dates`].

use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::{AppError, PaginationMeta};
use helmsman_db::DbResultExt;
use helmsman_models::sessions::check_date_order;
use helmsman_models::{
    CreateSessionDto, PaginatedSessionsResponse, SessionFilterParams, SessionSummary,
    TrainingSession, UpdateSessionDto,
};

const SUMMARY_SELECT: &str = r#"
    SELECT s.id, s.formation_id,
           f.code AS formation_code, f.title AS formation_title,
           s.start_date, s.end_date, s.capacity,
           COUNT(af.id) AS enrolled_count,
           s.location, s.notes, s.created_at, s.updated_at
    FROM training_sessions s
    JOIN formations f ON f.id = s.formation_id
    LEFT JOIN agent_formations af ON af.session_id = s.id"#;

/// Sessions overlapping [$1, $2], of formation $3, whose status on $5 is $4.
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::date IS NULL OR s.end_date >= $1)
      AND ($2::date IS NULL OR s.start_date <= $2)
      AND ($3::uuid IS NULL OR s.formation_id = $3)
      AND ($4::text IS NULL OR
           CASE WHEN $5::date < s.start_date THEN 'upcoming'
                WHEN $5::date > s.end_date THEN 'completed'
                ELSE 'ongoing'
           END = $4)"#;

const SESSION_COLUMNS: &str =
    "id, formation_id, start_date, end_date, capacity, location, notes, created_at, updated_at";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct SessionService;

impl SessionService {
    #[instrument(skip(db))]
    pub async fn get_sessions(
        db: &PgPool,
        filters: SessionFilterParams,
        today: NaiveDate,
    ) -> Result<PaginatedSessionsResponse, AppError> {
        let status = filters.status.map(|s| s.as_str());
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM training_sessions s {}",
            FILTER_CLAUSE
        ))
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.formation_id)
        .bind(status)
        .bind(today)
        .fetch_one(db)
        .await
        .or_db_error()?;

        let sessions = sqlx::query_as::<_, SessionSummary>(&format!(
            "{} {} GROUP BY s.id, f.id ORDER BY s.start_date, s.id LIMIT $6 OFFSET $7",
            SUMMARY_SELECT, FILTER_CLAUSE
        ))
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.formation_id)
        .bind(status)
        .bind(today)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .or_db_error()?
        .into_iter()
        .map(|s| s.with_status(today))
        .collect::<Vec<_>>();

        let meta = PaginationMeta::new(total, &filters.pagination, sessions.len());
        Ok(PaginatedSessionsResponse {
            data: sessions,
            meta,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_session(
        db: &PgPool,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<SessionSummary, AppError> {
        sqlx::query_as::<_, SessionSummary>(&format!(
            "{} WHERE s.id = $1 GROUP BY s.id, f.id",
            SUMMARY_SELECT
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .map(|s| s.with_status(today))
        .ok_or_else(|| AppError::not_found(anyhow!("Session not found")))
    }

    /// An unknown formation is a 404 (foreign key).
    #[instrument(skip(db))]
    pub async fn create_session(
        db: &PgPool,
        dto: CreateSessionDto,
    ) -> Result<SessionSummary, AppError> {
        let session = sqlx::query_as::<_, TrainingSession>(&format!(
            r#"INSERT INTO training_sessions
                   (formation_id, start_date, end_date, capacity, location, notes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {}"#,
            SESSION_COLUMNS
        ))
        .bind(dto.formation_id)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.capacity)
        .bind(&dto.location)
        .bind(&dto.notes)
        .fetch_one(db)
        .await
        .or_db_error()?;

        tracing::info!(
            session_id = %session.id,
            formation_id = %session.formation_id,
            start = %session.start_date,
            end = %session.end_date,
            "Session scheduled"
        );

        Self::get_session(db, session.id, today()).await
    }

    /// Merges the update into the stored row. The merged dates must be in
    /// order and the capacity may not drop below the current enrollment.
    #[instrument(skip(db))]
    pub async fn update_session(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSessionDto,
    ) -> Result<SessionSummary, AppError> {
        let mut tx = db.begin().await.or_db_error()?;

        let current = sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {} FROM training_sessions WHERE id = $1 FOR UPDATE",
            SESSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Session not found")))?;

        let start_date = dto.start_date.unwrap_or(current.start_date);
        let end_date = dto.end_date.unwrap_or(current.end_date);
        check_date_order(start_date, end_date).map_err(|e| {
            AppError::bad_request(anyhow!(
                "{}",
                e.message.unwrap_or_else(|| "invalid date range".into())
            ))
        })?;

        if let Some(capacity) = dto.capacity {
            let enrolled = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM agent_formations WHERE session_id = $1",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .or_db_error()?;

            if i64::from(capacity) < enrolled {
                return Err(AppError::conflict(anyhow!(
                    "Capacity {} is below the {} agents already enrolled",
                    capacity,
                    enrolled
                )));
            }
        }

        sqlx::query(
            r#"UPDATE training_sessions
               SET formation_id = COALESCE($2, formation_id),
                   start_date = $3,
                   end_date = $4,
                   capacity = COALESCE($5, capacity),
                   location = COALESCE($6, location),
                   notes = COALESCE($7, notes),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(dto.formation_id)
        .bind(start_date)
        .bind(end_date)
        .bind(dto.capacity)
        .bind(&dto.location)
        .bind(&dto.notes)
        .execute(&mut *tx)
        .await
        .or_db_error()?;

        // enrollments carry the formation of their session
        if let Some(formation_id) = dto.formation_id.filter(|f| *f != current.formation_id) {
            sqlx::query(
                "UPDATE agent_formations SET formation_id = $2, updated_at = NOW() WHERE session_id = $1",
            )
            .bind(id)
            .bind(formation_id)
            .execute(&mut *tx)
            .await
            .or_db_error()?;
        }

        tx.commit().await.or_db_error()?;

        Self::get_session(db, id, today()).await
    }

    /// Enrollments go with the session (cascade).
    #[instrument(skip(db))]
    pub async fn delete_session(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Session not found")));
        }
        Ok(())
    }
}
