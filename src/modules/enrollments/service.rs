use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_db::DbResultExt;
use helmsman_models::{AgentFormation, SessionEnrollment, UpdateEnrollmentDto};

const ENROLLMENT_SELECT: &str = r#"
    SELECT af.id, af.agent_id, a.matricule, a.first_name, a.last_name,
           af.result, af.score, af.comment, af.created_at
    FROM agent_formations af
    JOIN agents a ON a.id = af.agent_id"#;

const ENROLLMENT_COLUMNS: &str =
    "id, agent_id, formation_id, session_id, result, score, comment, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SessionSeat {
    formation_id: Uuid,
    capacity: i32,
}

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(db))]
    pub async fn get_session_enrollments(
        db: &PgPool,
        session_id: Uuid,
    ) -> Result<Vec<SessionEnrollment>, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM training_sessions WHERE id = $1)",
        )
        .bind(session_id)
        .fetch_one(db)
        .await
        .or_db_error()?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Session not found")));
        }

        sqlx::query_as::<_, SessionEnrollment>(&format!(
            "{} WHERE af.session_id = $1 ORDER BY a.last_name, a.first_name",
            ENROLLMENT_SELECT
        ))
        .bind(session_id)
        .fetch_all(db)
        .await
        .or_db_error()
    }

    /// Locks the session row so concurrent enrollments cannot overbook it.
    /// A full session or an existing enrollment is a 409; an unknown agent a 404.
    #[instrument(skip(db))]
    pub async fn enroll_agent(
        db: &PgPool,
        session_id: Uuid,
        agent_id: Uuid,
    ) -> Result<SessionEnrollment, AppError> {
        let mut tx = db.begin().await.or_db_error()?;

        let seat = sqlx::query_as::<_, SessionSeat>(
            "SELECT formation_id, capacity FROM training_sessions WHERE id = $1 FOR UPDATE",
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Session not found")))?;

        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM agent_formations WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .or_db_error()?;

        if enrolled >= i64::from(seat.capacity) {
            tracing::warn!(%session_id, capacity = seat.capacity, "Enrollment refused: session full");
            return Err(AppError::conflict(anyhow!(
                "Session is full ({} places)",
                seat.capacity
            )));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO agent_formations (agent_id, formation_id, session_id)
               VALUES ($1, $2, $3)
               RETURNING id"#,
        )
        .bind(agent_id)
        .bind(seat.formation_id)
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .or_conflict("Agent is already enrolled in this session")?;

        let enrollment = sqlx::query_as::<_, SessionEnrollment>(&format!(
            "{} WHERE af.id = $1",
            ENROLLMENT_SELECT
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .or_db_error()?;

        tx.commit().await.or_db_error()?;

        tracing::info!(%session_id, %agent_id, "Agent enrolled");
        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn update_enrollment(
        db: &PgPool,
        session_id: Uuid,
        agent_id: Uuid,
        dto: UpdateEnrollmentDto,
    ) -> Result<AgentFormation, AppError> {
        sqlx::query_as::<_, AgentFormation>(&format!(
            r#"UPDATE agent_formations
               SET result = COALESCE($3, result),
                   score = COALESCE($4, score),
                   comment = COALESCE($5, comment),
                   updated_at = NOW()
               WHERE session_id = $1 AND agent_id = $2
               RETURNING {}"#,
            ENROLLMENT_COLUMNS
        ))
        .bind(session_id)
        .bind(agent_id)
        .bind(dto.result)
        .bind(dto.score)
        .bind(&dto.comment)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("Agent is not enrolled in this session")))
    }

    #[instrument(skip(db))]
    pub async fn remove_enrollment(
        db: &PgPool,
        session_id: Uuid,
        agent_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM agent_formations WHERE session_id = $1 AND agent_id = $2")
                .bind(session_id)
                .bind(agent_id)
                .execute(db)
                .await
                .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "Agent is not enrolled in this session"
            )));
        }

        tracing::info!(%session_id, %agent_id, "Enrollment removed");
        Ok(())
    }
}
