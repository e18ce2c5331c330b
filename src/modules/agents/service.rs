use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::{AppError, PaginationMeta};
use helmsman_db::DbResultExt;
use helmsman_models::{
    Agent, AgentEnrollment, AgentFilterParams, CreateAgentDto, PaginatedAgentsResponse,
    UpdateAgentDto,
};

const AGENT_COLUMNS: &str = "id, matricule, first_name, last_name, email, phone, rank, \
                             department, birth_date, created_at, updated_at";

const DUPLICATE_AGENT: &str = "An agent with this matricule or email already exists";

pub struct AgentService;

impl AgentService {
    #[instrument(skip(db))]
    pub async fn get_agents(
        db: &PgPool,
        filters: AgentFilterParams,
    ) -> Result<PaginatedAgentsResponse, AppError> {
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"WHERE ($1::text IS NULL
                                     OR matricule ILIKE $1
                                     OR first_name ILIKE $1
                                     OR last_name ILIKE $1
                                     OR email ILIKE $1)
                                AND ($2::text IS NULL OR department = $2)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM agents {}",
            where_clause
        ))
        .bind(&search)
        .bind(&filters.department)
        .fetch_one(db)
        .await
        .or_db_error()?;

        let agents = sqlx::query_as::<_, Agent>(&format!(
            "SELECT {} FROM agents {} ORDER BY last_name, first_name, id LIMIT $3 OFFSET $4",
            AGENT_COLUMNS, where_clause
        ))
        .bind(&search)
        .bind(&filters.department)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .or_db_error()?;

        let meta = PaginationMeta::new(total, &filters.pagination, agents.len());
        Ok(PaginatedAgentsResponse { data: agents, meta })
    }

    #[instrument(skip(db))]
    pub async fn get_agent(db: &PgPool, id: Uuid) -> Result<Agent, AppError> {
        sqlx::query_as::<_, Agent>(&format!("SELECT {} FROM agents WHERE id = $1", AGENT_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
            .or_db_error()?
            .ok_or_else(|| AppError::not_found(anyhow!("Agent not found")))
    }

    #[instrument(skip(db, dto), fields(matricule = %dto.matricule))]
    pub async fn create_agent(db: &PgPool, dto: CreateAgentDto) -> Result<Agent, AppError> {
        let agent = sqlx::query_as::<_, Agent>(&format!(
            r#"INSERT INTO agents
                   (matricule, first_name, last_name, email, phone, rank, department, birth_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {}"#,
            AGENT_COLUMNS
        ))
        .bind(dto.matricule.trim())
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(&dto.phone)
        .bind(&dto.rank)
        .bind(&dto.department)
        .bind(dto.birth_date)
        .fetch_one(db)
        .await
        .or_conflict(DUPLICATE_AGENT)?;

        tracing::info!(agent_id = %agent.id, "Agent created");
        Ok(agent)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_agent(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAgentDto,
    ) -> Result<Agent, AppError> {
        sqlx::query_as::<_, Agent>(&format!(
            r#"UPDATE agents
               SET matricule = COALESCE($2, matricule),
                   first_name = COALESCE($3, first_name),
                   last_name = COALESCE($4, last_name),
                   email = COALESCE($5, email),
                   phone = COALESCE($6, phone),
                   rank = COALESCE($7, rank),
                   department = COALESCE($8, department),
                   birth_date = COALESCE($9, birth_date),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            AGENT_COLUMNS
        ))
        .bind(id)
        .bind(dto.matricule.as_deref().map(str::trim))
        .bind(dto.first_name.as_deref().map(str::trim))
        .bind(dto.last_name.as_deref().map(str::trim))
        .bind(dto.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(&dto.phone)
        .bind(&dto.rank)
        .bind(&dto.department)
        .bind(dto.birth_date)
        .fetch_optional(db)
        .await
        .or_conflict(DUPLICATE_AGENT)?
        .ok_or_else(|| AppError::not_found(anyhow!("Agent not found")))
    }

    /// Enrollments go with the agent (cascade).
    #[instrument(skip(db))]
    pub async fn delete_agent(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Agent not found")));
        }
        Ok(())
    }

    /// The agent's enrollments, most recent session first.
    #[instrument(skip(db))]
    pub async fn get_agent_formations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Vec<AgentEnrollment>, AppError> {
        // 404 rather than an empty list for an unknown agent
        Self::get_agent(db, id).await?;

        sqlx::query_as::<_, AgentEnrollment>(
            r#"SELECT af.id, af.session_id, af.formation_id,
                      f.code AS formation_code, f.title AS formation_title,
                      s.start_date, s.end_date,
                      af.result, af.score, af.comment
               FROM agent_formations af
               JOIN training_sessions s ON s.id = af.session_id
               JOIN formations f ON f.id = af.formation_id
               WHERE af.agent_id = $1
               ORDER BY s.start_date DESC, af.id"#,
        )
        .bind(id)
        .fetch_all(db)
        .await
        .or_db_error()
    }
}
