use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::permissions::roles;
use helmsman_core::{AppError, PaginationMeta, hash_password};
use helmsman_db::DbResultExt;
use helmsman_models::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserCredentials, UserFilterParams,
};

const USER_COLUMNS: &str = "id, email, name, role, email_verified, banned, ban_reason, \
                            last_login_at, created_at, updated_at";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
            .or_db_error()
    }

    #[instrument(skip(db))]
    pub async fn find_credentials(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash, banned FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await
        .or_db_error()
    }

    #[instrument(skip(db))]
    pub async fn record_login(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_one(db)
        .await
        .or_db_error()
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
                                AND ($2::text IS NULL OR role = $2)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM users {}",
            where_clause
        ))
        .bind(&search)
        .bind(&filters.role)
        .fetch_one(db)
        .await
        .or_db_error()?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users {} ORDER BY created_at DESC, id LIMIT $3 OFFSET $4",
            USER_COLUMNS, where_clause
        ))
        .bind(&search)
        .bind(&filters.role)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .or_db_error()?;

        let meta = PaginationMeta::new(total, &filters.pagination, users.len());
        Ok(PaginatedUsersResponse { data: users, meta })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Unknown roles are rejected by the `users.role` foreign key (404).
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let password_hash = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or_else(|| roles::DEFAULT.to_string());

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (email, name, role, password_hash)
               VALUES ($1, $2, $3, $4)
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(normalize_email(&dto.email))
        .bind(dto.name.trim())
        .bind(&role)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .or_conflict("A user with this email already exists")?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   role = COALESCE($3, role),
                   email_verified = COALESCE($4, email_verified),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.role)
        .bind(dto.email_verified)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn ban_user(db: &PgPool, id: Uuid, reason: Option<String>) -> Result<User, AppError> {
        let user = Self::set_banned(db, id, true, reason).await?;
        tracing::warn!(user_id = %user.id, "User banned");
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn unban_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user = Self::set_banned(db, id, false, None).await?;
        tracing::info!(user_id = %user.id, "User unbanned");
        Ok(user)
    }

    async fn set_banned(
        db: &PgPool,
        id: Uuid,
        banned: bool,
        reason: Option<String>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET banned = $2, ban_reason = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(banned)
        .bind(reason)
        .fetch_optional(db)
        .await
        .or_db_error()?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .or_db_error()?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Helmsman.TEST "), "admin@helmsman.test");
    }
}
