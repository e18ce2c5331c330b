use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use helmsman_auth::create_session_token;
use helmsman_config::JwtConfig;
use helmsman_core::{AppError, verify_password};
use helmsman_models::{LoginRequest, LoginResponse, MeResponse};
use helmsman_observability::{track_user_login_failure, track_user_login_success};

use crate::middleware::RequestContext;
use crate::modules::roles::service::find_role_by_name;
use crate::modules::users::service::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Unknown email, wrong password and banned account are all 401.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(credentials) = UserService::find_credentials(db, &dto.email).await? else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_user_login_failure("invalid_password");
            tracing::warn!(user_id = %credentials.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if credentials.banned {
            track_user_login_failure("banned");
            tracing::warn!(user_id = %credentials.id, "Login refused: account banned");
            return Err(AppError::unauthorized("Account is banned"));
        }

        let token = create_session_token(credentials.id, &credentials.email, jwt_config)?;
        let expires_at = Utc::now() + Duration::seconds(jwt_config.session_expiry_seconds());
        let user = UserService::record_login(db, credentials.id).await?;

        track_user_login_success(&user.role);
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token,
            expires_at,
            user,
        })
    }

    #[instrument(skip(db, ctx))]
    pub async fn me(db: &PgPool, ctx: &RequestContext) -> Result<MeResponse, AppError> {
        let role = find_role_by_name(db, ctx.role()).await?;
        if role.is_none() {
            tracing::warn!(role = ctx.role(), "Session user has no matching role row");
        }

        Ok(MeResponse {
            user: ctx.session().user.clone(),
            role,
            permissions: ctx.grants().await?,
            ui_components: ctx.enabled_components().await?,
        })
    }
}

