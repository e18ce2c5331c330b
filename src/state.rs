use helmsman_config::{CorsConfig, JwtConfig, SessionConfig};
use helmsman_db::{PgPool, init_db_pool};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub session_config: SessionConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            session_config: SessionConfig::from_env(),
            cors_config: CorsConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    Ok(AppState::new(init_db_pool().await?))
}
