//! Request-scoped authorization context.
//!
//! [`RequestContext`] is built at most once per request, the first time an
//! extractor asks for it, and cached in the request extensions so the guard and
//! the handler share it. It holds the resolved [`Session`] and loads each
//! permission matrix lazily, at most once, from the database. Nothing outlives
//! the request: an edit to the permission tables is seen by the next request.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio::sync::OnceCell;

use helmsman_core::permissions::RoleGrants;
use helmsman_core::{AppError, PermissionMatrix, UiPermissionMatrix};
use helmsman_db::PgPool;
use helmsman_observability::track_authorization_check;

use crate::middleware::session::{Session, resolve_session};
use crate::modules::permissions::service::PermissionService;
use crate::state::AppState;

#[derive(Debug)]
struct ContextInner {
    db: PgPool,
    session: Session,
    permissions: OnceCell<PermissionMatrix>,
    ui_permissions: OnceCell<UiPermissionMatrix>,
}

#[derive(Debug, Clone)]
pub struct RequestContext(Arc<ContextInner>);

impl RequestContext {
    pub fn new(db: PgPool, session: Session) -> Self {
        Self(Arc::new(ContextInner {
            db,
            session,
            permissions: OnceCell::new(),
            ui_permissions: OnceCell::new(),
        }))
    }

    /// A context whose matrices are already known. Nothing is loaded from the database.
    pub fn with_matrices(
        db: PgPool,
        session: Session,
        permissions: PermissionMatrix,
        ui_permissions: UiPermissionMatrix,
    ) -> Self {
        Self(Arc::new(ContextInner {
            db,
            session,
            permissions: OnceCell::new_with(Some(permissions)),
            ui_permissions: OnceCell::new_with(Some(ui_permissions)),
        }))
    }

    pub fn session(&self) -> &Session {
        &self.0.session
    }

    pub fn role(&self) -> &str {
        self.0.session.role()
    }

    pub async fn permission_matrix(&self) -> Result<&PermissionMatrix, AppError> {
        self.0
            .permissions
            .get_or_try_init(|| PermissionService::load_permission_matrix(&self.0.db))
            .await
    }

    pub async fn ui_permission_matrix(&self) -> Result<&UiPermissionMatrix, AppError> {
        self.0
            .ui_permissions
            .get_or_try_init(|| PermissionService::load_ui_permission_matrix(&self.0.db))
            .await
    }

    /// May the caller perform `action` on `resource`?
    pub async fn can(&self, resource: &str, action: &str) -> Result<bool, AppError> {
        let matrix = self.permission_matrix().await?;
        Ok(matrix.can(Some(self.role()), resource, action))
    }

    /// 403 unless the caller's role grants `action` on `resource`.
    pub async fn authorize(&self, resource: &str, action: &str) -> Result<(), AppError> {
        let allowed = self.can(resource, action).await?;
        let role = self.role();
        track_authorization_check(role, resource, action, allowed);

        if allowed {
            tracing::debug!(
                user_id = %self.0.session.user_id(),
                role,
                resource,
                action,
                "Authorized"
            );
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.0.session.user_id(),
                role,
                resource,
                action,
                "Denied"
            );
            Err(AppError::forbidden(format!(
                "Access denied: role '{}' may not {} {}",
                role, action, resource
            )))
        }
    }

    /// The caller's role grants, empty when the role has none.
    pub async fn grants(&self) -> Result<RoleGrants, AppError> {
        let matrix = self.permission_matrix().await?;
        Ok(matrix.for_role(self.role()).cloned().unwrap_or_default())
    }

    /// Components enabled for the caller's role.
    pub async fn enabled_components(&self) -> Result<Vec<String>, AppError> {
        let matrix = self.ui_permission_matrix().await?;
        Ok(matrix.enabled_for_role(self.role()))
    }

    pub async fn is_component_enabled(&self, component: &str) -> Result<bool, AppError> {
        let matrix = self.ui_permission_matrix().await?;
        Ok(matrix.is_enabled(Some(self.role()), component))
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        let session = resolve_session(
            &state.db,
            &parts.headers,
            &state.jwt_config,
            &state.session_config,
        )
        .await?;

        let ctx = RequestContext::new(state.db.clone(), session);
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
