use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use helmsman_core::AppError;
use helmsman_models::{
    BanUserDto, CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
};

use crate::middleware::permission::{
    RequireUserCreate, RequireUserDelete, RequireUserEdit, RequireUserView,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:create"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    _guard: RequireUserCreate,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:view")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_users(
    State(state): State<AppState>,
    _guard: RequireUserView,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    Ok(Json(UserService::get_users(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:view"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn get_user(
    State(state): State<AppState>,
    _guard: RequireUserView,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::get_user(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:edit"),
        (status = 404, description = "User or role not found")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn update_user(
    State(state): State<AppState>,
    _guard: RequireUserEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::update_user(&state.db, id, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/ban",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = BanUserDto,
    responses(
        (status = 200, description = "User banned", body = User),
        (status = 400, description = "Cannot ban yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:edit"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, guard))]
pub async fn ban_user(
    State(state): State<AppState>,
    RequireUserEdit(guard): RequireUserEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<BanUserDto>,
) -> Result<Json<User>, AppError> {
    if guard.session().user_id() == id {
        return Err(AppError::bad_request(anyhow!("You cannot ban your own account")));
    }
    Ok(Json(UserService::ban_user(&state.db, id, dto.reason).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/unban",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unbanned", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:edit"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, _guard))]
pub async fn unban_user(
    State(state): State<AppState>,
    _guard: RequireUserEdit,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(UserService::unban_user(&state.db, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires user:delete"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
#[instrument(skip(state, guard))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUserDelete(guard): RequireUserDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if guard.session().user_id() == id {
        return Err(AppError::bad_request(anyhow!(
            "You cannot delete your own account"
        )));
    }
    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
