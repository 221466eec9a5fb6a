//! Admin handlers for user management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::RoleRequest;
use crate::domain::{DomainError, UserRole};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::auth::UserDto;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin: Users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserDto>>),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<UserDto>>>> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{user_id}",
    tag = "Admin: Users",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.users.get(user_id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{user_id}",
    tag = "Admin: Users",
    params(("user_id" = i32, Path, description = "User id")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserDto>),
        (status = 400, description = "Role is neither `user` nor `admin`"),
        (status = 404, description = "User not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn set_role(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    // unknown user wins over a bad role value
    state.users.get(user_id).await?;

    let role: UserRole = request
        .role
        .parse()
        .map_err(|msg| ApiError::with_field(DomainError::Validation(msg), "role"))?;

    let user = state.users.set_role(user_id, role).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{user_id}",
    tag = "Admin: Users",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User and their reservations deleted"),
        (status = 403, description = "Admins cannot be deleted"),
        (status = 404, description = "User not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.users.delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
