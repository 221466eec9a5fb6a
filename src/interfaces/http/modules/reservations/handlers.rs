//! Reservation handlers for authenticated users

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ReplaceReservationRequest, ReservationDto, ReservationRequest};
use crate::application::PlaceLocation;
use crate::domain::Slot;
use crate::interfaces::http::common::{upsert_status, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/smoking-places/{sp_id}/reservation",
    tag = "Reservations",
    params(("sp_id" = i32, Path, description = "Smoking place id")),
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Bad slot or conflicting reservation"),
        (status = 404, description = "Place not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn reserve(
    State(state): State<AppState>,
    Path(sp_id): Path<i32>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let created = state
        .reservations
        .create(sp_id, user.id, request.slot())
        .await?;
    let details = state.reservations.get_for_user(user.id, created.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::own(details))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "Upcoming reservations of all users", body = ApiResponse<Vec<ReservationDto>>)
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_upcoming(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ReservationDto>>>> {
    let rows = state.reservations.upcoming().await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(ReservationDto::with_owner).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/my-reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "Caller's upcoming reservations", body = ApiResponse<Vec<ReservationDto>>)
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<ApiResponse<Vec<ReservationDto>>>> {
    let rows = state.reservations.upcoming_for_user(user.id).await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(ReservationDto::own).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/my-reservations/{res_id}",
    tag = "Reservations",
    params(("res_id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Caller's reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "No such reservation for the caller")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_mine(
    State(state): State<AppState>,
    Path(res_id): Path<i32>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let details = state.reservations.get_for_user(user.id, res_id).await?;
    Ok(Json(ApiResponse::success(ReservationDto::own(details))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/my-reservations/{res_id}",
    tag = "Reservations",
    params(("res_id" = i32, Path, description = "Reservation id")),
    request_body = ReplaceReservationRequest,
    responses(
        (status = 200, description = "Reservation replaced", body = ApiResponse<ReservationDto>),
        (status = 201, description = "Reservation created under this id", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Bad slot, unknown location or conflict"),
        (status = 403, description = "Reservation belongs to another user")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn replace_mine(
    State(state): State<AppState>,
    Path(res_id): Path<i32>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ReplaceReservationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let location = PlaceLocation {
        number: request.sp_number,
        city: request.city,
        street: request.street,
    };
    let outcome = state
        .reservations
        .replace_owned(res_id, user.id, &location, Slot::new(request.start, request.end))
        .await?;

    let details = state.reservations.get_for_user(user.id, res_id).await?;
    Ok((
        upsert_status(&outcome),
        Json(ApiResponse::success(ReservationDto::own(details))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/my-reservations/{res_id}",
    tag = "Reservations",
    params(("res_id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "No such reservation for the caller")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn delete_mine(
    State(state): State<AppState>,
    Path(res_id): Path<i32>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state.reservations.delete_owned(res_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
