//! Admin handlers for reservations of any user

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::ReservationListQuery;
use crate::domain::Slot;
use crate::interfaces::http::common::{upsert_status, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::reservations::{AdminReservationRequest, ReservationDto};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/reservations",
    tag = "Admin: Reservations",
    params(ReservationListQuery),
    responses(
        (status = 200, description = "Reservations of all users", body = ApiResponse<Vec<ReservationDto>>)
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ReservationDto>>>> {
    let rows = if query.include_past {
        state.reservations.all().await?
    } else {
        state.reservations.upcoming().await?
    };
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(ReservationDto::with_owner).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/reservations/{res_id}",
    tag = "Admin: Reservations",
    params(("res_id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(res_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<ReservationDto>>> {
    let details = state.reservations.get(res_id).await?;
    Ok(Json(ApiResponse::success(ReservationDto::with_owner(details))))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/reservations/{res_id}",
    tag = "Admin: Reservations",
    params(("res_id" = i32, Path, description = "Reservation id")),
    request_body = AdminReservationRequest,
    responses(
        (status = 200, description = "Reservation replaced", body = ApiResponse<ReservationDto>),
        (status = 201, description = "Reservation created under this id", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Bad slot or conflict"),
        (status = 404, description = "Place or user not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn put_reservation(
    State(state): State<AppState>,
    Path(res_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<AdminReservationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let outcome = state
        .reservations
        .admin_replace(
            res_id,
            request.smoking_place_id,
            request.user_id,
            Slot::new(request.start, request.end),
        )
        .await?;

    let details = state.reservations.get(res_id).await?;
    Ok((
        upsert_status(&outcome),
        Json(ApiResponse::success(ReservationDto::with_owner(details))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/reservations/{res_id}",
    tag = "Admin: Reservations",
    params(("res_id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Reservation not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(res_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.reservations.delete_any(res_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
