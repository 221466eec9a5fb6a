//! Admin handlers for addresses and the smoking places on them

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{AddressDto, AddressRequest, AdminPlaceDto, PlaceRequest};
use crate::interfaces::http::common::{upsert_status, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/addresses",
    tag = "Admin: Addresses",
    responses(
        (status = 200, description = "Addresses with place counts", body = ApiResponse<Vec<AddressDto>>),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_addresses(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<AddressDto>>>> {
    let addresses = state.catalog.list_addresses().await?;
    Ok(Json(ApiResponse::success(
        addresses.into_iter().map(AddressDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/addresses/new-address",
    tag = "Admin: Addresses",
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address created", body = ApiResponse<AddressDto>),
        (status = 409, description = "Street already registered")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn create_address(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AddressRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AddressDto>>)> {
    let address = state
        .catalog
        .create_address(&request.city, &request.street)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(address.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/addresses/{address_id}",
    tag = "Admin: Addresses",
    params(("address_id" = i32, Path, description = "Address id")),
    responses(
        (status = 200, description = "Address with place count", body = ApiResponse<AddressDto>),
        (status = 404, description = "Address not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_address(
    State(state): State<AppState>,
    Path(address_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<AddressDto>>> {
    let summary = state.catalog.get_address(address_id).await?;
    Ok(Json(ApiResponse::success(summary.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/addresses/{address_id}",
    tag = "Admin: Addresses",
    params(("address_id" = i32, Path, description = "Address id")),
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Address replaced", body = ApiResponse<AddressDto>),
        (status = 201, description = "Address created under this id", body = ApiResponse<AddressDto>)
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn put_address(
    State(state): State<AppState>,
    Path(address_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<AddressRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AddressDto>>)> {
    let outcome = state
        .catalog
        .put_address(address_id, &request.city, &request.street)
        .await?;
    let status = upsert_status(&outcome);
    Ok((status, Json(ApiResponse::success(outcome.into_inner().into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/addresses/{address_id}",
    tag = "Admin: Addresses",
    params(("address_id" = i32, Path, description = "Address id")),
    responses(
        (status = 204, description = "Address, its places and their reservations deleted"),
        (status = 404, description = "Address not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn delete_address(
    State(state): State<AppState>,
    Path(address_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_address(address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Places on an address ────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/admin/addresses/{address_id}/smoking-places",
    tag = "Admin: Smoking Places",
    params(("address_id" = i32, Path, description = "Address id")),
    responses(
        (status = 200, description = "Places with status", body = ApiResponse<Vec<AdminPlaceDto>>),
        (status = 404, description = "Address not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_places(
    State(state): State<AppState>,
    Path(address_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<Vec<AdminPlaceDto>>>> {
    let places = state.catalog.list_places_on_address(address_id).await?;
    Ok(Json(ApiResponse::success(
        places.into_iter().map(AdminPlaceDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/addresses/{address_id}/smoking-places/new-smoking-place",
    tag = "Admin: Smoking Places",
    params(("address_id" = i32, Path, description = "Address id")),
    request_body = PlaceRequest,
    responses(
        (status = 201, description = "Place created", body = ApiResponse<AdminPlaceDto>),
        (status = 404, description = "Address not found"),
        (status = 409, description = "Number already used on this address")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn create_place(
    State(state): State<AppState>,
    Path(address_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<PlaceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AdminPlaceDto>>)> {
    let place = state.catalog.create_place(address_id, request.number).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(place.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/addresses/{address_id}/smoking-places/{sp_id}",
    tag = "Admin: Smoking Places",
    params(
        ("address_id" = i32, Path, description = "Address id"),
        ("sp_id" = i32, Path, description = "Smoking place id")
    ),
    responses(
        (status = 200, description = "Place with status", body = ApiResponse<AdminPlaceDto>),
        (status = 404, description = "Address or place not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_place(
    State(state): State<AppState>,
    Path((address_id, sp_id)): Path<(i32, i32)>,
) -> ApiResult<Json<ApiResponse<AdminPlaceDto>>> {
    let place = state.catalog.get_place_on_address(address_id, sp_id).await?;
    Ok(Json(ApiResponse::success(place.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/addresses/{address_id}/smoking-places/{sp_id}",
    tag = "Admin: Smoking Places",
    params(
        ("address_id" = i32, Path, description = "Address id"),
        ("sp_id" = i32, Path, description = "Smoking place id")
    ),
    request_body = PlaceRequest,
    responses(
        (status = 200, description = "Place renumbered", body = ApiResponse<AdminPlaceDto>),
        (status = 201, description = "Place created under this id", body = ApiResponse<AdminPlaceDto>),
        (status = 404, description = "Address not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn put_place(
    State(state): State<AppState>,
    Path((address_id, sp_id)): Path<(i32, i32)>,
    ValidatedJson(request): ValidatedJson<PlaceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AdminPlaceDto>>)> {
    let outcome = state
        .catalog
        .put_place(address_id, sp_id, request.number)
        .await?;
    let status = upsert_status(&outcome);
    Ok((status, Json(ApiResponse::success(outcome.into_inner().into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/addresses/{address_id}/smoking-places/{sp_id}",
    tag = "Admin: Smoking Places",
    params(
        ("address_id" = i32, Path, description = "Address id"),
        ("sp_id" = i32, Path, description = "Smoking place id")
    ),
    responses(
        (status = 204, description = "Place and its reservations deleted"),
        (status = 404, description = "Address or place not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn delete_place(
    State(state): State<AppState>,
    Path((address_id, sp_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_place(address_id, sp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
