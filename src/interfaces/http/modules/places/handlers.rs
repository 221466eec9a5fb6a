//! Smoking place browsing for authenticated users

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::PlaceDto;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/smoking-places",
    tag = "Smoking Places",
    responses(
        (status = 200, description = "All places with status", body = ApiResponse<Vec<PlaceDto>>),
        (status = 401, description = "Not authenticated")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn list_places(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<PlaceDto>>>> {
    let places = state.catalog.list_places().await?;
    Ok(Json(ApiResponse::success(
        places.into_iter().map(PlaceDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/smoking-places/{sp_id}",
    tag = "Smoking Places",
    params(("sp_id" = i32, Path, description = "Smoking place id")),
    responses(
        (status = 200, description = "Place with status", body = ApiResponse<PlaceDto>),
        (status = 404, description = "Place not found")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []))
)]
pub async fn get_place(
    State(state): State<AppState>,
    Path(sp_id): Path<i32>,
) -> ApiResult<Json<ApiResponse<PlaceDto>>> {
    let place = state.catalog.get_place(sp_id).await?;
    Ok(Json(ApiResponse::success(place.into())))
}
