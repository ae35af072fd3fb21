// src/handlers/staff.rs

use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, pagination::{PageQuery, paginate}},
    config::AppState,
    handlers::ListFilterQuery,
    middleware::{i18n::Locale, json::JsonBody},
    models::staff::{Staff, StaffChanges, StaffPayload},
    services::scope::Principal,
};

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    params(ListFilterQuery, PageQuery),
    responses(
        (status = 200, body = [Staff])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Query(filter): Query<ListFilterQuery>,
    Query(page): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<impl IntoResponse, ApiError> {
    let filter = filter
        .into_filter()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let items = app_state
        .staff
        .list(&principal, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(paginate(items, &page, &uri)))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    responses(
        (status = 200, body = Staff),
        (status = 404, description = "Inexistente ou fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_staff_member(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .staff
        .get(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    request_body = StaffPayload,
    responses(
        (status = 201, body = Staff),
        (status = 400, description = "Erro de validação"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff_member(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    JsonBody(payload): JsonBody<StaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .staff
        .create(&principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    request_body = StaffPayload,
    responses((status = 200, body = Staff)),
    security(("api_jwt" = []))
)]
pub async fn update_staff_member(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<StaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .staff
        .update(&principal, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    patch,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    request_body = StaffChanges,
    responses((status = 200, body = Staff)),
    security(("api_jwt" = []))
)]
pub async fn patch_staff_member(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(changes): JsonBody<StaffChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .staff
        .partial_update(&principal, id, changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    responses((status = 204)),
    security(("api_jwt" = []))
)]
pub async fn delete_staff_member(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .staff
        .delete(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
