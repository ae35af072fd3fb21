// src/handlers/services.rs
//
// Catálogo de serviços. Apagar um serviço deixa os agendamentos sem serviço.

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
    models::service::{Service, ServiceChanges, ServicePayload},
    services::scope::Principal,
};

#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    params(ListFilterQuery, PageQuery),
    responses(
        (status = 200, body = [Service])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_services(
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
        .catalog
        .list(&principal, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(paginate(items, &page, &uri)))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 200, body = Service),
        (status = 404, description = "Inexistente ou fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .catalog
        .get(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    request_body = ServicePayload,
    responses(
        (status = 201, body = Service),
        (status = 400, description = "Erro de validação"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    JsonBody(payload): JsonBody<ServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .catalog
        .create(&principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = ServicePayload,
    responses((status = 200, body = Service)),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<ServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .catalog
        .update(&principal, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    patch,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = ServiceChanges,
    responses((status = 200, body = Service)),
    security(("api_jwt" = []))
)]
pub async fn patch_service(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(changes): JsonBody<ServiceChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .catalog
        .partial_update(&principal, id, changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses((status = 204)),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog
        .delete(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
