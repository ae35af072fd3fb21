// src/handlers/businesses.rs

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
    middleware::{i18n::Locale, json::JsonBody},
    models::business::{Business, BusinessChanges, BusinessPayload},
    services::scope::Principal,
};

// ---
// Barbearias
// ---

#[utoipa::path(
    get,
    path = "/api/businesses",
    tag = "Businesses",
    params(PageQuery),
    responses(
        (status = 200, description = "Barbearias visíveis para o usuário", body = [Business])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_businesses(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Query(page): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<impl IntoResponse, ApiError> {
    let businesses = app_state
        .businesses
        .list(&principal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(paginate(businesses, &page, &uri)))
}

#[utoipa::path(
    get,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da barbearia")),
    responses(
        (status = 200, body = Business),
        (status = 404, description = "Inexistente ou fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_business(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let business = app_state
        .businesses
        .get(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(business))
}

#[utoipa::path(
    post,
    path = "/api/businesses",
    tag = "Businesses",
    request_body = BusinessPayload,
    responses(
        (status = 201, description = "Barbearia criada (dono = usuário autenticado)", body = Business),
        (status = 400, description = "Erro de validação"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_business(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    JsonBody(payload): JsonBody<BusinessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let business = app_state
        .businesses
        .create(&principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(business)))
}

#[utoipa::path(
    put,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da barbearia")),
    request_body = BusinessPayload,
    responses((status = 200, body = Business)),
    security(("api_jwt" = []))
)]
pub async fn update_business(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<BusinessPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let business = app_state
        .businesses
        .update(&principal, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(business))
}

#[utoipa::path(
    patch,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da barbearia")),
    request_body = BusinessChanges,
    responses((status = 200, body = Business)),
    security(("api_jwt" = []))
)]
pub async fn patch_business(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(changes): JsonBody<BusinessChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let business = app_state
        .businesses
        .partial_update(&principal, id, changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(business))
}

#[utoipa::path(
    delete,
    path = "/api/businesses/{id}",
    tag = "Businesses",
    params(("id" = Uuid, Path, description = "ID da barbearia")),
    responses((status = 204, description = "Apagada junto com tudo que pende dela")),
    security(("api_jwt" = []))
)]
pub async fn delete_business(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .businesses
        .delete(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
