// src/handlers/customers.rs

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
    models::customer::{Customer, CustomerChanges, CustomerPayload},
    services::scope::Principal,
};

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(ListFilterQuery, PageQuery),
    responses(
        (status = 200, body = [Customer])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
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
        .customers
        .list(&principal, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(paginate(items, &page, &uri)))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, body = Customer),
        (status = 404, description = "Inexistente ou fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .customers
        .get(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CustomerPayload,
    responses(
        (status = 201, body = Customer),
        (status = 400, description = "Erro de validação (telefone já usado em qualquer barbearia)"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    JsonBody(payload): JsonBody<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .customers
        .create(&principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = CustomerPayload,
    responses((status = 200, body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .customers
        .update(&principal, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = CustomerChanges,
    responses((status = 200, body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn patch_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(changes): JsonBody<CustomerChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .customers
        .partial_update(&principal, id, changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204)),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .customers
        .delete(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
