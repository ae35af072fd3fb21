// src/handlers/appointments.rs

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
    models::appointment::{Appointment, AppointmentChanges, AppointmentPayload},
    services::scope::Principal,
};

#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Appointments",
    params(ListFilterQuery, PageQuery),
    responses(
        (status = 200, description = "Mais recentes primeiro; aceita ?status=", body = [Appointment])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_appointments(
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
        .appointments
        .list(&principal, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(paginate(items, &page, &uri)))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, body = Appointment),
        (status = 404, description = "Inexistente ou fora do escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .appointments
        .get(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = AppointmentPayload,
    responses(
        (status = 201, description = "Sem price, herda o preço do serviço", body = Appointment),
        (status = 400, description = "Erro de validação"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    JsonBody(payload): JsonBody<AppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .appointments
        .create(&principal, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    request_body = AppointmentPayload,
    responses((status = 200, body = Appointment)),
    security(("api_jwt" = []))
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<AppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .appointments
        .update(&principal, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

// Qualquer transição de status é aceita
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    request_body = AppointmentChanges,
    responses((status = 200, body = Appointment)),
    security(("api_jwt" = []))
)]
pub async fn patch_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(changes): JsonBody<AppointmentChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .appointments
        .partial_update(&principal, id, changes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses((status = 204)),
    security(("api_jwt" = []))
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .appointments
        .delete(&principal, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
