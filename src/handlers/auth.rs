// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, json::JsonBody},
    models::auth::{
        AccessResponse, AuthResponse, ChangePasswordPayload, CheckAuthResponse, LoginUserPayload,
        MessageResponse, RefreshPayload, RegisterUserPayload, UpdateMePayload, UserSummary,
    },
};

// Handler de registro
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado, já com o par de tokens", body = AuthResponse),
        (status = 400, description = "Dados inválidos ou usuário/e-mail em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut response = app_state
        .auth
        .register_user(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    response.message = Some(app_state.i18n_store.translate(&locale, "user_registered"));
    Ok((StatusCode::CREATED, Json(response)))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = app_state
        .auth
        .login_user(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    request_body = RefreshPayload,
    responses(
        (status = 200, body = AccessResponse),
        (status = 401, description = "Refresh token inválido ou expirado")
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    locale: Locale,
    JsonBody(payload): JsonBody<RefreshPayload>,
) -> Result<Json<AccessResponse>, ApiError> {
    let response = app_state
        .auth
        .refresh(&payload.refresh)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Users",
    responses(
        (status = 200, body = UserSummary),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(account): AuthenticatedUser) -> Json<UserSummary> {
    Json(UserSummary::from(&account))
}

#[utoipa::path(
    patch,
    path = "/api/auth/me",
    tag = "Users",
    request_body = UpdateMePayload,
    responses((status = 200, body = UserSummary)),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(account): AuthenticatedUser,
    JsonBody(payload): JsonBody<UpdateMePayload>,
) -> Result<Json<UserSummary>, ApiError> {
    let account = app_state
        .auth
        .update_me(account, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(UserSummary::from(&account)))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Users",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Senha atual incorreta ou nova senha curta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(account): AuthenticatedUser,
    JsonBody(payload): JsonBody<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .auth
        .change_password(&account, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale, "password_changed"),
    }))
}

/// Nunca falha: sem token responde `authenticated: false`.
#[utoipa::path(
    get,
    path = "/api/auth/check",
    tag = "Auth",
    responses((status = 200, body = CheckAuthResponse))
)]
pub async fn check(user: Option<AuthenticatedUser>) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        authenticated: user.is_some(),
        user: user.map(|AuthenticatedUser(account)| UserSummary::from(&account)),
    })
}
