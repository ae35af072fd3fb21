// src/middleware/auth.rs

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    common::{error::{ApiError, AppError}, i18n::I18nStore},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::UserAccount,
    services::scope::{Principal, UserIdentity},
};

// Identifica quem chama. Sem Authorization o pedido segue como anônimo;
// um Bearer inválido ou expirado é recusado na hora.
pub async fn identify(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();

    let principal = match bearer {
        None => Principal::Anonymous,
        Some(Authorization(bearer)) => {
            // Recarrega do banco: mudança de is_master vale na próxima requisição
            let account = app_state
                .auth
                .validate_token(bearer.token())
                .await
                .map_err(|e| {
                    let locale = Locale::from_headers(request.headers());
                    e.to_api_error(&locale, &app_state.i18n_store)
                })?;

            let principal = Principal::User(UserIdentity::from(&account));
            // Insere o usuário nos "extensions" da requisição
            request.extensions_mut().insert(account);
            principal
        }
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

// Rotas fora do `identify` enxergam um anônimo
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned().unwrap_or_default())
    }
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub UserAccount);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAccount>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                AppError::Unauthorized
                    .to_api_error(&Locale::from_headers(&parts.headers), &I18nStore::new())
            })
    }
}

impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<UserAccount>().cloned().map(AuthenticatedUser))
    }
}
