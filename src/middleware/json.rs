// src/middleware/json.rs

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::{
    common::{
        error::{ApiError, AppError, field_error},
        i18n::I18nStore,
    },
    middleware::i18n::Locale,
};

// Campos aceitos nos corpos da API. O validator só guarda nomes `'static`,
// então o caminho que o serde reporta é casado contra esta lista.
const BODY_FIELDS: &[&str] = &[
    "address",
    "avatar_url",
    "business",
    "category",
    "completed_at",
    "customer",
    "description",
    "duration",
    "email",
    "first_name",
    "hire_date",
    "is_active",
    "last_name",
    "logo_url",
    "name",
    "new_password",
    "notes",
    "old_password",
    "owner",
    "password",
    "password2",
    "phone",
    "photo_url",
    "preferences",
    "price",
    "refresh",
    "role",
    "schedule",
    "scheduled_at",
    "service",
    "staff",
    "status",
    "username",
];

const NON_FIELD: &str = "non_field_errors";

/// `Json<T>` com a rejeição no formato de erro da API: um valor de tipo
/// errado vira 400 com o erro no campo, nunca o 422 em texto puro do axum.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("🧾 Corpo JSON rejeitado: {}", rejection.body_text());
                Err(rejection_error(&rejection).to_api_error(&locale, &I18nStore::new()))
            }
        }
    }
}

fn rejection_error(rejection: &JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) => {
            let field = rejected_field(&rejection.body_text()).unwrap_or(NON_FIELD);
            let code = if field == NON_FIELD { "invalid_json" } else { "invalid_value" };
            field_error(field, code)
        }
        _ => field_error(NON_FIELD, "invalid_json"),
    }
}

// "<prefixo>: price: invalid type: ..." -> "price"
// "<prefixo>: missing field `username` at ..." -> "username"
fn rejected_field(text: &str) -> Option<&'static str> {
    let (_, detail) = text.split_once(": ")?;

    let name = if let Some(rest) = detail.strip_prefix("missing field `") {
        rest.split('`').next()?
    } else {
        let (path, _) = detail.split_once(": ")?;
        if path.contains(char::is_whitespace) {
            return None;
        }
        path.split(['.', '[']).next()?
    };

    BODY_FIELDS.iter().copied().find(|field| *field == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "Failed to deserialize the JSON body into the target type";

    #[test]
    fn wrong_type_is_reported_on_its_field() {
        let text = format!(
            "{PREFIX}: price: invalid type: string \"abc\", expected a Decimal at line 1 column 20"
        );
        assert_eq!(rejected_field(&text), Some("price"));
    }

    #[test]
    fn nested_path_is_reported_on_the_top_level_field() {
        let text = format!("{PREFIX}: schedule.monday: invalid type: integer `1`, expected a string");
        assert_eq!(rejected_field(&text), Some("schedule"));
    }

    #[test]
    fn missing_field_is_reported_on_its_field() {
        let text = format!("{PREFIX}: missing field `username` at line 1 column 2");
        assert_eq!(rejected_field(&text), Some("username"));
    }

    #[test]
    fn root_level_errors_have_no_field() {
        let text = format!(
            "{PREFIX}: invalid type: sequence, expected struct ServicePayload at line 1 column 0"
        );
        assert_eq!(rejected_field(&text), None);
        let unknown = format!("{PREFIX}: favourite_colour: invalid type: null");
        assert_eq!(rejected_field(&unknown), None);
    }
}
