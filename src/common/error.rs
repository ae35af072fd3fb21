// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    // Ausente ou fora do escopo: os dois casos são indistinguíveis de propósito
    #[error("Recurso não encontrado")]
    NotFound,

    // Escrita sem credencial
    #[error("Autenticação necessária")]
    Unauthorized,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Variante para erros de banco de dados. Violações de constraint
    // conhecidas nunca chegam aqui, viram ValidationError no `From`.
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default();

            if db_err.is_unique_violation() {
                if let Some(field) = unique_field(constraint) {
                    return field_error(field, "unique");
                }
            }
            if db_err.is_foreign_key_violation() {
                if let Some(field) = reference_field(constraint) {
                    return field_error(field, "does_not_exist");
                }
            }
            if db_err.is_check_violation() {
                if let Some((field, code)) = check_field(constraint) {
                    return field_error(field, code);
                }
            }
        }
        AppError::DatabaseError(err)
    }
}

// Mapeia o nome da constraint (ver migrations/) para o campo exposto na API
fn unique_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "customers_phone_key" => Some("phone"),
        "users_username_key" => Some("username"),
        "users_email_key" => Some("email"),
        _ => None,
    }
}

fn reference_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "businesses_owner_id_fkey" => Some("owner"),
        "staff_business_id_fkey"
        | "customers_business_id_fkey"
        | "services_business_id_fkey"
        | "appointments_business_id_fkey" => Some("business"),
        "appointments_staff_id_fkey" => Some("staff"),
        "appointments_customer_id_fkey" => Some("customer"),
        "appointments_service_id_fkey" => Some("service"),
        _ => None,
    }
}

fn check_field(constraint: &str) -> Option<(&'static str, &'static str)> {
    match constraint {
        "services_price_check" => Some(("price", "min_value")),
        "services_duration_check" => Some(("duration", "must_be_positive")),
        _ => None,
    }
}

/// Erro de validação com um único campo.
pub fn field_error(field: &'static str, code: &'static str) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(code));
    AppError::ValidationError(errors)
}

// Erro já traduzido, pronto para virar resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();

        let (key, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(&*e.code);
                            i18n.translate(locale, key)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ("validation_failed", Some(json!(details)))
            }
            AppError::NotFound => ("not_found", None),
            AppError::Unauthorized => ("unauthorized", None),
            AppError::InvalidCredentials => ("invalid_credentials", None),
            AppError::InvalidToken => ("invalid_token", None),
            // Todos os outros viram 500. Logamos aqui, uma vez, com o detalhe
            // que o `thiserror` montou; o cliente só recebe a mensagem genérica.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ("internal_error", None)
            }
        };

        ApiError {
            status,
            message: i18n.translate(locale, key),
            details,
        }
    }
}

// Caminho sem Locale (ex.: middleware), sempre em inglês
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::new())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".into())
    }

    #[test]
    fn validation_errors_become_translated_details() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", ValidationError::new("unique"));
        errors.add("name", ValidationError::new("required"));

        let api = AppError::from(errors).to_api_error(&Locale("pt".into()), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Um ou mais campos são inválidos.");
        assert_eq!(
            api.details,
            Some(json!({
                "name": ["Este campo é obrigatório."],
                "phone": ["Este valor já está em uso."],
            }))
        );
    }

    #[test]
    fn not_found_and_unauthorized_have_no_details() {
        let i18n = I18nStore::new();

        let not_found = AppError::NotFound.to_api_error(&en(), &i18n);
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert!(not_found.details.is_none());

        let unauthorized = AppError::Unauthorized.to_api_error(&en(), &i18n);
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unexpected_errors_hide_their_cause() {
        let err = AppError::from(anyhow::anyhow!("connection reset by peer"));
        let api = err.to_api_error(&en(), &I18nStore::new());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "An unexpected error occurred.");
    }

    #[test]
    fn known_constraints_map_to_api_fields() {
        assert_eq!(unique_field("customers_phone_key"), Some("phone"));
        assert_eq!(reference_field("appointments_service_id_fkey"), Some("service"));
        assert_eq!(reference_field("staff_business_id_fkey"), Some("business"));
        assert_eq!(unique_field("something_else"), None);
    }
}
