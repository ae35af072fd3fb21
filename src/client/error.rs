// src/client/error.rs

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Formulário incompleto (local) ou 400 do servidor.
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Not found.")]
    NotFound,

    #[error("{0}")]
    Unauthorized(String),

    // Timeout, conexão recusada, corpo ilegível
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    /// Erro de formulário com um único campo.
    pub fn field(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.to_string()]);
        ClientError::Validation {
            message: format!("{field}: {message}"),
            fields,
        }
    }

    /// Texto exibido no painel: a mensagem e, se houver, os erros por campo.
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Validation { message, fields } if !fields.is_empty() => {
                let details: Vec<String> = fields
                    .iter()
                    .map(|(field, errors)| format!("{field}: {}", errors.join(" ")))
                    .collect();
                if details.iter().any(|d| d == message) {
                    message.clone()
                } else {
                    format!("{message} {}", details.join("; "))
                }
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_field_errors_are_listed_after_the_message() {
        let mut fields = BTreeMap::new();
        fields.insert("phone".to_string(), vec!["This value is already in use.".to_string()]);
        let err = ClientError::Validation {
            message: "One or more fields are invalid.".into(),
            fields,
        };
        assert_eq!(
            err.display_message(),
            "One or more fields are invalid. phone: This value is already in use."
        );
    }

    #[test]
    fn local_field_error_is_not_repeated() {
        assert_eq!(
            ClientError::field("name", "required").display_message(),
            "name: required"
        );
    }
}
