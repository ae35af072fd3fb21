// src/models/business.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::apply;

// ---
// Business (A "Barbearia")
// ---
// A unidade de isolamento de dados. Todo o resto pendura aqui.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Business {
    pub id: Uuid,

    #[schema(example = "Downtown Cuts")]
    pub name: String,

    // Dono: sempre o usuário que criou. Nunca muda por PATCH/PUT.
    pub owner: i64,
    #[schema(example = "admin")]
    pub owner_username: String,

    pub address: Option<String>,
    #[schema(example = "555-0101")]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    pub fn apply_changes(&mut self, changes: BusinessChanges) {
        apply(&mut self.name, changes.name);
        apply(&mut self.address, changes.address);
        apply(&mut self.phone, changes.phone);
        apply(&mut self.email, changes.email);
        apply(&mut self.logo_url, changes.logo_url);
    }
}

/// Payload de criação (POST) e substituição (PUT).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BusinessPayload {
    #[validate(required(message = "required"), length(min = 1, max = 255, message = "invalid_length"))]
    #[schema(example = "Uptown Styles")]
    pub name: Option<String>,

    // Aceito apenas por compatibilidade com clientes antigos: o dono é sempre
    // o usuário autenticado, este valor é descartado.
    #[serde(default, skip_serializing)]
    #[schema(ignore)]
    pub owner: Option<i64>,

    pub address: Option<String>,

    #[validate(length(max = 20, message = "invalid_length"))]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(url(message = "invalid_url"))]
    pub logo_url: Option<String>,
}

/// Payload de PATCH. Campos ausentes ficam como estão; `null` limpa os opcionais.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BusinessChanges {
    #[validate(length(min = 1, max = 255, message = "invalid_length"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(length(max = 20, message = "invalid_length"))]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(email(message = "invalid_email"))]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(url(message = "invalid_url"))]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
}

impl From<BusinessPayload> for BusinessChanges {
    fn from(payload: BusinessPayload) -> Self {
        Self {
            name: payload.name,
            address: payload.address.map(Some),
            phone: payload.phone.map(Some),
            email: payload.email.map(Some),
            logo_url: payload.logo_url.map(Some),
        }
    }
}
